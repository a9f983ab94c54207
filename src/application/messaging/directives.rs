//! Directive scanner - Finds action markers in generation responses
//!
//! Markers are single-line and matched non-greedily, case-insensitively:
//! - `<Deepthink: description>`
//! - `<imageGenerate: query>`
//! - `<codeSimple(ext): task>`, extension optional

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use crate::domain::entities::{Directive, DirectiveKind, DEFAULT_CODE_EXTENSION};

static FOLLOWUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<Deepthink:\s*(.*?)>").unwrap());
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<imageGenerate:\s*(.*?)>").unwrap());
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<codeSimple(?:\((.*?)\))?:\s*(.*?)>").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(?:\w*\n)?(.*?)```").unwrap());

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Extension from a code marker; missing or non-alphanumeric falls back to `txt`
fn code_extension(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_CODE_EXTENSION.to_string(),
    }
}

/// One typed matcher per directive kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    Followup,
    Image,
    Code,
}

impl Matcher {
    const ORDERED: [Matcher; 3] = [Matcher::Followup, Matcher::Image, Matcher::Code];

    fn regex(self) -> &'static Regex {
        match self {
            Matcher::Followup => &FOLLOWUP_RE,
            Matcher::Image => &IMAGE_RE,
            Matcher::Code => &CODE_RE,
        }
    }

    fn directive(self, caps: &Captures<'_>) -> Option<Directive> {
        let span = caps.get(0)?.range();
        let kind = match self {
            Matcher::Followup => DirectiveKind::FollowupThought {
                description: group(caps, 1),
            },
            Matcher::Image => DirectiveKind::ImageRequest {
                query: group(caps, 1),
            },
            Matcher::Code => DirectiveKind::CodeRequest {
                extension: code_extension(caps.get(1).map(|m| m.as_str())),
                task: group(caps, 2),
            },
        };
        Some(Directive::new(kind, span))
    }
}

/// All directives in `text`, grouped by kind in priority order
/// (follow-up thoughts, image requests, code requests), each group left to right.
pub fn scan(text: &str) -> Vec<Directive> {
    Matcher::ORDERED
        .into_iter()
        .flat_map(|m| m.regex().captures_iter(text).filter_map(move |c| m.directive(&c)))
        .collect()
}

/// Interior of the first fenced code block, or the trimmed text if there is none
pub fn extract_code(text: &str) -> String {
    match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        Some(code) => code.as_str().to_string(),
        None => text.trim().to_string(),
    }
}
