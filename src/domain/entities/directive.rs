use std::ops::Range;

/// Extension used when a code request names none, or a malformed one
pub const DEFAULT_CODE_EXTENSION: &str = "txt";

/// Kind-specific payload of a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `<Deepthink: description>`
    FollowupThought { description: String },
    /// `<imageGenerate: query>`
    ImageRequest { query: String },
    /// `<codeSimple(ext): task>`
    CodeRequest { extension: String, task: String },
}

/// A directive marker found in a generation response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Byte range of the marker in the scanned text
    pub span: Range<usize>,
}

impl Directive {
    pub fn new(kind: DirectiveKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Image and code requests end dispatch
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, DirectiveKind::FollowupThought { .. })
    }
}
