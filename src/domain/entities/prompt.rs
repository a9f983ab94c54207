use serde::Serialize;

/// URL wrapper used by media prompt parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaUrl {
    pub url: String,
}

/// One typed part of a multimodal prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptPart {
    Text { text: String },
    ImageUrl { image_url: MediaUrl },
    AudioUrl { audio_url: MediaUrl },
}

impl PromptPart {
    #[cfg(test)]
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        PromptPart::ImageUrl {
            image_url: MediaUrl { url: url.into() },
        }
    }

    pub fn audio(url: impl Into<String>) -> Self {
        PromptPart::AudioUrl {
            audio_url: MediaUrl { url: url.into() },
        }
    }
}

/// Prompt sent to the generation service.
///
/// Serializes as a bare string or as an ordered array of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Parts(Vec<PromptPart>),
}

impl Prompt {
    /// Build a prompt from an optional text part and an optional media part.
    /// A lone text part collapses to a bare string.
    pub fn from_parts(text: Option<String>, media: Option<PromptPart>) -> Self {
        match (text, media) {
            (Some(text), None) => Prompt::Text(text),
            (text, media) => {
                let mut parts = Vec::with_capacity(2);
                if let Some(text) = text {
                    parts.push(PromptPart::Text { text });
                }
                parts.extend(media);
                Prompt::Parts(parts)
            }
        }
    }

    #[cfg(test)]
    pub fn parts(&self) -> &[PromptPart] {
        match self {
            Prompt::Text(_) => &[],
            Prompt::Parts(parts) => parts,
        }
    }
}

/// Body of a relay call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: Prompt,
    pub user_id: String,
    pub channel_id: String,
}

impl GenerationRequest {
    pub fn new(prompt: Prompt, user_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            prompt,
            user_id: user_id.into(),
            channel_id: channel_id.into(),
        }
    }
}
