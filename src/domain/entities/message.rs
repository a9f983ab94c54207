use super::User;
use chrono::{DateTime, Utc};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

/// Media kind inferred from an attachment's file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Other,
}

impl MediaKind {
    /// Classify a URL by the extension of its path, case-insensitively.
    /// Query string and fragment are ignored.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let Some((_, ext)) = path.rsplit_once('.') else {
            return MediaKind::Other;
        };
        if ext.contains('/') {
            return MediaKind::Other;
        }

        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }
}

/// File attached to an incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub kind: MediaKind,
}

impl Attachment {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = MediaKind::from_url(&url);
        Self { url, kind }
    }
}

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: String,
    pub author: User,
    /// `None` for direct messages
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    /// Author id of the message this one replies to
    pub replied_user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(author: User, channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author,
            guild_id: None,
            channel_id: channel_id.into(),
            content: content.into(),
            attachments: Vec::new(),
            replied_user_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(Attachment::new(url));
        self
    }

    pub fn replying_to(mut self, user_id: impl Into<String>) -> Self {
        self.replied_user_id = Some(user_id.into());
        self
    }
}
