/// A file sent back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAttachment {
    /// Remote file the platform fetches itself
    Url(String),
    /// In-memory file with a name
    Bytes { name: String, data: Vec<u8> },
}

impl FileAttachment {
    pub fn named(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        FileAttachment::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileAttachment::Url(url) => url.rsplit('/').next().unwrap_or(url),
            FileAttachment::Bytes { name, .. } => name,
        }
    }
}

/// Final, user-visible result of handling one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Reply(String),
    File(FileAttachment),
}

impl DispatchOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        DispatchOutcome::Reply(text.into())
    }
}
