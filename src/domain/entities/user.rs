use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Guild-specific nickname, if the member has one
    pub nickname: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            nickname: None,
            is_bot: false,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Nickname when set and non-empty, otherwise the username
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nick) if !nick.is_empty() => nick,
            _ => &self.username,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
