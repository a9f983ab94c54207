use async_trait::async_trait;
use crate::domain::entities::{DispatchOutcome, IncomingMessage};
use crate::application::errors::BotError;

/// Chat platform trait - abstraction for messaging platform adapters
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Show the typing indicator in a channel
    async fn send_typing(&self, channel_id: &str) -> Result<(), BotError>;

    /// Reply to a message with text or a file
    async fn reply(&self, to: &IncomingMessage, outcome: &DispatchOutcome) -> Result<(), BotError>;

    /// Most recent messages of a channel, newest first
    async fn recent_messages(&self, channel_id: &str, limit: usize) -> Result<Vec<IncomingMessage>, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
