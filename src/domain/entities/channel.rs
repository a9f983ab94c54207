use serde::{Deserialize, Serialize};

/// Per-guild dedicated channel designation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub guild_id: String,
    pub channel_id: String,
}

impl ChannelConfig {
    pub fn new(guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
        }
    }

    pub fn is_dedicated(&self, channel_id: &str) -> bool {
        self.channel_id == channel_id
    }
}
