use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::ChannelConfig;

/// Store trait - persistence of dedicated channel designations
#[async_trait]
pub trait ChannelConfigStore: Send + Sync {
    async fn get(&self, guild_id: &str) -> Result<Option<ChannelConfig>, StorageError>;
    async fn set(&self, config: ChannelConfig) -> Result<(), StorageError>;
    /// Returns whether a designation was removed
    async fn clear(&self, guild_id: &str) -> Result<bool, StorageError>;
}
