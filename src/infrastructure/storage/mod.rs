//! File-based storage implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::traits::ChannelConfigStore;
use crate::domain::entities::ChannelConfig;
use crate::application::errors::StorageError;

/// JSON file store of guild id -> dedicated channel id
pub struct JsonChannelStore {
    path: PathBuf,
    channels: Arc<RwLock<BTreeMap<String, String>>>,
}

impl JsonChannelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channels: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Open the store, reading existing designations. A missing file is empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self::new(path);
        store.load().await?;
        Ok(store)
    }

    async fn load(&self) -> Result<(), StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let loaded: BTreeMap<String, String> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };
        tracing::debug!("Loaded {} dedicated channels from {}", loaded.len(), self.path.display());
        *self.channels.write().await = loaded;
        Ok(())
    }

    async fn persist(&self, channels: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(channels)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelConfigStore for JsonChannelStore {
    async fn get(&self, guild_id: &str) -> Result<Option<ChannelConfig>, StorageError> {
        let channels = self.channels.read().await;
        Ok(channels
            .get(guild_id)
            .map(|channel_id| ChannelConfig::new(guild_id, channel_id.clone())))
    }

    async fn set(&self, config: ChannelConfig) -> Result<(), StorageError> {
        let mut channels = self.channels.write().await;
        channels.insert(config.guild_id, config.channel_id);
        self.persist(&channels).await
    }

    async fn clear(&self, guild_id: &str) -> Result<bool, StorageError> {
        let mut channels = self.channels.write().await;
        if channels.remove(guild_id).is_none() {
            return Ok(false);
        }
        self.persist(&channels).await?;
        Ok(true)
    }
}
