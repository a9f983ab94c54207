//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::services::ServiceSettings;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub engagement: EngagementConfig,
    pub relay: RelayConfig,
    pub classifier: ClassifierConfig,
    pub image_search: ImageSearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Platform user id of the bot, used for mention and reply detection
    pub user_id: String,
    pub command_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngagementConfig {
    pub ambient_enabled: bool,
    pub ambient_probability: f64,
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RelayConfig {
    pub url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClassifierConfig {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ImageSearchConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// JSON file holding dedicated channel designations
    pub path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "shape-bot".to_string(),
            user_id: "shape-bot".to_string(),
            command_prefix: "!s ".to_string(),
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            ambient_enabled: false,
            ambient_probability: 0.1,
            history_limit: 10,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
                .to_string(),
            api_key: None,
        }
    }
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            url: "https://lexica.art/api/v1/search".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dedicated-channels.json"),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Overlay environment variables on top of this config
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("SHAPES_RELAY_URL") {
            self.relay.url = Some(url);
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.classifier.api_key = Some(key);
        }
        if let Some(flag) = var("ENABLE_PASSIVE_IA") {
            self.engagement.ambient_enabled = flag == "true";
        }
        if let Some(id) = var("BOT_USER_ID") {
            self.bot.user_id = id;
        }
        if let Some(prefix) = var("BOT_PREFIX") {
            self.bot.command_prefix = prefix;
        }

        self
    }

    /// Check the values needed to run the bot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probability = self.engagement.ambient_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidValue(format!(
                "engagement.ambient-probability must be within [0, 1], got {}",
                probability
            )));
        }
        if self.relay.url.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("relay.url".to_string()));
        }
        if self.bot.user_id.is_empty() {
            return Err(ConfigError::MissingField("bot.user-id".to_string()));
        }
        Ok(())
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay.timeout_seconds)
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            command_prefix: self.bot.command_prefix.clone(),
            ambient_enabled: self.engagement.ambient_enabled,
            ambient_probability: self.engagement.ambient_probability,
            history_limit: self.engagement.history_limit,
            relay_timeout: self.relay_timeout(),
        }
    }
}
