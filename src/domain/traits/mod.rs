//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod store;
pub mod services;

pub use bot::{BotInfo, ChatPlatform};
pub use store::ChannelConfigStore;
pub use services::{GenerationService, ImageSearch, TopicClassifier};
