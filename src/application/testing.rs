//! Hand-written collaborator mocks shared by application tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::errors::{BotError, ServiceError, StorageError};
use crate::domain::entities::{ChannelConfig, DispatchOutcome, GenerationRequest, IncomingMessage};
use crate::domain::traits::{
    BotInfo, ChannelConfigStore, ChatPlatform, GenerationService, ImageSearch, TopicClassifier,
};

pub const BOT_ID: &str = "999";

/// Records every platform interaction
#[derive(Default)]
pub struct MockPlatform {
    history: Vec<IncomingMessage>,
    fail_history: bool,
    typing: Mutex<Vec<String>>,
    replies: Mutex<Vec<DispatchOutcome>>,
    history_requests: Mutex<Vec<(String, usize)>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, history: Vec<IncomingMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn failing_history(mut self) -> Self {
        self.fail_history = true;
        self
    }

    pub fn replies(&self) -> Vec<DispatchOutcome> {
        self.replies.lock().unwrap().clone()
    }

    pub fn typing(&self) -> Vec<String> {
        self.typing.lock().unwrap().clone()
    }

    pub fn history_requests(&self) -> Vec<(String, usize)> {
        self.history_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn send_typing(&self, channel_id: &str) -> Result<(), BotError> {
        self.typing.lock().unwrap().push(channel_id.to_string());
        Ok(())
    }

    async fn reply(&self, _to: &IncomingMessage, outcome: &DispatchOutcome) -> Result<(), BotError> {
        self.replies.lock().unwrap().push(outcome.clone());
        Ok(())
    }

    async fn recent_messages(&self, channel_id: &str, limit: usize) -> Result<Vec<IncomingMessage>, BotError> {
        self.history_requests
            .lock()
            .unwrap()
            .push((channel_id.to_string(), limit));
        if self.fail_history {
            return Err(BotError::Platform("history unavailable".into()));
        }
        Ok(self.history.iter().take(limit).cloned().collect())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: BOT_ID.to_string(),
            name: "shape".to_string(),
            username: "shape".to_string(),
        }
    }
}

/// Replays scripted relay answers in order and records requests
#[derive(Default)]
pub struct MockGeneration {
    answers: Mutex<VecDeque<Result<String, ServiceError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl MockGeneration {
    pub fn new(answers: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn replying(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for MockGeneration {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Network("no scripted answer".into())))
    }
}

/// Fixed image search results
#[derive(Default)]
pub struct MockImageSearch {
    results: Option<Result<Vec<String>, ServiceError>>,
    queries: Mutex<Vec<String>>,
}

impl MockImageSearch {
    pub fn returning(urls: &[&str]) -> Self {
        Self {
            results: Some(Ok(urls.iter().map(|u| u.to_string()).collect())),
            ..Self::default()
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            results: Some(Err(error)),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for MockImageSearch {
    async fn search(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Replays scripted classifier answers in order
#[derive(Default)]
pub struct MockClassifier {
    answers: Mutex<VecDeque<Result<Option<String>, ServiceError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn new(answers: Vec<Result<Option<String>, ServiceError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            prompts: Mutex::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicClassifier for MockClassifier {
    async fn ask(&self, prompt: &str) -> Result<Option<String>, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Network("no scripted answer".into())))
    }
}

/// In-memory channel store
#[derive(Default)]
pub struct MemoryStore {
    channels: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with(config: ChannelConfig) -> Self {
        let store = Self::default();
        store
            .channels
            .lock()
            .unwrap()
            .insert(config.guild_id, config.channel_id);
        store
    }
}

#[async_trait]
impl ChannelConfigStore for MemoryStore {
    async fn get(&self, guild_id: &str) -> Result<Option<ChannelConfig>, StorageError> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .get(guild_id)
            .map(|c| ChannelConfig::new(guild_id, c.clone())))
    }

    async fn set(&self, config: ChannelConfig) -> Result<(), StorageError> {
        self.channels
            .lock()
            .unwrap()
            .insert(config.guild_id, config.channel_id);
        Ok(())
    }

    async fn clear(&self, guild_id: &str) -> Result<bool, StorageError> {
        Ok(self.channels.lock().unwrap().remove(guild_id).is_some())
    }
}
