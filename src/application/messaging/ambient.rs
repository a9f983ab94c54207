//! Ambient gate - Confirms probabilistic replies against the conversation topic

use std::sync::Arc;

use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::{IncomingMessage, Prompt};
use crate::domain::traits::{ChatPlatform, TopicClassifier};

/// Messages fetched for topic classification
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const UNKNOWN_TOPIC: &str = "unknown";

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    user: &'a str,
    message: &'a str,
}

/// Serialize non-bot history, given newest first, as a chronological JSON array
pub fn serialize_history(messages: &[IncomingMessage]) -> Result<String, serde_json::Error> {
    let entries: Vec<HistoryEntry<'_>> = messages
        .iter()
        .rev()
        .filter(|m| !m.author.is_bot)
        .map(|m| HistoryEntry {
            user: m.author.display_name(),
            message: &m.content,
        })
        .collect();
    serde_json::to_string(&entries)
}

fn topic_prompt(history: &str) -> String {
    format!(
        "Two users are chatting. Here are the messages:\n{}\nDescribe the topic directly.",
        history
    )
}

fn interject_prompt(topic: &str) -> String {
    format!(
        "Users are talking about {}. If it's appropriate for the bot to respond, say \"true\", otherwise say \"false\".",
        topic
    )
}

/// Asks the classifier whether an ambient reply fits the conversation
pub struct AmbientGate {
    classifier: Arc<dyn TopicClassifier>,
    history_limit: usize,
}

impl AmbientGate {
    pub fn new(classifier: Arc<dyn TopicClassifier>) -> Self {
        Self {
            classifier,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Returns the history prompt when the bot should interject, `None`
    /// otherwise. Failures are logged and treated as a refusal.
    pub async fn confirm(&self, platform: &dyn ChatPlatform, message: &IncomingMessage) -> Option<Prompt> {
        match self.evaluate(platform, message).await {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("[{}] Ambient classification failed: {}", message.channel_id, e);
                None
            }
        }
    }

    async fn evaluate(
        &self,
        platform: &dyn ChatPlatform,
        message: &IncomingMessage,
    ) -> Result<Option<Prompt>, BotError> {
        let recent = platform
            .recent_messages(&message.channel_id, self.history_limit)
            .await?;
        let history = serialize_history(&recent)
            .map_err(|e| BotError::Internal(format!("Failed to serialize history: {}", e)))?;

        let topic = self
            .classifier
            .ask(&topic_prompt(&history))
            .await?
            .unwrap_or_else(|| UNKNOWN_TOPIC.to_string());
        tracing::debug!("[{}] Conversation topic: {}", message.channel_id, topic);

        let verdict = self.classifier.ask(&interject_prompt(&topic)).await?;
        let interject = verdict
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        if !interject {
            tracing::debug!("[{}] Classifier declined ambient reply", message.channel_id);
            return Ok(None);
        }

        Ok(Some(Prompt::Text(history)))
    }
}
