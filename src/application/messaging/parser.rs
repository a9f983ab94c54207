//! Message parser - Normalizes incoming messages into prompts

use crate::domain::entities::{IncomingMessage, MediaKind, Prompt, PromptPart};

/// Strips bot addressing from message text and builds the generation prompt
#[derive(Debug, Clone)]
pub struct MessageParser {
    bot_id: String,
    command_prefix: String,
}

impl MessageParser {
    pub fn new(bot_id: impl Into<String>, command_prefix: impl Into<String>) -> Self {
        Self {
            bot_id: bot_id.into(),
            command_prefix: command_prefix.into(),
        }
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    /// Length of a leading `<@id>` or `<@!id>` mention of the bot
    fn mention_len(&self, text: &str) -> Option<usize> {
        let rest = text.strip_prefix("<@")?;
        let (marker, rest) = match rest.strip_prefix('!') {
            Some(rest) => (1, rest),
            None => (0, rest),
        };
        rest.strip_prefix(self.bot_id.as_str())?.strip_prefix('>')?;
        Some(2 + marker + self.bot_id.len() + 1)
    }

    /// Whether the message text opens with a mention of the bot
    pub fn is_mention(&self, content: &str) -> bool {
        !self.bot_id.is_empty() && self.mention_len(content.trim_start()).is_some()
    }

    /// Whether the raw message text opens with the command prefix
    pub fn is_command(&self, content: &str) -> bool {
        !self.command_prefix.is_empty() && content.starts_with(&self.command_prefix)
    }

    /// Remove a leading mention, then a command prefix directly at the start
    /// of what remains, and trim the rest
    pub fn strip_addressing<'a>(&self, content: &'a str) -> &'a str {
        let mut text = content;
        if !self.bot_id.is_empty() {
            let trimmed = content.trim_start();
            if let Some(len) = self.mention_len(trimmed) {
                text = &trimmed[len..];
            }
        }
        if !self.command_prefix.is_empty() {
            if let Some(rest) = text.strip_prefix(self.command_prefix.as_str()) {
                text = rest;
            }
        }
        text.trim()
    }

    /// Build the prompt for a single message.
    ///
    /// Text is attributed to the author's display name. Audio wins over
    /// image; among attachments of one kind the last one is used.
    pub fn build_prompt(&self, message: &IncomingMessage) -> Prompt {
        let stripped = self.strip_addressing(&message.content);
        let text = (!stripped.is_empty())
            .then(|| format!("User {} said: {}", message.author.display_name(), stripped));

        let last_of = |kind: MediaKind| {
            message
                .attachments
                .iter()
                .rev()
                .find(|a| a.kind == kind)
                .map(|a| a.url.clone())
        };
        let media = match last_of(MediaKind::Audio) {
            Some(url) => Some(PromptPart::audio(url)),
            None => last_of(MediaKind::Image).map(PromptPart::image),
        };

        Prompt::from_parts(text, media)
    }
}
