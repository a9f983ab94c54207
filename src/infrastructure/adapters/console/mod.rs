//! Console adapter for development/testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::domain::entities::{DispatchOutcome, FileAttachment, IncomingMessage, User};
use crate::domain::traits::{BotInfo, ChatPlatform};
use crate::application::errors::BotError;

pub const CONSOLE_GUILD: &str = "console-guild";
pub const CONSOLE_CHANNEL: &str = "console";

/// Messages kept for ambient history
const HISTORY_CAPACITY: usize = 50;

/// The local typist, nicknamed after the login name when there is one
fn console_user(login: Option<String>) -> User {
    let user = User::new("console-user", "you");
    match login {
        Some(login) => user.with_nickname(login),
        None => user,
    }
}

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    user: User,
    /// Newest first
    history: Mutex<VecDeque<IncomingMessage>>,
}

impl ConsoleAdapter {
    pub fn new(bot_id: impl Into<String>, bot_name: impl Into<String>) -> Self {
        let name = bot_name.into();
        Self {
            info: BotInfo {
                id: bot_id.into(),
                name: name.clone(),
                username: name,
            },
            user: console_user(std::env::var("USER").ok()),
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Turn a typed line into a message. `> ` marks a reply to the bot,
    /// `+<url>` words become attachments.
    pub fn parse_line(&self, line: &str) -> IncomingMessage {
        let (line, reply) = match line.strip_prefix("> ") {
            Some(rest) => (rest, true),
            None => (line, false),
        };

        let mut attachments = Vec::new();
        let content = line
            .split(' ')
            .filter(|word| match word.strip_prefix('+') {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                    attachments.push(url.to_string());
                    false
                }
                _ => true,
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut message = IncomingMessage::new(self.user.clone(), CONSOLE_CHANNEL, content.trim_end())
            .in_guild(CONSOLE_GUILD);
        for url in attachments {
            message = message.with_attachment(url);
        }
        if reply {
            message = message.replying_to(self.info.id.clone());
        }
        message
    }

    fn remember(&self, message: IncomingMessage) -> Result<(), BotError> {
        let mut history = self.history.lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?;
        history.push_front(message);
        history.truncate(HISTORY_CAPACITY);
        Ok(())
    }

    /// Read the next non-empty line from stdin and record it in the history.
    /// `None` at end of input.
    pub async fn next_message<R>(&self, lines: &mut tokio::io::Lines<R>) -> Result<Option<IncomingMessage>, BotError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
    {
        loop {
            let Some(line) = lines.next_line().await
                .map_err(|e| BotError::Platform(e.to_string()))?
            else {
                return Ok(None);
            };
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let message = self.parse_line(line);
            self.remember(message.clone())?;
            return Ok(Some(message));
        }
    }

    pub fn stdin_lines() -> tokio::io::Lines<BufReader<tokio::io::Stdin>> {
        BufReader::new(tokio::io::stdin()).lines()
    }

    fn render(outcome: &DispatchOutcome) -> String {
        match outcome {
            DispatchOutcome::Reply(text) => format!("[BOT] {}", text),
            DispatchOutcome::File(FileAttachment::Url(url)) => format!("[BOT] [file] {}", url),
            DispatchOutcome::File(FileAttachment::Bytes { name, data }) => {
                format!(
                    "[BOT] [file] {} ({} bytes)\n{}",
                    name,
                    data.len(),
                    String::from_utf8_lossy(data)
                )
            }
        }
    }
}

#[async_trait]
impl ChatPlatform for ConsoleAdapter {
    async fn send_typing(&self, _channel_id: &str) -> Result<(), BotError> {
        println!("[BOT] ...");
        Ok(())
    }

    async fn reply(&self, to: &IncomingMessage, outcome: &DispatchOutcome) -> Result<(), BotError> {
        println!("{}", Self::render(outcome));

        let text = match outcome {
            DispatchOutcome::Reply(text) => text.clone(),
            DispatchOutcome::File(file) => format!("[file] {}", file.name()),
        };
        let bot = User::new(self.info.id.clone(), self.info.username.clone()).as_bot();
        self.remember(IncomingMessage::new(bot, to.channel_id.clone(), text).in_guild(CONSOLE_GUILD))
    }

    async fn recent_messages(&self, channel_id: &str, limit: usize) -> Result<Vec<IncomingMessage>, BotError> {
        let history = self.history.lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?;
        Ok(history
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
