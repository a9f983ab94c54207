//! Engagement decider - Whether the bot should answer a message

use rand::Rng;

use crate::domain::entities::{ChannelConfig, IncomingMessage, Prompt};
use super::parser::MessageParser;

/// Chance of an ambient reply attempt per eligible message
pub const DEFAULT_AMBIENT_PROBABILITY: f64 = 0.1;

/// Why a message explicitly addresses the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplicitReason {
    Mention,
    Command,
    ReplyToBot,
    DedicatedChannel,
}

/// Result of the engagement decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementDecision {
    ExplicitTrigger { reason: ExplicitReason, prompt: Prompt },
    AmbientTrigger { prompt: Prompt },
    NoTrigger,
}

/// Decides per message between explicit, ambient and no engagement
#[derive(Debug, Clone)]
pub struct EngagementDecider {
    parser: MessageParser,
    ambient_probability: f64,
}

impl EngagementDecider {
    pub fn new(parser: MessageParser) -> Self {
        Self {
            parser,
            ambient_probability: DEFAULT_AMBIENT_PROBABILITY,
        }
    }

    pub fn with_ambient_probability(mut self, probability: f64) -> Self {
        self.ambient_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    fn explicit_reason(
        &self,
        message: &IncomingMessage,
        channel: Option<&ChannelConfig>,
    ) -> Option<ExplicitReason> {
        if self.parser.is_mention(&message.content) {
            Some(ExplicitReason::Mention)
        } else if self.parser.is_command(&message.content) {
            Some(ExplicitReason::Command)
        } else if message.replied_user_id.as_deref() == Some(self.parser.bot_id()) {
            Some(ExplicitReason::ReplyToBot)
        } else if channel.is_some_and(|c| c.is_dedicated(&message.channel_id)) {
            Some(ExplicitReason::DedicatedChannel)
        } else {
            None
        }
    }

    /// Decide whether to engage. `rng` is only drawn from when no explicit
    /// trigger matched and ambient mode is on.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        message: &IncomingMessage,
        channel: Option<&ChannelConfig>,
        ambient_enabled: bool,
        rng: &mut R,
    ) -> EngagementDecision {
        if message.author.is_bot || message.guild_id.is_none() {
            return EngagementDecision::NoTrigger;
        }

        if let Some(reason) = self.explicit_reason(message, channel) {
            return EngagementDecision::ExplicitTrigger {
                reason,
                prompt: self.parser.build_prompt(message),
            };
        }

        if ambient_enabled && rng.random_bool(self.ambient_probability) {
            return EngagementDecision::AmbientTrigger {
                prompt: self.parser.build_prompt(message),
            };
        }

        EngagementDecision::NoTrigger
    }
}
