//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod prompt;
pub mod directive;
pub mod outcome;
pub mod channel;

pub use user::User;
pub use message::{IncomingMessage, MediaKind};
pub use prompt::{GenerationRequest, Prompt, PromptPart};
pub use directive::{Directive, DirectiveKind, DEFAULT_CODE_EXTENSION};
pub use outcome::{DispatchOutcome, FileAttachment};
pub use channel::ChannelConfig;
