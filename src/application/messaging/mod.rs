//! Message handling - Engagement decision and response directives

pub mod ambient;
pub mod decider;
pub mod directives;
pub mod dispatcher;
pub mod parser;

pub use ambient::AmbientGate;
pub use decider::{EngagementDecider, EngagementDecision};
pub use dispatcher::DirectiveDispatcher;
pub use parser::MessageParser;
