//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Engagement decision, ambient gating, directive dispatch
//! - Services: One full message-handling cycle

pub mod errors;
pub mod messaging;
pub mod services;

#[cfg(test)]
pub mod testing;
