//! Domain layer - Core business objects and collaborator abstractions
//!
//! This layer contains:
//! - Entities: Messages, prompts, directives, outcomes
//! - Traits: Abstractions for the chat platform, storage and remote services

pub mod entities;
pub mod traits;
