//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Dedicated channel persistence
//! - LLM: Relay and classifier clients
//! - Image search: Lexica client
//! - Adapters: Platform integrations

pub mod config;
pub mod storage;
pub mod llm;
pub mod imagesearch;
pub mod adapters;
