//! Application services - Business logic orchestration

pub mod message_service;

pub use message_service::{Collaborators, MessageService, ServiceSettings};
