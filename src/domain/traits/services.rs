use async_trait::async_trait;
use crate::application::errors::ServiceError;
use crate::domain::entities::GenerationRequest;

/// Remote text generation (the relay)
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError>;
}

/// Image lookup by free-text query
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Image URLs, best match first
    async fn search(&self, query: &str) -> Result<Vec<String>, ServiceError>;
}

/// Single-turn text classifier used to gate ambient replies
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// `None` when the service answered without any text
    async fn ask(&self, prompt: &str) -> Result<Option<String>, ServiceError>;
}
