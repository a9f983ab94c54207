//! Shapes relay - Text generation over a single POST endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::errors::ServiceError;
use crate::domain::entities::GenerationRequest;
use crate::domain::traits::GenerationService;

/// Relay response body; other fields are ignored
#[derive(Deserialize, Debug)]
struct RelayResponse {
    response: String,
}

/// Relay client
pub struct RelayClient {
    url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl GenerationService for RelayClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let response = self.client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        let data: RelayResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.response)
    }
}
