//! Image search - Lexica-style `GET ?q=` lookup

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::errors::ServiceError;
use crate::domain::traits::ImageSearch;

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    images: Vec<ImageResult>,
}

#[derive(Deserialize, Debug)]
struct ImageResult {
    src: String,
}

/// Lexica search client
pub struct LexicaClient {
    url: String,
    client: Client,
}

impl LexicaClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ImageSearch for LexicaClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        let response = self.client
            .get(&self.url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.images.into_iter().map(|i| i.src).collect())
    }
}
