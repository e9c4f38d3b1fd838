//! Clients for the remote recognition and search services.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod noop;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One ranked prediction from the recognition service. Order is the
/// service's ranking; the score is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagScore {
    pub tag: String,
    pub confidence: f32,
}

/// One matching image from the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "file-name")]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagScore>>,
}

#[async_trait::async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(
        &self,
        file_name: &str,
        mime: &str,
        image: Bytes,
    ) -> Result<Vec<Prediction>, ServiceError>;
}

#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError>;
}
