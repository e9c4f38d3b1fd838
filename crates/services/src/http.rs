use crate::{Prediction, RecognitionService, SearchHit, SearchService, ServiceError};
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct HttpServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Reqwest-backed client for both remote endpoints. The timeout applies to
/// each request as a whole; a timed-out request surfaces as `Network`.
#[derive(Clone)]
pub struct HttpTagService {
    client: Client,
    cfg: Arc<HttpServiceConfig>,
}

impl HttpTagService {
    pub fn new(cfg: HttpServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }
}

fn send_error(e: reqwest::Error) -> ServiceError {
    ServiceError::Network(e.to_string())
}

fn body_error(e: reqwest::Error) -> ServiceError {
    if e.is_decode() {
        ServiceError::Malformed(e.to_string())
    } else {
        ServiceError::Network(e.to_string())
    }
}

#[async_trait::async_trait]
impl RecognitionService for HttpTagService {
    async fn recognize(
        &self,
        file_name: &str,
        mime: &str,
        image: Bytes,
    ) -> Result<Vec<Prediction>, ServiceError> {
        let url = format!("{}/recognize-image", self.cfg.base_url);
        let part = multipart::Part::bytes(image.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let form = multipart::Form::new().part("image", part);

        debug!(%url, file_name, "sending recognition request");
        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;
        if !resp.status().is_success() {
            return Err(ServiceError::Status(resp.status().as_u16()));
        }
        let parsed: Vec<Prediction> = resp.json().await.map_err(body_error)?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl SearchService for HttpTagService {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError> {
        let url = format!("{}/search-images", self.cfg.base_url);

        debug!(%url, query, "sending search request");
        let resp = self
            .client
            .get(url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(send_error)?;
        if !resp.status().is_success() {
            return Err(ServiceError::Status(resp.status().as_u16()));
        }
        let parsed: Vec<SearchHit> = resp.json().await.map_err(body_error)?;
        Ok(parsed)
    }
}
