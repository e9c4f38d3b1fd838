use crate::{Prediction, RecognitionService, SearchHit, SearchService, ServiceError};
use bytes::Bytes;

/// Offline stand-in: recognizes nothing and matches nothing.
#[derive(Debug, Default)]
pub struct NoopService;

#[async_trait::async_trait]
impl RecognitionService for NoopService {
    async fn recognize(
        &self,
        _file_name: &str,
        _mime: &str,
        _image: Bytes,
    ) -> Result<Vec<Prediction>, ServiceError> {
        Ok(Vec::new())
    }
}

#[async_trait::async_trait]
impl SearchService for NoopService {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ServiceError> {
        Ok(Vec::new())
    }
}
