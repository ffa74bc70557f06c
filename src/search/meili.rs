//! Meilisearch servant.
//!
//! Documents go to `POST /indexes/{uid}/documents`, queries to
//! `POST /indexes/{uid}/search`, authorized by bearer API key.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use semver::Version;

use super::SearchIndexer;
use crate::client::{self, HttpClient};
use crate::config::model::MeiliSetting;
use crate::error::PatchbayError;
use crate::select::Servant;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MeiliIndexer {
    setting: MeiliSetting,
    client: HttpClient,
}

impl MeiliIndexer {
    #[must_use]
    pub fn new(setting: MeiliSetting, client: HttpClient) -> Self {
        Self { setting, client }
    }

    async fn post(&self, uri: String, body: Vec<u8>) -> Result<Bytes, PatchbayError> {
        let mut builder = hyper::Request::builder()
            .method(hyper::Method::POST)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json");
        if !self.setting.api_key.is_empty() {
            builder = builder.header(
                http::header::AUTHORIZATION,
                format!("Bearer {}", self.setting.api_key),
            );
        }
        let req = builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| PatchbayError::HttpRequest {
                source: Box::new(e),
            })?;

        let (status, body) = client::send(&self.client, req, REQUEST_TIMEOUT).await?;
        if !status.is_success() {
            return Err(PatchbayError::SearchBackend {
                backend: self.name(),
                detail: format!("status {status}"),
            });
        }
        Ok(body)
    }
}

impl Servant for MeiliIndexer {
    fn name(&self) -> &'static str {
        "Meili"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }
}

#[async_trait]
impl SearchIndexer for MeiliIndexer {
    async fn put_document(
        &self,
        id: &str,
        doc: &serde_json::Value,
    ) -> Result<(), PatchbayError> {
        let uri = format!("{}/indexes/{}/documents", self.setting.endpoint, self.setting.index);
        // Meilisearch takes a batch; a single upsert is a one-element
        // batch with an explicit primary key.
        let mut doc = doc.clone();
        if let Some(map) = doc.as_object_mut() {
            map.insert("id".into(), serde_json::Value::String(id.to_string()));
        }
        let payload = serde_json::Value::Array(vec![doc]);
        self.post(uri, payload.to_string().into_bytes()).await?;
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        offset: u64,
        limit: u64,
    ) -> Result<serde_json::Value, PatchbayError> {
        let uri = format!("{}/indexes/{}/search", self.setting.endpoint, self.setting.index);
        let payload = serde_json::json!({
            "q": query,
            "offset": offset,
            "limit": limit,
        });
        let body = self.post(uri, payload.to_string().into_bytes()).await?;
        serde_json::from_slice(&body).map_err(|e| PatchbayError::HttpRequest {
            source: Box::new(e),
        })
    }
}
