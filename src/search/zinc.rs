//! ZincSearch servant.
//!
//! Documents go to `PUT /api/{index}/_doc/{id}`, queries to
//! `POST /api/{index}/_search`, both under HTTP basic auth.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use http_body_util::Full;
use semver::Version;

use super::SearchIndexer;
use crate::client::{self, HttpClient};
use crate::config::model::ZincSetting;
use crate::error::PatchbayError;
use crate::select::Servant;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ZincIndexer {
    setting: ZincSetting,
    client: HttpClient,
    authorization: String,
}

impl ZincIndexer {
    #[must_use]
    pub fn new(setting: ZincSetting, client: HttpClient) -> Self {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", setting.user, setting.password));
        Self {
            setting,
            client,
            authorization: format!("Basic {token}"),
        }
    }

    async fn call(
        &self,
        method: hyper::Method,
        uri: String,
        body: Vec<u8>,
    ) -> Result<Bytes, PatchbayError> {
        let req = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::AUTHORIZATION, &self.authorization)
            .header(http::header::CONTENT_TYPE, "application/json")
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

impl Servant for ZincIndexer {
    fn name(&self) -> &'static str {
        "Zinc"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }
}

#[async_trait]
impl SearchIndexer for ZincIndexer {
    async fn put_document(
        &self,
        id: &str,
        doc: &serde_json::Value,
    ) -> Result<(), PatchbayError> {
        let uri = format!(
            "{}/api/{}/_doc/{id}",
            self.setting.endpoint, self.setting.index
        );
        let body = serde_json::to_vec(doc).map_err(|e| PatchbayError::HttpRequest {
            source: Box::new(e),
        })?;
        self.call(hyper::Method::PUT, uri, body).await?;
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        offset: u64,
        limit: u64,
    ) -> Result<serde_json::Value, PatchbayError> {
        let uri = format!(
            "{}/api/{}/_search",
            self.setting.endpoint, self.setting.index
        );
        let payload = serde_json::json!({
            "search_type": "match",
            "query": { "term": query },
            "from": offset,
            "max_results": limit,
        });
        let body = self
            .call(hyper::Method::POST, uri, payload.to_string().into_bytes())
            .await?;
        serde_json::from_slice(&body).map_err(|e| PatchbayError::HttpRequest {
            source: Box::new(e),
        })
    }
}
