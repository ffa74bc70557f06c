//! Shared outbound HTTP client for capability servants.
//!
//! The SMS and search backends talk to their providers over plain
//! JSON/form REST calls, so they share one connection-pooled hyper
//! client built here. [`send`] wraps the request/collect/timeout
//! plumbing so servants only build requests and interpret bodies.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::StatusCode;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::PatchbayError;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the
    // default provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// Send a request and collect the full response body.
pub async fn send(
    client: &HttpClient,
    req: hyper::Request<Full<Bytes>>,
    timeout: Duration,
) -> Result<(StatusCode, Bytes), PatchbayError> {
    let response = tokio::time::timeout(timeout, client.request(req))
        .await
        .map_err(|_| PatchbayError::HttpRequest {
            source: "request timed out".into(),
        })?
        .map_err(|e| PatchbayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| PatchbayError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok((status, body))
}
