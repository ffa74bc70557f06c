//! Search index capability family.
//!
//! Two interchangeable REST-backed servants (ZincSearch and
//! Meilisearch) behind one fixed operation set. Like SMS, search has
//! no default backend: a suite that activates neither `Zinc` nor
//! `Meili` has no search capability, which callers detect by probing
//! before selecting.

pub mod meili;
pub mod zinc;

use async_trait::async_trait;

use crate::client::HttpClient;
use crate::config::features::Suite;
use crate::config::Settings;
use crate::error::PatchbayError;
use crate::select::{BackendSelector, Servant};

#[async_trait]
pub trait SearchIndexer: Servant + Send + Sync {
    /// Insert or replace one document under `id`.
    async fn put_document(
        &self,
        id: &str,
        doc: &serde_json::Value,
    ) -> Result<(), PatchbayError>;

    /// Run a paged query and return the backend's raw hit payload.
    async fn search(
        &self,
        query: &str,
        offset: u64,
        limit: u64,
    ) -> Result<serde_json::Value, PatchbayError>;
}

/// Construct the one active search backend for this run.
///
/// Candidate order (first match wins): `Zinc`, `Meili`; no default.
pub fn select_search(
    settings: &Settings,
    suite: &Suite,
    client: &HttpClient,
) -> Result<Box<dyn SearchIndexer>, PatchbayError> {
    BackendSelector::<Box<dyn SearchIndexer>>::new("search index")
        .when("Zinc", || {
            Ok(Box::new(zinc::ZincIndexer::new(
                settings.zinc.clone(),
                client.clone(),
            )) as Box<dyn SearchIndexer>)
        })
        .when("Meili", || {
            Ok(Box::new(meili::MeiliIndexer::new(
                settings.meili.clone(),
                client.clone(),
            )) as Box<dyn SearchIndexer>)
        })
        .select(suite)
}
