//! Object storage capability family.
//!
//! One fixed operation set ([`ObjectStorage`]) behind which mutually
//! exclusive backends live: the always-compiled local-disk servant and,
//! behind the `s3` cargo feature, an S3-compatible servant that also
//! serves the MinIO candidate via an endpoint override. Callers obtain
//! the single active backend from [`select_storage`] and must not
//! depend on which one it is.

pub mod local;

#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::config::features::Suite;
use crate::config::Settings;
use crate::error::PatchbayError;
use crate::select::{BackendSelector, Servant};

// async_trait is required here because ObjectStorage is used as
// Box<dyn ObjectStorage> and native async fn in traits does not
// support dyn dispatch.
#[async_trait]
pub trait ObjectStorage: Servant + Send + Sync {
    /// Stream `reader` to durable storage at `key` and return the
    /// object's public URL.
    ///
    /// The write only becomes visible once exactly `size` bytes have
    /// been stored; a reader that yields more or fewer bytes fails the
    /// put and leaves nothing observable at `key`.
    async fn put_object(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        content_type: &str,
    ) -> Result<String, PatchbayError>;

    /// A URL for `key` embedding an absolute expiration timestamp.
    ///
    /// Negative expiry is rejected. The local servant performs no
    /// cryptographic signing — the `expired` query parameter is
    /// advisory, a documented simplification; deployments that need
    /// tamper-proof links should front this with real signing.
    async fn sign_url(&self, key: &str, expires_in: i64) -> Result<String, PatchbayError>;

    /// Public URL of `key`. Inverse of [`ObjectStorage::object_key`]
    /// for every key this backend produced.
    fn object_url(&self, key: &str) -> String;

    /// Key addressed by `url`. Inverse of [`ObjectStorage::object_url`].
    fn object_key(&self, url: &str) -> String;
}

/// Construct the one active object storage backend for this run.
///
/// Candidate order (first match wins): `MinIO`, `S3`, `LocalOSS`;
/// local disk is the default when nothing matches.
pub fn select_storage(
    settings: &Settings,
    suite: &Suite,
) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    BackendSelector::<Box<dyn ObjectStorage>>::new("object storage")
        .when("MinIO", || minio_backend(settings))
        .when("S3", || s3_backend(settings))
        .when("LocalOSS", || local_backend(settings))
        .or_default("LocalOSS", || local_backend(settings))
        .select(suite)
}

fn local_backend(settings: &Settings) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    Ok(Box::new(local::LocalStorage::open(&settings.local_oss)?))
}

#[cfg(feature = "s3")]
fn s3_backend(settings: &Settings) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    Ok(Box::new(s3::S3Storage::open(&settings.s3)?))
}

#[cfg(not(feature = "s3"))]
fn s3_backend(_settings: &Settings) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    Err(PatchbayError::BackendUnavailable {
        backend: "S3",
        hint: "rebuild with --features s3",
    })
}

#[cfg(feature = "s3")]
fn minio_backend(settings: &Settings) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    Ok(Box::new(s3::S3Storage::open_minio(&settings.minio)?))
}

#[cfg(not(feature = "s3"))]
fn minio_backend(_settings: &Settings) -> Result<Box<dyn ObjectStorage>, PatchbayError> {
    Err(PatchbayError::BackendUnavailable {
        backend: "MinIO",
        hint: "rebuild with --features s3",
    })
}
