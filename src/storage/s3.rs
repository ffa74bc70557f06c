//! S3-compatible object storage servant.
//!
//! Credentials and endpoints come entirely from the decoded settings —
//! no ambient AWS environment is consulted, so construction is
//! synchronous and deterministic. The same servant backs both the `S3`
//! and `MinIO` candidates; MinIO differs only in the endpoint override
//! and path-style addressing.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use semver::Version;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::ObjectStorage;
use crate::config::model::{MinioSetting, S3Setting};
use crate::error::PatchbayError;
use crate::select::Servant;

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_prefix: String,
    backend: &'static str,
}

impl S3Storage {
    pub fn open(setting: &S3Setting) -> Result<Self, PatchbayError> {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(setting.region.clone()))
            .credentials_provider(Credentials::new(
                setting.access_key.clone(),
                setting.secret_key.clone(),
                None,
                None,
                "patchbay-settings",
            ))
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: setting.bucket.clone(),
            url_prefix: setting.url_prefix(),
            backend: "S3",
        })
    }

    pub fn open_minio(setting: &MinioSetting) -> Result<Self, PatchbayError> {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            // MinIO ignores the region but the SDK requires one.
            .region(Region::new("us-east-1"))
            .endpoint_url(setting.endpoint_url())
            .force_path_style(true)
            .credentials_provider(Credentials::new(
                setting.access_key.clone(),
                setting.secret_key.clone(),
                None,
                None,
                "patchbay-settings",
            ))
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: setting.bucket.clone(),
            url_prefix: setting.url_prefix(),
            backend: "MinIO",
        })
    }

    fn storage_err<E>(&self, e: E) -> PatchbayError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PatchbayError::Storage {
            backend: self.backend,
            source: Box::new(e),
        }
    }
}

impl Servant for S3Storage {
    fn name(&self) -> &'static str {
        self.backend
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        content_type: &str,
    ) -> Result<String, PatchbayError> {
        // The size contract is verified before anything leaves the
        // process, so a short reader never creates a remote object.
        let mut body = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
        reader.read_to_end(&mut body).await?;
        if body.len() as u64 != size {
            return Err(PatchbayError::ShortWrite {
                key: key.into(),
                expected: size,
                written: body.len() as u64,
            });
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(Bytes::from(body)))
            .send()
            .await
            .map_err(|e| self.storage_err(e))?;

        Ok(self.object_url(key))
    }

    async fn sign_url(&self, key: &str, expires_in: i64) -> Result<String, PatchbayError> {
        if expires_in < 0 {
            return Err(PatchbayError::InvalidExpiry(expires_in));
        }

        let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in as u64))
            .map_err(|e| self.storage_err(e))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| self.storage_err(e))?;

        Ok(presigned.uri().to_string())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}{key}", self.url_prefix)
    }

    fn object_key(&self, url: &str) -> String {
        url.strip_prefix(&self.url_prefix).unwrap_or(url).to_string()
    }
}
