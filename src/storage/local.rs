//! Local-disk object storage servant — the reference implementation of
//! the [`ObjectStorage`] contract.
//!
//! Objects live under `SavePath/Bucket/` with the key as the relative
//! path. Writes go to a uniquely named `.part` file in the destination
//! directory and are renamed into place only after the size check
//! passes, so a failed or in-flight put is never observable as a
//! complete object.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use semver::Version;
use tokio::io::{AsyncRead, AsyncWriteExt};
use uuid::Uuid;

use super::ObjectStorage;
use crate::config::model::LocalOssSetting;
use crate::error::PatchbayError;
use crate::select::Servant;

pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    /// Resolve the save path and bucket into an absolute object root.
    ///
    /// The directory itself is created lazily by the first put; only
    /// path resolution can fail here.
    pub fn open(setting: &LocalOssSetting) -> Result<Self, PatchbayError> {
        let root = std::path::absolute(&setting.save_path)?.join(&setting.bucket);
        Ok(Self {
            root,
            url_prefix: setting.url_prefix(),
        })
    }

    /// Keys are relative paths: non-empty, no traversal, no absolute or
    /// directory-shaped forms.
    fn checked_path(&self, key: &str) -> Result<PathBuf, PatchbayError> {
        let invalid = key.is_empty()
            || key.starts_with('/')
            || key.ends_with('/')
            || Path::new(key)
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if invalid {
            return Err(PatchbayError::InvalidObjectKey { key: key.into() });
        }
        Ok(self.root.join(key))
    }
}

impl Servant for LocalStorage {
    fn name(&self) -> &'static str {
        "LocalOSS"
    }

    fn version(&self) -> Version {
        Version::new(0, 2, 0)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        size: u64,
        _content_type: &str,
    ) -> Result<String, PatchbayError> {
        let dest = self.checked_path(key)?;
        if let Some(parent) = dest.parent() {
            // Pre-existing directories are fine; create_dir_all is a
            // no-op for them.
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = dest.with_file_name(format!("{file_name}.{}.part", Uuid::new_v4()));

        let mut writer = tokio::fs::File::create(&staging).await?;
        let written = match tokio::io::copy(reader, &mut writer).await {
            Ok(written) => written,
            Err(e) => {
                drop(writer);
                let _ = tokio::fs::remove_file(&staging).await;
                return Err(e.into());
            }
        };
        writer.flush().await?;
        drop(writer);

        if written != size {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(PatchbayError::ShortWrite {
                key: key.into(),
                expected: size,
                written,
            });
        }

        tokio::fs::rename(&staging, &dest).await?;
        Ok(self.object_url(key))
    }

    async fn sign_url(&self, key: &str, expires_in: i64) -> Result<String, PatchbayError> {
        if expires_in < 0 {
            return Err(PatchbayError::InvalidExpiry(expires_in));
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        let expiration = now + expires_in;

        // No cryptographic signature; see the trait doc.
        Ok(format!("{}{key}?expired={expiration}", self.url_prefix))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}{key}", self.url_prefix)
    }

    fn object_key(&self, url: &str) -> String {
        url.strip_prefix(&self.url_prefix).unwrap_or(url).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(root: &Path) -> LocalStorage {
        LocalStorage::open(&LocalOssSetting {
            save_path: root.to_path_buf(),
            secure: false,
            bucket: "public".into(),
            domain: "127.0.0.1:8008".into(),
        })
        .unwrap()
    }

    #[test]
    fn url_and_key_are_mutual_inverses() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        for key in ["a/b.png", "top.txt", "deep/er/still.bin"] {
            assert_eq!(storage.object_key(&storage.object_url(key)), key);
        }
    }

    #[test]
    fn foreign_urls_pass_through_object_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        let foreign = "https://elsewhere.example.com/oss/a.png";
        assert_eq!(storage.object_key(foreign), foreign);
    }

    #[test]
    fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        for key in ["", "/abs.png", "dir/", "../escape.png", "a/../../b.png"] {
            assert!(storage.checked_path(key).is_err(), "key {key:?} accepted");
        }
    }
}
