//! Integration tests for the local-disk object storage servant and the
//! storage backend selection path.

use patchbay::config::model::LocalOssSetting;
use patchbay::config::Settings;
use patchbay::error::PatchbayError;
use patchbay::select::Servant;
use patchbay::storage::local::LocalStorage;
use patchbay::storage::{select_storage, ObjectStorage};

fn local_setting(root: &std::path::Path) -> LocalOssSetting {
    LocalOssSetting {
        save_path: root.to_path_buf(),
        secure: false,
        bucket: "public".into(),
        domain: "127.0.0.1:8008".into(),
    }
}

fn storage(root: &std::path::Path) -> LocalStorage {
    LocalStorage::open(&local_setting(root)).unwrap()
}

fn object_path(root: &std::path::Path, key: &str) -> std::path::PathBuf {
    root.join("public").join(key)
}

#[tokio::test]
async fn put_object_writes_and_returns_the_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let payload = vec![7u8; 50];
    let mut reader: &[u8] = &payload;
    let url = storage
        .put_object("a/b.png", &mut reader, 50, "image/png")
        .await
        .unwrap();

    assert!(url.ends_with("a/b.png"));
    assert_eq!(url, "http://127.0.0.1:8008/oss/a/b.png");

    let on_disk = tokio::fs::read(object_path(dir.path(), "a/b.png"))
        .await
        .unwrap();
    assert_eq!(on_disk, payload);
}

#[tokio::test]
async fn short_reader_leaves_no_object_behind() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let payload = vec![1u8; 90];
    let mut reader: &[u8] = &payload;
    let err = storage
        .put_object("a/b.png", &mut reader, 100, "image/png")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PatchbayError::ShortWrite {
            expected: 100,
            written: 90,
            ..
        }
    ));

    // Nothing retrievable at the key, and no staging leftovers either.
    let read = tokio::fs::read(object_path(dir.path(), "a/b.png")).await;
    assert_eq!(read.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    let mut entries = tokio::fs::read_dir(object_path(dir.path(), "a"))
        .await
        .unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn failed_put_does_not_disturb_the_existing_object() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let original = vec![2u8; 50];
    let mut reader: &[u8] = &original;
    storage
        .put_object("a/b.png", &mut reader, 50, "image/png")
        .await
        .unwrap();

    let short = vec![3u8; 10];
    let mut reader: &[u8] = &short;
    let err = storage
        .put_object("a/b.png", &mut reader, 64, "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, PatchbayError::ShortWrite { .. }));

    let on_disk = tokio::fs::read(object_path(dir.path(), "a/b.png"))
        .await
        .unwrap();
    assert_eq!(on_disk, original);
}

#[tokio::test]
async fn concurrent_puts_to_different_keys_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let first = vec![4u8; 32];
    let second = vec![5u8; 48];
    let mut reader_a: &[u8] = &first;
    let mut reader_b: &[u8] = &second;

    let (a, b) = tokio::join!(
        storage.put_object("x/one.bin", &mut reader_a, 32, "application/octet-stream"),
        storage.put_object("x/two.bin", &mut reader_b, 48, "application/octet-stream"),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(
        tokio::fs::read(object_path(dir.path(), "x/one.bin"))
            .await
            .unwrap(),
        first
    );
    assert_eq!(
        tokio::fs::read(object_path(dir.path(), "x/two.bin"))
            .await
            .unwrap(),
        second
    );
}

#[tokio::test]
async fn sign_url_rejects_negative_and_accepts_zero_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let err = storage.sign_url("a/b.png", -1).await.unwrap_err();
    assert!(matches!(err, PatchbayError::InvalidExpiry(-1)));

    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let url = storage.sign_url("a/b.png", 0).await.unwrap();
    let after = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let (_, expired) = url.split_once("?expired=").unwrap();
    let expired: i64 = expired.parse().unwrap();
    assert!(expired >= before && expired <= after);
}

#[tokio::test]
async fn sign_url_embeds_an_absolute_expiration() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let url = storage.sign_url("docs/report.pdf", 300).await.unwrap();

    let (base, expired) = url.split_once("?expired=").unwrap();
    assert!(base.ends_with("docs/report.pdf"));
    let expired: i64 = expired.parse().unwrap();
    assert!(expired >= now + 300 && expired <= now + 301);
}

#[test]
fn object_key_inverts_object_url() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(dir.path());
    for key in ["a/b.png", "one.txt", "nested/deeply/file.tar.gz"] {
        assert_eq!(storage.object_key(&storage.object_url(key)), key);
    }
}

#[tokio::test]
async fn suite_with_local_oss_selects_the_local_backend_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut settings = Settings::default();
    settings.local_oss = local_setting(dir.path());
    settings
        .features
        .declare("LocalOSS", Default::default());
    let suite = settings
        .features
        .activate(&["LocalOSS".to_string()], true)
        .unwrap();

    let backend = select_storage(&settings, &suite).unwrap();
    assert_eq!(backend.name(), "LocalOSS");

    let payload = vec![9u8; 50];
    let mut reader: &[u8] = &payload;
    let url = backend
        .put_object("a/b.png", &mut reader, 50, "image/png")
        .await
        .unwrap();
    assert!(url.ends_with("a/b.png"));
    assert_eq!(backend.object_key(&url), "a/b.png");

    // A mismatched second put fails and the first object is unaffected.
    let short = vec![0u8; 10];
    let mut reader: &[u8] = &short;
    assert!(backend
        .put_object("a/b.png", &mut reader, 50, "image/png")
        .await
        .is_err());
    assert_eq!(
        tokio::fs::read(object_path(dir.path(), "a/b.png"))
            .await
            .unwrap(),
        payload
    );
}

#[tokio::test]
async fn empty_suite_falls_back_to_the_default_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.local_oss = local_setting(dir.path());
    let suite = settings.features.activate(&[], true).unwrap();

    let backend = select_storage(&settings, &suite).unwrap();
    assert_eq!(backend.name(), "LocalOSS");
}
