//! Integration tests for settings resolution across all file formats.

use std::time::Duration;

use patchbay::config::{self, parse_document, Settings};
use patchbay::error::PatchbayError;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn yaml_example_resolves() {
    let content = load_example("patchbay.yaml");
    let raw = parse_document("yaml", &content, "patchbay.yaml").unwrap();
    let settings = Settings::resolve(raw).unwrap();

    assert_eq!(settings.server.http_port, 8008);
    assert!(settings.features.get("LocalOSS").unwrap().default);
    assert_eq!(
        settings.features.get("Sms").unwrap().value.as_deref(),
        Some("SmsJuhe")
    );
    assert_eq!(settings.mysql.db_name, "patchbay");
}

#[cfg(feature = "json")]
#[test]
fn json_example_resolves() {
    let content = load_example("patchbay.json");
    let raw = parse_document("json", &content, "patchbay.json").unwrap();
    let settings = Settings::resolve(raw).unwrap();
    assert!(settings.features.get("MySQL").unwrap().default);
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_resolves() {
    let content = load_example("patchbay.toml");
    let raw = parse_document("toml", &content, "patchbay.toml").unwrap();
    let settings = Settings::resolve(raw).unwrap();
    assert!(settings.features.get("MySQL").unwrap().default);
}

#[cfg(all(feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_settings() {
    let yaml = Settings::resolve(
        parse_document("yaml", &load_example("patchbay.yaml"), "yaml").unwrap(),
    )
    .unwrap();
    let json = Settings::resolve(
        parse_document("json", &load_example("patchbay.json"), "json").unwrap(),
    )
    .unwrap();
    let toml = Settings::resolve(
        parse_document("toml", &load_example("patchbay.toml"), "toml").unwrap(),
    )
    .unwrap();

    assert_eq!(yaml.server.http_port, json.server.http_port);
    assert_eq!(yaml.server.http_port, toml.server.http_port);
    assert_eq!(yaml.mysql.dsn(), json.mysql.dsn());
    assert_eq!(yaml.mysql.dsn(), toml.mysql.dsn());

    let default_suite =
        |settings: &Settings| settings.features.activate(&[], false).unwrap();
    assert_eq!(
        default_suite(&yaml).names(),
        default_suite(&json).names()
    );
    assert_eq!(
        default_suite(&yaml).names(),
        default_suite(&toml).names()
    );
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_document("xml", "{}", "test.xml");
    assert!(matches!(
        result,
        Err(PatchbayError::UnsupportedFormat(ref ext)) if ext == "xml"
    ));
}

#[test]
fn absent_sections_fall_back_to_declared_defaults() {
    let doc = "App:\n  RunMode: release\n";
    let raw = parse_document("yaml", doc, "inline").unwrap();
    let settings = Settings::resolve(raw).unwrap();

    assert_eq!(settings.app.run_mode, "release");
    // Untouched sections carry their full defaults.
    assert_eq!(settings.server.http_port, 8008);
    assert_eq!(settings.server.read_timeout, Duration::from_secs(60));
    assert_eq!(settings.local_oss.bucket, "public");
    assert!(settings.features.is_empty());
}

#[test]
fn durations_are_normalized_from_bare_seconds() {
    let doc = "Server:\n  ReadTimeout: 5\n  WriteTimeout: 7\nJWT:\n  Expire: 120\n";
    let raw = parse_document("yaml", doc, "inline").unwrap();
    let settings = Settings::resolve(raw).unwrap();

    assert_eq!(settings.server.read_timeout, Duration::from_secs(5));
    assert_eq!(settings.server.write_timeout, Duration::from_secs(7));
    assert_eq!(settings.jwt.expire, Duration::from_secs(120));
}

#[test]
fn failing_section_is_named_in_the_error() {
    let doc = "Server:\n  HttpPort: not-a-number\n";
    let raw = parse_document("yaml", doc, "inline").unwrap();
    let err = Settings::resolve(raw).unwrap_err();
    assert!(matches!(
        err,
        PatchbayError::SectionDecode { section: "Server", .. }
    ));
}

#[test]
fn unknown_field_inside_a_section_is_rejected() {
    let doc = "LocalOSS:\n  SavePath: data\n  Buckets: typo\n";
    let raw = parse_document("yaml", doc, "inline").unwrap();
    let err = Settings::resolve(raw).unwrap_err();
    assert!(matches!(
        err,
        PatchbayError::SectionDecode { section: "LocalOSS", .. }
    ));
}

#[test]
fn unknown_top_level_sections_are_ignored() {
    let doc = "App:\n  RunMode: debug\nSomethingElse:\n  Key: value\n";
    let raw = parse_document("yaml", doc, "inline").unwrap();
    assert!(Settings::resolve(raw).is_ok());
}

#[tokio::test]
async fn load_resolves_and_validates_the_example() {
    let loaded = config::load(
        Some(std::path::Path::new("example/patchbay.yaml")),
        &[],
        false,
    )
    .await
    .unwrap();

    assert!(loaded.suite.cfg_if("LocalOSS"));
    assert!(loaded.suite.cfg_if("MySQL"));
    assert!(!loaded.suite.cfg_if("Migration"));
    assert_eq!(loaded.digest.len(), 64);
}

#[tokio::test]
async fn load_with_missing_explicit_path_fails() {
    let err = config::load(
        Some(std::path::Path::new("example/no-such-file.yaml")),
        &[],
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PatchbayError::ConfigFileNotFound { .. }));
}

#[tokio::test]
async fn load_with_unknown_feature_fails_before_validation() {
    let err = config::load(
        Some(std::path::Path::new("example/patchbay.yaml")),
        &["Webhooks".to_string()],
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        PatchbayError::UnknownFeature { ref name, .. } if name == "Webhooks"
    ));
}
