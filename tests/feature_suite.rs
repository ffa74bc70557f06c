//! Integration tests for suite activation and feature-test expressions
//! driven end-to-end from a parsed document.

use patchbay::config::{parse_document, Settings};
use patchbay::error::PatchbayError;
use patchbay::migrate::{self, SqlDriver};

const DOC: &str = r#"
Features:
  LocalOSS: { Default: true }
  MySQL: { Default: true }
  Postgres: {}
  Sqlite3: {}
  Migration: {}
  Sms: { Value: SmsJuhe }
"#;

fn settings() -> Settings {
    let raw = parse_document("yaml", DOC, "inline").unwrap();
    Settings::resolve(raw).unwrap()
}

fn req(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

#[test]
fn requested_features_are_active() {
    let suite = settings()
        .features
        .activate(&req(&["Postgres", "Migration"]), true)
        .unwrap();
    assert!(suite.cfg_if("Postgres"));
    assert!(suite.cfg_if("Migration"));
    assert!(!suite.cfg_if("LocalOSS"));
}

#[test]
fn default_features_union_into_the_suite() {
    let suite = settings().features.activate(&req(&["Sms"]), false).unwrap();
    assert!(suite.cfg_if("Sms"));
    assert!(suite.cfg_if("LocalOSS"));
    assert!(suite.cfg_if("MySQL"));
}

#[test]
fn empty_request_with_no_default_yields_empty_suite() {
    let suite = settings().features.activate(&[], true).unwrap();
    assert!(suite.is_empty());
    assert!(!suite.cfg_if("LocalOSS"));
}

#[test]
fn unknown_feature_aborts_activation() {
    let err = settings()
        .features
        .activate(&req(&["LocalOSS", "Webhooks"]), true)
        .unwrap_err();
    assert!(matches!(
        err,
        PatchbayError::UnknownFeature { ref name, .. } if name == "Webhooks"
    ));
}

#[test]
fn value_tests_compare_the_configured_choice() {
    let suite = settings().features.activate(&req(&["Sms"]), true).unwrap();
    assert!(suite.cfg_if("Sms"));
    assert!(suite.cfg_if("Sms = SmsJuhe"));
    assert!(!suite.cfg_if("Sms = SmsAliyun"));
    assert_eq!(suite.cfg("Sms"), Some("SmsJuhe"));
    assert_eq!(suite.cfg("LocalOSS"), None);
}

#[test]
fn probing_undeclared_names_is_benign() {
    let suite = settings().features.activate(&[], false).unwrap();
    assert!(!suite.cfg_if("NeverDeclared"));
    assert!(!suite.cfg_if("NeverDeclared = Anything"));
}

#[test]
fn sql_driver_selection_follows_declared_priority() {
    let features = settings().features;

    let suite = features.activate(&req(&["Sqlite3"]), true).unwrap();
    assert_eq!(migrate::select_driver(&suite).unwrap(), SqlDriver::Sqlite);

    let suite = features.activate(&req(&["Postgres", "Sqlite3"]), true).unwrap();
    assert_eq!(migrate::select_driver(&suite).unwrap(), SqlDriver::Postgres);

    let suite = features
        .activate(&req(&["MySQL", "Postgres", "Sqlite3"]), true)
        .unwrap();
    assert_eq!(migrate::select_driver(&suite).unwrap(), SqlDriver::MySql);

    // Nothing database-ish in the suite: MySQL is the designated default.
    let suite = features.activate(&req(&["LocalOSS"]), true).unwrap();
    assert_eq!(migrate::select_driver(&suite).unwrap(), SqlDriver::MySql);
}
