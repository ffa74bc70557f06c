//! Non-interactive starter config generation.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::features::FeatureDecl;
use crate::config::Settings;
use crate::error::PatchbayError;

use super::serialize::serialize_document;

/// A settings document with every section at its defaults and a
/// conventional feature declaration block: local storage and MySQL
/// default-on, the alternatives declared but off.
pub fn starter_settings() -> Settings {
    let mut settings = Settings::default();
    let features = &mut settings.features;
    features.declare(
        "LocalOSS",
        FeatureDecl {
            default: true,
            value: None,
        },
    );
    features.declare(
        "MySQL",
        FeatureDecl {
            default: true,
            value: None,
        },
    );
    features.declare("Migration", FeatureDecl::default());
    features.declare("MinIO", FeatureDecl::default());
    features.declare("S3", FeatureDecl::default());
    features.declare("Postgres", FeatureDecl::default());
    features.declare("Sqlite3", FeatureDecl::default());
    features.declare(
        "Sms",
        FeatureDecl {
            default: false,
            value: Some("SmsJuhe".into()),
        },
    );
    features.declare("Zinc", FeatureDecl::default());
    features.declare("Meili", FeatureDecl::default());
    settings
}

pub fn run(args: &InitArgs) -> Result<(), PatchbayError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("patchbay.{}", args.format.extension())));

    if output.exists() {
        return Err(PatchbayError::FileExists { path: output });
    }

    let content = match args.format {
        // The YAML template is hand-written so it can carry comments.
        ConfigFormat::Yaml => YAML_TEMPLATE.to_string(),
        _ => serialize_document(&starter_settings(), &args.format)?,
    };

    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    println!("  patchbay validate {}        Check it", output.display());
    println!("  patchbay check -c {}        Resolve backends", output.display());
    Ok(())
}

const YAML_TEMPLATE: &str = r#"# Patchbay starter configuration.
#
# Every section below is decoded at startup whether or not its feature
# is active; the Features block decides which backends actually run.

App:
  RunMode: debug
  MaxUploadSize: 10485760

Server:
  HttpIp: 0.0.0.0
  HttpPort: 8008
  ReadTimeout: 60   # seconds
  WriteTimeout: 60  # seconds

Features:
  # Default: true features activate even without -F/--features.
  LocalOSS: { Default: true }
  MySQL: { Default: true }
  Migration: {}
  MinIO: {}
  S3: {}
  Postgres: {}
  Sqlite3: {}
  # The feature value names the chosen provider.
  Sms: { Value: SmsJuhe }
  Zinc: {}
  Meili: {}

LocalOSS:
  SavePath: custom/data/patchbay/oss
  Secure: false
  Bucket: public
  Domain: 127.0.0.1:8008

MinIO:
  AccessKey: ""
  SecretKey: ""
  Endpoint: 127.0.0.1:9000
  Secure: false
  Bucket: public
  Domain: 127.0.0.1:9000

S3:
  AccessKey: ""
  SecretKey: ""
  Region: us-east-1
  Secure: true
  Bucket: public
  Domain: s3.amazonaws.com

MySQL:
  Username: patchbay
  Password: ""
  Host: 127.0.0.1:3306
  DBName: patchbay

Postgres:
  Username: patchbay
  Password: ""
  Host: 127.0.0.1:5432
  DBName: patchbay
  SslMode: disable

Sqlite3:
  Path: custom/data/patchbay/patchbay.db

Redis:
  InitAddress: 127.0.0.1:6379
  Username: ""
  Password: ""

JWT:
  Secret: ""
  Issuer: patchbay
  Expire: 86400  # seconds

SmsJuhe:
  Gateway: https://v.juhe.cn/sms/send
  Key: ""
  TplId: ""
  TplKeyName: code

Zinc:
  Endpoint: http://127.0.0.1:4080
  Index: patchbay
  User: admin
  Password: ""

Meili:
  Endpoint: http://127.0.0.1:7700
  Index: patchbay
  ApiKey: ""
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_document, Settings};

    #[test]
    fn yaml_template_round_trips_through_the_resolver() {
        let raw = parse_document("yaml", YAML_TEMPLATE, "template").unwrap();
        let settings = Settings::resolve(raw).unwrap();
        assert!(settings.features.get("LocalOSS").unwrap().default);
        assert_eq!(
            settings.features.get("Sms").unwrap().value.as_deref(),
            Some("SmsJuhe")
        );
        assert_eq!(settings.server.http_port, 8008);
    }

    #[test]
    fn starter_settings_match_the_yaml_template_suite() {
        let settings = starter_settings();
        let suite = settings.features.activate(&[], false).unwrap();
        assert!(suite.cfg_if("LocalOSS"));
        assert!(suite.cfg_if("MySQL"));
        assert!(!suite.cfg_if("Migration"));
    }
}
