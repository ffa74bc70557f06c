//! Conditional settings validation.
//!
//! Decoding is unconditional, but a section's values only have to make
//! sense when its owning feature is active — a blank S3 access key is
//! fine in a run that never selects S3. [`validate`] therefore takes
//! the activated [`Suite`] and gates every section-specific check on
//! the corresponding feature test.

use super::features::Suite;
use super::Settings;
use crate::error::ValidationError;

/// Provider values the `Sms` feature can select.
pub const KNOWN_SMS_PROVIDERS: &[&str] = &["SmsJuhe"];

fn required(
    errors: &mut Vec<ValidationError>,
    section: &str,
    field: &str,
    value: &str,
    suggestion: Option<&str>,
) {
    if value.is_empty() {
        errors.push(ValidationError {
            section: section.into(),
            field: field.into(),
            message: "must not be empty".into(),
            suggestion: suggestion.map(Into::into),
        });
    }
}

pub fn validate(settings: &Settings, suite: &Suite) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.server.http_port == 0 {
        errors.push(ValidationError {
            section: "Server".into(),
            field: "HttpPort".into(),
            message: "port 0 is not a usable listen port".into(),
            suggestion: None,
        });
    }

    if suite.cfg_if("LocalOSS") {
        if settings.local_oss.save_path.as_os_str().is_empty() {
            errors.push(ValidationError {
                section: "LocalOSS".into(),
                field: "SavePath".into(),
                message: "must not be empty".into(),
                suggestion: None,
            });
        }
        required(&mut errors, "LocalOSS", "Bucket", &settings.local_oss.bucket, None);
        required(&mut errors, "LocalOSS", "Domain", &settings.local_oss.domain, None);
    }

    if suite.cfg_if("MinIO") {
        required(&mut errors, "MinIO", "Endpoint", &settings.minio.endpoint, None);
        required(&mut errors, "MinIO", "Bucket", &settings.minio.bucket, None);
        required(&mut errors, "MinIO", "AccessKey", &settings.minio.access_key, None);
        required(&mut errors, "MinIO", "SecretKey", &settings.minio.secret_key, None);
    }

    if suite.cfg_if("S3") {
        required(&mut errors, "S3", "Region", &settings.s3.region, None);
        required(&mut errors, "S3", "Bucket", &settings.s3.bucket, None);
        required(&mut errors, "S3", "AccessKey", &settings.s3.access_key, None);
        required(&mut errors, "S3", "SecretKey", &settings.s3.secret_key, None);
    }

    if suite.cfg_if("MySQL") {
        required(&mut errors, "MySQL", "Host", &settings.mysql.host, None);
        required(&mut errors, "MySQL", "DBName", &settings.mysql.db_name, None);
    }

    if suite.cfg_if("PostgreSQL") || suite.cfg_if("Postgres") {
        required(&mut errors, "Postgres", "Host", &settings.postgres.host, None);
        required(&mut errors, "Postgres", "DBName", &settings.postgres.db_name, None);
    }

    if suite.cfg_if("Sqlite3") && settings.sqlite3.path.as_os_str().is_empty() {
        errors.push(ValidationError {
            section: "Sqlite3".into(),
            field: "Path".into(),
            message: "must not be empty".into(),
            suggestion: None,
        });
    }

    if suite.contains("Sms") {
        match suite.cfg("Sms") {
            Some(provider) if KNOWN_SMS_PROVIDERS.contains(&provider) => {
                if provider == "SmsJuhe" {
                    required(
                        &mut errors,
                        "SmsJuhe",
                        "Gateway",
                        &settings.sms_juhe.gateway,
                        None,
                    );
                    required(&mut errors, "SmsJuhe", "Key", &settings.sms_juhe.key, None);
                }
            }
            Some(other) => {
                errors.push(ValidationError {
                    section: "Features".into(),
                    field: "Sms".into(),
                    message: format!("unknown SMS provider '{other}'"),
                    suggestion: Some(format!("declared providers: {}", KNOWN_SMS_PROVIDERS.join(", "))),
                });
            }
            None => {
                errors.push(ValidationError {
                    section: "Features".into(),
                    field: "Sms".into(),
                    message: "Sms is active but names no provider".into(),
                    suggestion: Some("declare it as Sms: { Value: SmsJuhe }".into()),
                });
            }
        }
    }

    if suite.cfg_if("Zinc") {
        required(&mut errors, "Zinc", "Endpoint", &settings.zinc.endpoint, None);
        required(&mut errors, "Zinc", "Index", &settings.zinc.index, None);
    }

    if suite.cfg_if("Meili") {
        required(&mut errors, "Meili", "Endpoint", &settings.meili.endpoint, None);
        required(&mut errors, "Meili", "Index", &settings.meili.index, None);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
