//! Settings resolution and feature-suite activation.
//!
//! Defines the typed section registry ([`Settings`]), the document
//! parser for the supported file formats, and [`load`] — the one
//! startup-path entry point that reads the configuration source,
//! decodes every known section, activates the feature suite, and
//! conditionally validates the result.
//!
//! Decoding is unconditional: a section is decoded even when its
//! owning feature is inactive, so diagnostics can always show it and
//! backend selection has every value on hand before it decides what to
//! activate. Usage is what the suite gates.

pub mod features;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::PatchbayError;
use features::{FeaturesSetting, Suite};
use model::{
    AppSetting, JwtSetting, LocalOssSetting, MeiliSetting, MinioSetting, MySqlSetting,
    PostgresSetting, RedisSetting, S3Setting, ServerSetting, SmsJuheSetting, Sqlite3Setting,
    ZincSetting,
};

/// Raw configuration document: named top-level sections, format-agnostic.
pub type RawDocument = serde_json::Map<String, serde_json::Value>;

/// Every settings section this build knows about, fully decoded.
///
/// Constructed exactly once per run by [`Settings::resolve`]; read-only
/// afterwards. Components receive it by reference from the startup
/// path — there is no process-global settings object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Settings {
    #[serde(rename = "App")]
    pub app: AppSetting,
    #[serde(rename = "Server")]
    pub server: ServerSetting,
    #[serde(rename = "Features", skip_serializing_if = "FeaturesSetting::is_empty")]
    pub features: FeaturesSetting,
    #[serde(rename = "LocalOSS")]
    pub local_oss: LocalOssSetting,
    #[serde(rename = "MinIO")]
    pub minio: MinioSetting,
    #[serde(rename = "S3")]
    pub s3: S3Setting,
    #[serde(rename = "MySQL")]
    pub mysql: MySqlSetting,
    #[serde(rename = "Postgres")]
    pub postgres: PostgresSetting,
    #[serde(rename = "Sqlite3")]
    pub sqlite3: Sqlite3Setting,
    #[serde(rename = "Redis")]
    pub redis: RedisSetting,
    #[serde(rename = "JWT")]
    pub jwt: JwtSetting,
    #[serde(rename = "SmsJuhe")]
    pub sms_juhe: SmsJuheSetting,
    #[serde(rename = "Zinc")]
    pub zinc: ZincSetting,
    #[serde(rename = "Meili")]
    pub meili: MeiliSetting,
}

/// Decode one named section, falling back to the section's defaults
/// when it is absent. A decode failure names the section.
fn section<T>(raw: &mut RawDocument, name: &'static str) -> Result<T, PatchbayError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match raw.remove(name) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| PatchbayError::SectionDecode {
                section: name,
                source: Box::new(e),
            })
        }
    }
}

impl Settings {
    /// Decode every known section from the raw document.
    ///
    /// All-or-nothing: the first failing section aborts resolution and
    /// no partially decoded settings value escapes.
    pub fn resolve(mut raw: RawDocument) -> Result<Self, PatchbayError> {
        let settings = Self {
            app: section(&mut raw, "App")?,
            server: section(&mut raw, "Server")?,
            features: section(&mut raw, "Features")?,
            local_oss: section(&mut raw, "LocalOSS")?,
            minio: section(&mut raw, "MinIO")?,
            s3: section(&mut raw, "S3")?,
            mysql: section(&mut raw, "MySQL")?,
            postgres: section(&mut raw, "Postgres")?,
            sqlite3: section(&mut raw, "Sqlite3")?,
            redis: section(&mut raw, "Redis")?,
            jwt: section(&mut raw, "JWT")?,
            sms_juhe: section(&mut raw, "SmsJuhe")?,
            zinc: section(&mut raw, "Zinc")?,
            meili: section(&mut raw, "Meili")?,
        };

        if !raw.is_empty() {
            let leftover: Vec<&String> = raw.keys().collect();
            tracing::debug!(sections = ?leftover, "ignoring unknown config sections");
        }

        Ok(settings)
    }
}

/// The fully resolved configuration of one run.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub suite: Suite,
    pub path: PathBuf,
    /// SHA-256 of the raw document, for diagnostics.
    pub digest: String,
}

/// Parse a config string into a raw section map based on file extension.
pub fn parse_document(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<RawDocument, PatchbayError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| PatchbayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| PatchbayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| PatchbayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(PatchbayError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

async fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, PatchbayError> {
    if let Some(path) = explicit {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(PatchbayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(path.to_path_buf());
    }

    // Auto-detect in current directory
    let candidates = [
        "patchbay.yaml",
        "patchbay.yml",
        "patchbay.json",
        "patchbay.toml",
    ];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Ok(path);
        }
    }

    Err(PatchbayError::NoConfigSource {
        hint: "Provide --config <file> or create ./patchbay.yaml.\n  \
               Run 'patchbay init' to create a starter config."
            .into(),
    })
}

/// Read, decode, and activate, but skip conditional validation.
///
/// Diagnostic commands use this to inspect a document that would fail
/// validation; everything on the real startup path goes through
/// [`load`].
pub async fn load_unvalidated(
    explicit: Option<&Path>,
    requested: &[String],
    no_default: bool,
) -> Result<LoadedSettings, PatchbayError> {
    let path = resolve_config_path(explicit).await?;
    let content = tokio::fs::read_to_string(&path).await?;
    let digest = sha256_hex(content.as_bytes());

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let raw = parse_document(ext, &content, &path.display().to_string())?;
    let settings = Settings::resolve(raw)?;

    let suite = settings.features.activate(requested, no_default)?;

    Ok(LoadedSettings {
        settings,
        suite,
        path,
        digest,
    })
}

/// Read, decode, activate, and validate — the whole startup sequence.
///
/// Runs synchronously with respect to the rest of the process: nothing
/// receives a capability handle before this returns. Every failure here
/// is fatal to startup; the caller decides how to exit.
pub async fn load(
    explicit: Option<&Path>,
    requested: &[String],
    no_default: bool,
) -> Result<LoadedSettings, PatchbayError> {
    let loaded = load_unvalidated(explicit, requested, no_default).await?;

    if let Err(errors) = validation::validate(&loaded.settings, &loaded.suite) {
        return Err(PatchbayError::ConfigValidation { errors });
    }

    tracing::info!(
        path = %loaded.path.display(),
        suite = ?loaded.suite.names(),
        "settings resolved"
    );

    Ok(loaded)
}
