//! Unified error types for Patchbay.
//!
//! Defines [`PatchbayError`] (the main crate error enum) and
//! [`ValidationError`] for settings validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.
//!
//! Fatal configuration errors (unknown feature, section decode failure,
//! no matching backend) are returned to the caller like everything else;
//! only `main` converts them into a process exit.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  section {}: {} — {}",
            self.section, self.field, self.message
        )?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PatchbayError {
    #[error("No config source found.\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config section '{section}' failed to decode:\n  {source}")]
    SectionDecode {
        section: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Unknown feature '{name}' requested.\n  Declared features: {declared}")]
    UnknownFeature { name: String, declared: String },

    #[error("No {family} backend matched the active suite and no default exists")]
    NoBackend { family: &'static str },

    #[error("The {backend} backend is not compiled into this binary.\n  {hint}")]
    BackendUnavailable {
        backend: &'static str,
        hint: &'static str,
    },

    #[error("Invalid object key: '{key}'")]
    InvalidObjectKey { key: String },

    #[error("Put of '{key}' incomplete: expected {expected} bytes, wrote {written}")]
    ShortWrite {
        key: String,
        expected: u64,
        written: u64,
    },

    #[error("Invalid expires: {0}, expires must not be negative")]
    InvalidExpiry(i64),

    #[error("Object storage error ({backend}): {source}")]
    Storage {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("SMS gateway {provider} rejected the send (code {code}): {reason}")]
    SmsGateway {
        provider: &'static str,
        code: i64,
        reason: String,
    },

    #[error("Search backend {backend} returned an error: {detail}")]
    SearchBackend {
        backend: &'static str,
        detail: String,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[cfg(any(feature = "mysql", feature = "postgres", feature = "sqlite"))]
    #[error("Database error ({backend}): {source}")]
    Database {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
