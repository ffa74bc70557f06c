//! Serialize a [`Settings`] document to the chosen output format.

use crate::cli::ConfigFormat;
use crate::config::Settings;
use crate::error::PatchbayError;

/// Serialize a `Settings` document to a formatted string in the given
/// format.
pub fn serialize_document(
    settings: &Settings,
    format: &ConfigFormat,
) -> Result<String, PatchbayError> {
    match format {
        #[cfg(feature = "yaml")]
        ConfigFormat::Yaml => serde_yml::to_string(settings)
            .map_err(|e| PatchbayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "yaml"))]
        ConfigFormat::Yaml => Err(PatchbayError::UnsupportedFormat("yaml".into())),

        ConfigFormat::Json => serde_json::to_string_pretty(settings)
            .map_err(|e| PatchbayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(feature = "toml")]
        ConfigFormat::Toml => toml::to_string_pretty(settings)
            .map_err(|e| PatchbayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "toml"))]
        ConfigFormat::Toml => Err(PatchbayError::UnsupportedFormat("toml".into())),
    }
}
