//! `patchbay validate` — check a configuration file and suite for errors.
//!
//! Resolves the document, activates the requested suite, and runs the
//! conditional validation pass, reporting results in either
//! human-readable text or machine-readable JSON format. No backend is
//! constructed.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::{self, LoadedSettings};
use crate::error::PatchbayError;
use crate::migrate;

pub async fn execute(args: &ValidateArgs) -> Result<(), PatchbayError> {
    let result = config::load(
        Some(&args.config),
        &args.suite.features,
        args.suite.no_default,
    )
    .await;

    let loaded = match result {
        Ok(loaded) => loaded,
        Err(PatchbayError::ConfigValidation { errors }) => {
            match args.format {
                ValidateFormat::Text => {
                    eprintln!(
                        "\u{2717} {} has {} errors\n",
                        args.config.display(),
                        errors.len()
                    );
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                ValidateFormat::Json => {
                    let json_errors: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "section": e.section,
                                "field": e.field,
                                "message": e.message,
                                "suggestion": e.suggestion,
                            })
                        })
                        .collect();
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": false,
                            "errors": json_errors,
                        })
                    );
                }
            }
            return Err(PatchbayError::ConfigValidation { errors });
        }
        Err(e) => return Err(e),
    };

    let driver = migrate::select_driver(&loaded.suite)?;

    match args.format {
        ValidateFormat::Text => {
            println!("\u{2713} {}", format_report(&loaded, driver.name()));
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "suite": loaded.suite.names(),
                    "sql_driver": driver.name(),
                    "digest": loaded.digest,
                })
            );
        }
    }

    Ok(())
}

fn format_report(loaded: &LoadedSettings, driver: &str) -> String {
    let suite = if loaded.suite.is_empty() {
        "(empty)".to_string()
    } else {
        loaded.suite.names().join(", ")
    };

    format!(
        "{} is valid\n  \
           suite:      {}\n  \
           sql driver: {}\n  \
           digest:     {}",
        loaded.path.display(),
        suite,
        driver,
        &loaded.digest[..12.min(loaded.digest.len())],
    )
}
