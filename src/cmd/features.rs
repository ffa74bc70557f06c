//! `patchbay features` — list declared features and the resolved suite.
//!
//! Skips conditional validation on purpose: the listing is most useful
//! exactly when a config is half-broken.

use crate::cli::FeaturesArgs;
use crate::config;
use crate::error::PatchbayError;

pub async fn execute(args: &FeaturesArgs) -> Result<(), PatchbayError> {
    let loaded = config::load_unvalidated(
        args.config.config.as_deref(),
        &args.suite.features,
        args.suite.no_default,
    )
    .await?;

    let declared = &loaded.settings.features;
    if declared.is_empty() {
        println!(
            "No features declared in {} (missing 'Features' section).",
            loaded.path.display()
        );
        return Ok(());
    }

    println!("Declared features ({}):", loaded.path.display());
    let width = declared
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, decl) in declared.iter() {
        let mut notes = Vec::new();
        if decl.default {
            notes.push("default".to_string());
        }
        if let Some(ref value) = decl.value {
            notes.push(format!("= {value}"));
        }
        let active = if loaded.suite.contains(name) {
            "\u{2713}"
        } else {
            " "
        };
        println!("  {active} {name:width$}  {}", notes.join("  "));
    }

    let suite = if loaded.suite.is_empty() {
        "(empty)".to_string()
    } else {
        loaded.suite.names().join(", ")
    };
    println!("\nActive suite: {suite}");

    Ok(())
}
