//! `patchbay check` — construct every active capability backend and
//! report its identity.
//!
//! This is the full startup path of an embedding application: resolve
//! settings, activate the suite, and run backend selection for each
//! capability family. Families the suite does not activate are reported
//! as inactive, not failures.

use crate::cli::CheckArgs;
use crate::client;
use crate::config;
use crate::error::PatchbayError;
use crate::logging;
use crate::migrate;
use crate::search;
use crate::select::Servant;
use crate::sms;
use crate::storage;

pub async fn execute(args: CheckArgs) -> Result<(), PatchbayError> {
    let log_format = logging::resolve_format(args.log.pretty, args.log.json);
    logging::init(&args.log.log_level, log_format);

    let loaded = config::load(
        args.config.config.as_deref(),
        &args.suite.features,
        args.suite.no_default,
    )
    .await?;

    println!(
        "\u{2713} patchbay v{} ({}) resolved {}",
        env!("CARGO_PKG_VERSION"),
        env!("PATCHBAY_GIT_SHORT"),
        loaded.path.display()
    );
    println!(
        "  suite:          {}",
        if loaded.suite.is_empty() {
            "(empty)".to_string()
        } else {
            loaded.suite.names().join(", ")
        }
    );

    let object_storage = storage::select_storage(&loaded.settings, &loaded.suite)?;
    println!(
        "  object storage: {} v{}",
        object_storage.name(),
        object_storage.version()
    );

    let driver = migrate::select_driver(&loaded.suite)?;
    let migration = if loaded.suite.cfg_if("Migration") {
        "migration enabled"
    } else {
        "migration disabled"
    };
    println!("  sql driver:     {} ({migration})", driver.name());

    let http_client = client::build_http_client();

    if loaded.suite.contains("Sms") {
        let gateway = sms::select_sms(&loaded.settings, &loaded.suite, &http_client)?;
        println!("  sms gateway:    {} v{}", gateway.name(), gateway.version());
    } else {
        println!("  sms gateway:    (inactive)");
    }

    if loaded.suite.cfg_if("Zinc") || loaded.suite.cfg_if("Meili") {
        let indexer = search::select_search(&loaded.settings, &loaded.suite, &http_client)?;
        println!("  search index:   {} v{}", indexer.name(), indexer.version());
    } else {
        println!("  search index:   (inactive)");
    }

    Ok(())
}
