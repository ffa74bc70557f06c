//! `patchbay migrate` — apply schema migrations with the selected
//! SQL driver.

use crate::cli::MigrateArgs;
use crate::config;
use crate::error::PatchbayError;
use crate::logging;
use crate::migrate;

pub async fn execute(args: MigrateArgs) -> Result<(), PatchbayError> {
    let log_format = logging::resolve_format(args.log.pretty, args.log.json);
    logging::init(&args.log.log_level, log_format);

    let loaded = config::load(
        args.config.config.as_deref(),
        &args.suite.features,
        args.suite.no_default,
    )
    .await?;

    migrate::run(&loaded.settings, &loaded.suite).await
}
