//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`init`], [`validate`], [`features`], [`check`],
//! or [`migrate`]. Each handler lives in its own submodule.

pub mod check;
pub mod features;
pub mod init;
pub mod migrate;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::PatchbayError;

pub async fn dispatch(cli: Cli) -> Result<(), PatchbayError> {
    match cli.command {
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Features(ref args)) => features::execute(args).await,
        Some(Commands::Check(args)) => check::execute(args).await,
        Some(Commands::Migrate(args)) => migrate::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    let git = env!("PATCHBAY_GIT_SHORT");
    println!(
        "\n  patchbay v{version} ({git}) \u{2014} feature-suite driven capability wiring\n\n  \
         No command provided. To get started:\n\n    \
         patchbay init                  Generate a starter config\n    \
         patchbay validate              Validate ./patchbay.yaml and the default suite\n    \
         patchbay check -F LocalOSS     Resolve backends for an explicit suite\n    \
         patchbay --help                See all commands and options\n"
    );
}
