//! `patchbay init` — generate a starter configuration file.
//!
//! Supports two modes:
//! - **Template mode** (default): writes a starter config with every
//!   known section and a conventional feature declaration block.
//! - **Interactive mode** (`--interactive`): walks through a wizard
//!   that picks the storage backend, SQL driver, and optional
//!   capabilities step by step.

mod interactive;
mod serialize;
mod template;

use crate::cli::InitArgs;
use crate::error::PatchbayError;

pub fn execute(args: &InitArgs) -> Result<(), PatchbayError> {
    if args.interactive {
        interactive::run(args)
    } else {
        template::run(args)
    }
}
