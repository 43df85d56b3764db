//! Dupestream - Concurrent Duplicate File Finder
//!
//! Finds duplicate files under a directory tree using a producer-consumer
//! pipeline: a walker thread feeds discovered files through a closeable
//! queue into a fixed pool of consumer workers. Regular files are compared
//! by content hash (BLAKE3), empty files by name, and symbolic links by
//! resolved target path.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod events;
pub mod logging;
pub mod scanner;

use anyhow::Result;

use crate::cli::Cli;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;

/// Run the application with parsed CLI arguments.
///
/// Returns the exit code to report: [`ExitCode::Success`] when at least
/// one duplicate was found, [`ExitCode::NoDuplicates`] otherwise.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = FinderConfig {
        workers: cli.threads,
        skip_links: cli.skip_links,
        skip_empty: cli.skip_empty,
    };

    let summary = DuplicateFinder::new(config).find_duplicates(&cli.path)?;

    if summary.duplicates_found() > 0 {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::NoDuplicates)
    }
}
