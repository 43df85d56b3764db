//! Command-line interface definitions for dupestream.
//!
//! This module defines all CLI arguments using the clap derive API. The
//! application has a single operation — scan a directory tree — so there
//! are no subcommands, only the scan target and its options.
//!
//! # Example
//!
//! ```bash
//! # Find duplicates under a directory with the default worker pool
//! dupestream ~/Downloads
//!
//! # Use eight consumer workers, skip symlinks and empty files
//! dupestream ~/Downloads --threads 8 --skip-links --skip-empty
//!
//! # Verbose mode for debugging
//! dupestream -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::duplicates::DEFAULT_WORKERS;

/// Concurrent duplicate file finder.
///
/// Dupestream walks a directory tree on a producer thread and classifies
/// every discovered file on a pool of consumer workers. Regular files are
/// compared by content hash (BLAKE3), empty files by name, and symbolic
/// links by resolved target path. Duplicates are reported as log lines;
/// nothing on disk is ever modified.
#[derive(Debug, Parser)]
#[command(name = "dupestream")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Number of consumer worker threads (must be at least 1)
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = DEFAULT_WORKERS,
        value_parser = parse_workers
    )]
    pub threads: usize,

    /// Skip symbolic links entirely
    #[arg(long)]
    pub skip_links: bool,

    /// Skip empty files entirely
    #[arg(long)]
    pub skip_empty: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit errors as JSON on stderr (for scripting)
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse and validate the worker count argument.
fn parse_workers(value: &str) -> Result<usize, String> {
    let workers: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid number"))?;
    if workers == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["dupestream", "/tmp"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert_eq!(cli.threads, DEFAULT_WORKERS);
        assert!(!cli.skip_links);
        assert!(!cli.skip_empty);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "dupestream",
            "/data",
            "--threads",
            "8",
            "--skip-links",
            "--skip-empty",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.threads, 8);
        assert!(cli.skip_links);
        assert!(cli.skip_empty);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_missing_path_is_rejected() {
        assert!(Cli::try_parse_from(["dupestream"]).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = Cli::try_parse_from(["dupestream", "/tmp", "--threads", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_threads_rejected() {
        let result = Cli::try_parse_from(["dupestream", "/tmp", "--threads", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupestream", "/tmp", "-q", "-v"]);
        assert!(result.is_err());
    }
}
