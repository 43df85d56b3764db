//! Run controller: wires the walker, queue and coordinator together.
//!
//! `DuplicateFinder` validates the configuration, builds the per-run
//! shared state, starts the consumer pool and the walker, then blocks on
//! the coordinator's FINISHED signal. There is no cancel API and no
//! overall timeout: completion is cooperative, driven by the
//! walker → coordinator → caller event chain.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use crossbeam_channel::unbounded;

use crate::events::stage_channel;
use crate::scanner::{FilterChain, Walker, WalkerError, WalkStats};

use super::classifier::ClassifierFactory;
use super::coordinator::{ConsumerCoordinator, CoordinatorError};
use super::tables::SharedTables;

/// Default size of the consumer pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Configuration for a duplicate-finding run.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Number of consumer workers (must be at least 1)
    pub workers: usize,
    /// Drop symbolic links before they enter the pipeline
    pub skip_links: bool,
    /// Drop empty files before they enter the pipeline
    pub skip_empty: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            skip_links: false,
            skip_empty: false,
        }
    }
}

/// Errors that stop a run before any work is performed.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root path could not be inspected.
    #[error("Cannot access {path}: {source}")]
    RootAccess {
        /// The offending path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configured worker count is below 1.
    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),

    /// The consumer pool could not be started.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    /// The walker thread could not be started.
    #[error(transparent)]
    Walker(#[from] WalkerError),
}

/// Summary of one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files visited by the walker (directories excluded)
    pub files_visited: usize,
    /// Records that entered the pipeline
    pub files_queued: usize,
    /// Records rejected by the filter chain
    pub files_filtered: usize,
    /// Records classified by the worker pool
    pub files_processed: usize,
    /// Total size of queued records, in bytes
    pub bytes_queued: u64,
    /// Duplicates found among regular files
    pub duplicate_regular: usize,
    /// Duplicates found among empty files
    pub duplicate_empty: usize,
    /// Duplicates found among symbolic links
    pub duplicate_links: usize,
    /// Broken symbolic links skipped
    pub broken_links: usize,
    /// Traversal and per-file processing errors, combined
    pub errors: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Total duplicates found, across categories.
    #[must_use]
    pub fn duplicates_found(&self) -> usize {
        self.duplicate_regular + self.duplicate_empty + self.duplicate_links
    }
}

/// Orchestrates one full duplicate-finding run.
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Search for duplicate files under `root`.
    ///
    /// Blocks until the whole pipeline has completed: the walker has
    /// traversed the tree, the queue has been drained, and every
    /// consumer worker has exited. Duplicates are reported as log lines
    /// while the run progresses; the returned summary carries the final
    /// counts.
    pub fn find_duplicates(&self, root: &Path) -> Result<RunSummary, FinderError> {
        let start = Instant::now();
        self.validate(root)?;

        log::info!(
            "Searching for duplicate files under {} with {} workers",
            root.display(),
            self.config.workers
        );

        // Shared queue between the producer (walker) and the consumer
        // pool, plus the per-run tables
        let (file_tx, file_rx) = unbounded();
        let tables = Arc::new(SharedTables::new());
        let factory = ClassifierFactory::new(Arc::clone(&tables));

        let (coordinator_notifier, coordinator_signals) = stage_channel();
        let (walker_notifier, walker_signals) = stage_channel();

        let mut coordinator = ConsumerCoordinator::new(
            file_rx,
            factory,
            self.config.workers,
            coordinator_notifier,
        );
        coordinator.consume()?;
        coordinator_signals.wait_started();

        let filters = FilterChain::builder()
            .skip_links(self.config.skip_links)
            .skip_empty_files(self.config.skip_empty)
            .build();
        let walker = Walker::new(root, file_tx, filters, walker_notifier);
        let walker_handle = walker.walk()?;
        walker_signals.wait_started();

        log::info!("Waiting for results...");
        if coordinator_signals.wait_finished().is_none() {
            log::warn!("Consumer coordinator ended without signaling completion");
        }
        // The walker necessarily finished before the queue could drain;
        // consuming its signal keeps the handshake visible end to end
        if walker_signals.wait_finished().is_none() {
            log::warn!("Walker ended without signaling completion");
        }

        let walk_stats = walker_handle.join().unwrap_or_else(|_| {
            log::error!("Walker thread panicked; traversal statistics are incomplete");
            WalkStats::default()
        });

        let summary = self.summarize(&walk_stats, &tables, start.elapsed());
        log::info!(
            "Operation done in {:.2?}: {} files examined ({}), {} duplicates found",
            summary.elapsed,
            summary.files_processed,
            ByteSize::b(summary.bytes_queued),
            summary.duplicates_found()
        );

        Ok(summary)
    }

    fn validate(&self, root: &Path) -> Result<(), FinderError> {
        let metadata = match std::fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FinderError::PathNotFound(root.to_path_buf()));
            }
            Err(err) => {
                return Err(FinderError::RootAccess {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }

        if self.config.workers < 1 {
            return Err(FinderError::InvalidWorkerCount(self.config.workers));
        }
        Ok(())
    }

    fn summarize(
        &self,
        walk_stats: &WalkStats,
        tables: &SharedTables,
        elapsed: Duration,
    ) -> RunSummary {
        let counters = &tables.counters;
        RunSummary {
            files_visited: walk_stats.files_visited,
            files_queued: walk_stats.files_queued,
            files_filtered: walk_stats.files_filtered,
            files_processed: counters.files_processed.load(Ordering::Relaxed),
            bytes_queued: walk_stats.bytes_queued,
            duplicate_regular: counters.duplicate_regular.load(Ordering::Relaxed),
            duplicate_empty: counters.duplicate_empty.load(Ordering::Relaxed),
            duplicate_links: counters.duplicate_links.load(Ordering::Relaxed),
            broken_links: counters.broken_links.load(Ordering::Relaxed),
            errors: walk_stats.walk_errors + counters.process_errors.load(Ordering::Relaxed),
            elapsed,
        }
    }
}
