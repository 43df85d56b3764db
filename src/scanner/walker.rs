//! Directory walker: the producer side of the pipeline.
//!
//! The walker traverses a directory tree on its own thread, never
//! following symbolic links (a link is visited and recorded, but its
//! target subtree is not descended into; hard links are ordinary files).
//! Every file that passes the filter chain is sent on the shared queue.
//!
//! Lifecycle: STARTED fires immediately before traversal begins and
//! FINISHED fires unconditionally after it ends — including after an
//! aborted traversal — so consumers are never left waiting. When the
//! walker thread exits it drops the queue sender, closing the queue;
//! that closure is the coordinator's signal to drain and shut down.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use walkdir::WalkDir;

use crate::events::StageNotifier;

use super::{FileRecord, FilterChain, WalkerError};

/// Statistics from one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files visited (directories are not counted)
    pub files_visited: usize,
    /// Records that passed the filter chain and were queued
    pub files_queued: usize,
    /// Records rejected by the filter chain
    pub files_filtered: usize,
    /// Total size of queued records, in bytes
    pub bytes_queued: u64,
    /// Entries that could not be visited
    pub walk_errors: usize,
}

/// Producer that feeds discovered files into the shared queue.
pub struct Walker {
    root: PathBuf,
    queue: Sender<FileRecord>,
    filters: FilterChain,
    notifier: StageNotifier,
}

impl Walker {
    /// Create a walker over `root`.
    ///
    /// The caller is expected to have validated that `root` exists and
    /// is a directory; the walker itself treats an unreadable root as a
    /// fatal traversal error.
    #[must_use]
    pub fn new(
        root: &Path,
        queue: Sender<FileRecord>,
        filters: FilterChain,
        notifier: StageNotifier,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            queue,
            filters,
            notifier,
        }
    }

    /// Spawn the traversal thread and return its handle immediately.
    ///
    /// The caller is never blocked by traversal; the handle resolves to
    /// the final [`WalkStats`] once the walk ends.
    pub fn walk(self) -> Result<JoinHandle<WalkStats>, WalkerError> {
        thread::Builder::new()
            .name("walker".to_string())
            .spawn(move || {
                self.notifier.notify_started();
                log::info!("File system walker started under {}", self.root.display());

                let stats = self.traverse();

                self.notifier.notify_finished();
                log::info!(
                    "File system walker finished: {} files visited, {} queued, {} filtered, {} errors",
                    stats.files_visited,
                    stats.files_queued,
                    stats.files_filtered,
                    stats.walk_errors
                );
                stats
                // Dropping self here releases the queue sender, closing
                // the queue for the consumers
            })
            .map_err(|source| WalkerError::Spawn { source })
    }

    fn traverse(&self) -> WalkStats {
        let mut stats = WalkStats::default();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    stats.walk_errors += 1;
                    // Depth 0 means the root itself is unreadable and
                    // nothing below it can be reached
                    if err.depth() == 0 {
                        log::error!(
                            "Error traversing the file tree {}: {}",
                            self.root.display(),
                            err
                        );
                        break;
                    }
                    log::error!("Error visiting entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            stats.files_visited += 1;

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    stats.walk_errors += 1;
                    log::error!("Error reading attributes of {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            let record = FileRecord::from_entry(entry.into_path(), &metadata);
            log::debug!("File discovered: {}", record.path.display());

            if self.filters.accepts(&record) {
                stats.files_queued += 1;
                stats.bytes_queued += record.size;
                log::debug!("Queued file: {}", record.path.display());
                if self.queue.send(record).is_err() {
                    // Every consumer is gone, so nothing will ever drain
                    // the queue again
                    log::warn!("File queue closed; stopping traversal early");
                    break;
                }
            } else {
                stats.files_filtered += 1;
                log::debug!("Filtered file: {}", record.path.display());
            }
        }

        stats
    }
}
