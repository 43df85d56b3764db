//! Scanner module for directory traversal and file discovery.
//!
//! The scanner is the producing side of the pipeline:
//! - [`walker`]: asynchronous directory traversal feeding the shared queue
//! - [`filters`]: pure predicates deciding which files enter the pipeline
//! - [`hasher`]: BLAKE3 content digests (streaming)

pub mod filters;
pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::fs::Metadata;
use std::path::PathBuf;

// Re-export main types
pub use filters::{FilterChain, RecordFilter};
pub use hasher::{FileDigest, Hasher};
pub use walker::{WalkStats, Walker};

/// Immutable snapshot of one discovered filesystem entry.
///
/// Built once at discovery time from the entry's (non-following)
/// metadata, then moved through the pipeline by value and discarded
/// after classification.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Base filename of the entry
    pub name: OsString,
    /// Size in bytes (0 for empty files)
    pub size: u64,
    /// Absolute path as discovered
    pub path: PathBuf,
    /// Canonical target path for symbolic links; `None` when the link is
    /// broken or the entry is not a link
    pub real_path: Option<PathBuf>,
    /// Whether this entry is a symbolic link. Hard links are
    /// indistinguishable from regular files and are not flagged here.
    pub is_link: bool,
}

impl FileRecord {
    /// Create a record from a visited path and its `symlink_metadata`.
    ///
    /// The path is absolutized lexically (no link resolution); for
    /// symbolic links the target is resolved eagerly so a broken link is
    /// already identifiable when the record reaches a classifier.
    #[must_use]
    pub fn from_entry(path: PathBuf, metadata: &Metadata) -> Self {
        let path = std::path::absolute(&path).unwrap_or(path);
        let name = path
            .file_name()
            .map_or_else(|| path.clone().into_os_string(), ToOwned::to_owned);
        let is_link = metadata.file_type().is_symlink();
        let real_path = if is_link {
            std::fs::canonicalize(&path).ok()
        } else {
            None
        };

        Self {
            name,
            size: metadata.len(),
            path,
            real_path,
            is_link,
        }
    }

    /// Whether the file has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Errors that can occur while starting or running a traversal.
#[derive(thiserror::Error, Debug)]
pub enum WalkerError {
    /// The walker thread could not be spawned.
    #[error("Failed to spawn walker thread: {source}")]
    Spawn {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
