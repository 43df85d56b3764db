//! Duplicate classification: category decision and check-and-record.
//!
//! A classifier decides the category of each record, computes the
//! category-specific key, and performs one atomic check-and-record
//! against that category's first-seen table. Every worker owns its own
//! classifier instance (with its own hash buffer); the factory makes the
//! sharing explicit — classifiers borrow the process-wide tables by
//! `Arc`, they never own them.

use std::path::PathBuf;
use std::sync::Arc;

use crate::scanner::{FileRecord, Hasher};

use super::tables::SharedTables;

/// Classification of a record, driving which key and table are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Non-empty regular file, keyed by content digest
    Regular,
    /// Empty file, keyed by base filename
    Empty,
    /// Symbolic link, keyed by resolved target path
    Link,
}

impl Category {
    /// Decide the category of a record. First match wins: link before
    /// empty before regular, so an empty-looking symlink is still a link.
    #[must_use]
    pub fn of(record: &FileRecord) -> Self {
        if record.is_link {
            Self::Link
        } else if record.is_empty() {
            Self::Empty
        } else {
            Self::Regular
        }
    }

    /// Human-readable label used in duplicate reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "regular file",
            Self::Empty => "empty file",
            Self::Link => "symbolic link",
        }
    }
}

/// A single duplicate observation.
///
/// Logged and counted as a side effect of classification; never stored
/// in any table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Category under which the duplicate was detected
    pub category: Category,
    /// Path recorded first for the shared key
    pub first_path: PathBuf,
    /// Path of the duplicate just classified
    pub current_path: PathBuf,
}

/// Hands out worker-local classifiers bound to the shared tables.
pub struct ClassifierFactory {
    tables: Arc<SharedTables>,
}

impl ClassifierFactory {
    /// Create a factory over the given per-run tables.
    #[must_use]
    pub fn new(tables: Arc<SharedTables>) -> Self {
        Self { tables }
    }

    /// Produce a fresh classifier for one worker.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier {
            tables: Arc::clone(&self.tables),
            hasher: Hasher::new(),
        }
    }
}

/// Per-worker classification logic.
pub struct Classifier {
    tables: Arc<SharedTables>,
    hasher: Hasher,
}

impl Classifier {
    /// Classify one record, reporting a duplicate when its key was
    /// already seen.
    ///
    /// Failure to compute a key (unreadable content, vanished file) is
    /// logged and the record is dropped without touching any table;
    /// broken links are likewise skipped entirely. Either way the
    /// pipeline continues with the next record.
    pub fn classify(&mut self, record: &FileRecord) -> Option<DuplicateReport> {
        self.tables.counters.record_processed();

        let category = Category::of(record);
        let report = match category {
            Category::Link => self.classify_link(record),
            Category::Empty => self.classify_empty(record),
            Category::Regular => self.classify_regular(record),
        };

        if let Some(report) = &report {
            self.tables.counters.record_duplicate(report.category);
            log::info!(
                "Duplicate {} found: {} matches {}",
                report.category.label(),
                report.first_path.display(),
                report.current_path.display()
            );
        }
        report
    }

    fn classify_regular(&mut self, record: &FileRecord) -> Option<DuplicateReport> {
        let digest = match self.hasher.digest_file(&record.path) {
            Ok(digest) => digest,
            Err(err) => {
                self.tables.counters.record_error();
                log::error!("Error processing file {}: {}", record.path.display(), err);
                return None;
            }
        };

        self.tables
            .regular
            .check_and_record(digest, &record.path)
            .map(|first_path| DuplicateReport {
                category: Category::Regular,
                first_path,
                current_path: record.path.clone(),
            })
    }

    fn classify_empty(&self, record: &FileRecord) -> Option<DuplicateReport> {
        self.tables
            .empty
            .check_and_record(record.name.clone(), &record.path)
            .map(|first_path| DuplicateReport {
                category: Category::Empty,
                first_path,
                current_path: record.path.clone(),
            })
    }

    fn classify_link(&self, record: &FileRecord) -> Option<DuplicateReport> {
        // A broken link never occupies a table slot and is never
        // reported as a duplicate
        let Some(real_path) = record.real_path.as_ref() else {
            self.tables.counters.record_broken_link();
            log::info!("Broken symlink detected: {}", record.path.display());
            return None;
        };

        self.tables
            .links
            .check_and_record(real_path.clone(), &record.path)
            .map(|first_path| DuplicateReport {
                category: Category::Link,
                first_path,
                current_path: record.path.clone(),
            })
    }
}
