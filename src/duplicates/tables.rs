//! First-seen tables: the check-and-record core of duplicate detection.
//!
//! One table per category, each with its own lock, so concurrent inserts
//! into different categories never contend while inserts within one
//! category serialize. Which of two concurrently classified identical
//! files becomes "first" is decided by whoever wins the table lock —
//! the set of duplicates found does not depend on it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::OsString;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::scanner::FileDigest;

use super::classifier::Category;

/// Map from a category-specific key to the path first observed with it.
///
/// `check_and_record` is the single operation: an atomic insert-if-absent
/// that makes "first writer wins" hold under concurrent classification.
/// Entries are never removed or updated within a run.
#[derive(Debug)]
pub struct FirstSeenTable<K: Eq + Hash> {
    entries: Mutex<HashMap<K, PathBuf>>,
}

impl<K: Eq + Hash> FirstSeenTable<K> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically look up `key` and record `path` if the key is unseen.
    ///
    /// Returns `None` when `path` became the first occurrence, or the
    /// previously recorded path when the key was already present — in
    /// which case the table is left untouched.
    pub fn check_and_record(&self, key: K, path: &Path) -> Option<PathBuf> {
        match self.lock().entry(key) {
            Entry::Occupied(first) => Some(first.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(path.to_path_buf());
                None
            }
        }
    }

    /// First path recorded for `key`, if any.
    pub fn first_seen(&self, key: &K) -> Option<PathBuf> {
        self.lock().get(key).cloned()
    }

    /// Number of distinct keys recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no key has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, PathBuf>> {
        // A poisoned lock only means another worker panicked mid-insert;
        // the map itself is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash> Default for FirstSeenTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Observational counters updated by workers as they classify.
///
/// Correctness of duplicate detection rests solely on the table locks;
/// these exist for the end-of-run summary.
#[derive(Debug, Default)]
pub struct RunCounters {
    /// Records classified, across all categories
    pub files_processed: AtomicUsize,
    /// Duplicates found among regular files
    pub duplicate_regular: AtomicUsize,
    /// Duplicates found among empty files
    pub duplicate_empty: AtomicUsize,
    /// Duplicates found among symbolic links
    pub duplicate_links: AtomicUsize,
    /// Broken symbolic links skipped
    pub broken_links: AtomicUsize,
    /// Records dropped because their key could not be computed
    pub process_errors: AtomicUsize,
}

impl RunCounters {
    pub(crate) fn record_processed(&self) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self, category: Category) {
        let counter = match category {
            Category::Regular => &self.duplicate_regular,
            Category::Empty => &self.duplicate_empty,
            Category::Link => &self.duplicate_links,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broken_link(&self) {
        self.broken_links.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.process_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Total duplicates found so far, across categories.
    pub fn duplicates_found(&self) -> usize {
        self.duplicate_regular.load(Ordering::Relaxed)
            + self.duplicate_empty.load(Ordering::Relaxed)
            + self.duplicate_links.load(Ordering::Relaxed)
    }
}

/// Process-wide shared state of one run: one first-seen table per
/// category plus the run counters.
///
/// Created at pipeline start, shared by `Arc` across all workers,
/// discarded at run end. The three tables have disjoint key spaces and
/// are never cross-checked.
#[derive(Debug, Default)]
pub struct SharedTables {
    /// Regular files, keyed by content digest
    pub regular: FirstSeenTable<FileDigest>,
    /// Empty files, keyed by base filename
    pub empty: FirstSeenTable<OsString>,
    /// Symbolic links, keyed by resolved target path
    pub links: FirstSeenTable<PathBuf>,
    /// Observational run counters
    pub counters: RunCounters,
}

impl SharedTables {
    /// Create the empty per-run state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
