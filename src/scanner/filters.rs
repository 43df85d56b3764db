//! Pure predicate filters applied to records before they enter the queue.
//!
//! A [`FilterChain`] is assembled once from configuration and consulted
//! by the walker for every discovered file: the record passes only if
//! every filter in the chain accepts it. Filters are pure predicates —
//! order-independent, no side effects, no shared state.

use super::FileRecord;

/// A pure predicate over a [`FileRecord`].
pub trait RecordFilter: Send + Sync {
    /// Whether the record may enter the pipeline.
    fn accept(&self, record: &FileRecord) -> bool;
}

/// Rejects symbolic links. Hard links are not links for this purpose.
pub struct SkipSymlinks;

impl RecordFilter for SkipSymlinks {
    fn accept(&self, record: &FileRecord) -> bool {
        !record.is_link
    }
}

/// Rejects empty files.
pub struct SkipEmptyFiles;

impl RecordFilter for SkipEmptyFiles {
    fn accept(&self, record: &FileRecord) -> bool {
        record.size > 0
    }
}

/// An all-must-accept chain of filters.
pub struct FilterChain {
    filters: Vec<Box<dyn RecordFilter>>,
}

impl FilterChain {
    /// Start building a chain from configuration flags.
    #[must_use]
    pub fn builder() -> FilterChainBuilder {
        FilterChainBuilder::default()
    }

    /// Whether the record passes every filter in the chain.
    ///
    /// An empty chain accepts everything.
    #[must_use]
    pub fn accepts(&self, record: &FileRecord) -> bool {
        self.filters.iter().all(|filter| filter.accept(record))
    }

    /// Number of active filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain has no active filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Builder assembling a [`FilterChain`] from configuration flags.
#[derive(Default)]
pub struct FilterChainBuilder {
    filters: Vec<Box<dyn RecordFilter>>,
}

impl FilterChainBuilder {
    /// Add the symlink filter when `skip` is set.
    #[must_use]
    pub fn skip_links(mut self, skip: bool) -> Self {
        if skip {
            self.filters.push(Box::new(SkipSymlinks));
        }
        self
    }

    /// Add the empty-file filter when `skip` is set.
    #[must_use]
    pub fn skip_empty_files(mut self, skip: bool) -> Self {
        if skip {
            self.filters.push(Box::new(SkipEmptyFiles));
        }
        self
    }

    /// Add an arbitrary filter.
    #[must_use]
    pub fn filter(mut self, filter: Box<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Finish the chain.
    #[must_use]
    pub fn build(self) -> FilterChain {
        FilterChain {
            filters: self.filters,
        }
    }
}
