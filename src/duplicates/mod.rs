//! Duplicate detection module.
//!
//! This module provides:
//! - First-seen tables with the atomic check-and-record operation
//! - Per-record classification (regular / empty / symbolic link)
//! - The consumer worker pool draining the shared queue
//! - The run controller tying the pipeline together

pub mod classifier;
pub mod coordinator;
pub mod finder;
pub mod tables;

// Re-export main types
pub use classifier::{Category, Classifier, ClassifierFactory, DuplicateReport};
pub use coordinator::{ConsumerCoordinator, CoordinatorError};
pub use finder::{
    DuplicateFinder, FinderConfig, FinderError, RunSummary, DEFAULT_WORKERS,
};
pub use tables::{FirstSeenTable, RunCounters, SharedTables};
