//! # Scholar Dedup
//!
//! Duplicate detection and merging for bibliographic records returned by
//! academic search clients.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (CandidateRecord, DuplicateGroup, MergedRecord)
//! - [`config`]: Validated detection options and configuration files
//! - [`utils`]: Identifier normalization, similarity, grouping and merging
//!
//! Every operation is a pure function over its inputs. Large batches are
//! compared in parallel when the `parallel` feature is enabled, with results
//! identical to the sequential path.

pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::{DuplicateDetectionOptions, MergeStrategy, OptionsError};
pub use models::{CandidateRecord, DuplicateGroup, MatchStrategy, MergedRecord, RecordBuilder};
pub use utils::{detect_duplicates, merge_all, merge_duplicates, remove_duplicates};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
