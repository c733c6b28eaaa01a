//! Normalization, similarity, detection and merging.
//!
//! This module provides the functions the engine is built from:
//!
//! - [`normalize_doi`], [`normalize_url`]: Canonical identifier forms
//! - [`normalize_title`], [`normalize_author_name`]: Canonical text forms
//! - [`string_similarity`], [`author_list_similarity`]: Fuzzy scores in `[0, 1]`
//! - [`classify_pair`]: Decide whether two records are duplicates
//! - [`detect_duplicates`]: Group a batch by transitive duplicate closure
//! - [`merge_duplicates`]: Collapse one group into a single record
//! - [`remove_duplicates`], [`merge_all`]: Deduplicate a whole batch
//!
//! # Deduplication
//!
//! ```rust
//! use scholar_dedup::config::{DuplicateDetectionOptions, MergeStrategy};
//! use scholar_dedup::models::RecordBuilder;
//! use scholar_dedup::utils::remove_duplicates;
//!
//! let records = vec![
//!     RecordBuilder::new("Deep learning").doi("10.1038/nature14539").citations(10).build(),
//!     RecordBuilder::new("Deep Learning").doi("https://doi.org/10.1038/NATURE14539").citations(70).build(),
//! ];
//!
//! let options = DuplicateDetectionOptions::builder()
//!     .merge_strategy(MergeStrategy::KeepMostCitations)
//!     .build()
//!     .unwrap();
//!
//! let unique = remove_duplicates(&records, &options);
//! assert_eq!(unique.len(), 1);
//! assert_eq!(unique[0].citations, Some(70));
//! ```

mod dedup;
mod identifiers;
mod merge;
mod similarity;

pub use dedup::{classify_pair, detect_duplicates, DOI_TITLE_SANITY_BOUND};
pub use identifiers::{normalize_doi, normalize_url};
pub use merge::{merge_all, merge_duplicates, remove_duplicates};
pub use similarity::{
    author_list_similarity, author_name_similarity, normalize_author_name, normalize_title,
    string_similarity,
};
