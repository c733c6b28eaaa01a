//! Core data models for candidate records and duplicate groups.

mod group;
mod record;

pub use group::{DuplicateGroup, MatchStrategy, MergedRecord, PairMatch};
pub use record::{CandidateRecord, RecordBuilder};
