//! Duplicate groups and merged output records.

use serde::{Deserialize, Serialize};

use super::CandidateRecord;

/// Why two records were judged to describe the same publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Canonical DOIs are equal
    Doi,
    /// Canonical URLs are equal
    Url,
    /// Same title and same authors after normalization
    TitleAuthor,
    /// Title and author similarity both cleared their thresholds
    FuzzyMatch,
}

impl MatchStrategy {
    /// Returns the wire identifier of the strategy
    pub fn id(&self) -> &'static str {
        match self {
            MatchStrategy::Doi => "doi",
            MatchStrategy::Url => "url",
            MatchStrategy::TitleAuthor => "title_author",
            MatchStrategy::FuzzyMatch => "fuzzy_match",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Outcome of classifying one pair of records as duplicates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairMatch {
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Rule that fired
    pub strategy: MatchStrategy,
}

/// A primary record plus the records judged to be duplicates of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// First record of the group in input order
    pub primary: CandidateRecord,

    /// Remaining members, in input order
    pub duplicates: Vec<CandidateRecord>,

    /// Confidence of the weakest link that joined a member into the group
    pub confidence: f64,

    /// Strategy of that weakest link
    pub merge_strategy: MatchStrategy,

    /// Input positions of `primary` followed by `duplicates`
    #[serde(default)]
    pub indices: Vec<usize>,
}

impl DuplicateGroup {
    /// Number of records in the group, primary included
    pub fn len(&self) -> usize {
        1 + self.duplicates.len()
    }

    /// Groups always hold a primary, so they are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over primary then duplicates
    pub fn members(&self) -> impl Iterator<Item = &CandidateRecord> {
        std::iter::once(&self.primary).chain(self.duplicates.iter())
    }
}

/// A record produced by collapsing a duplicate group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// The merged bibliographic fields
    #[serde(flatten)]
    pub record: CandidateRecord,

    /// Number of source records folded into this one
    pub merged_from: usize,

    /// Confidence of the group this record came from
    pub merge_confidence: f64,
}

impl MergedRecord {
    /// Wrap a record that had no duplicates
    pub fn unmerged(record: CandidateRecord) -> Self {
        Self {
            record,
            merged_from: 1,
            merge_confidence: 1.0,
        }
    }

    /// Drop the merge metadata
    pub fn into_record(self) -> CandidateRecord {
        self.record
    }
}
