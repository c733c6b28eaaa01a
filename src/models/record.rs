//! Candidate record model representing one bibliographic entry from a search client.

use serde::{Deserialize, Serialize};

/// A bibliographic record as returned by an upstream academic-search client
///
/// Records are treated as immutable input: the engine clones what it needs
/// and never edits a caller's record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Publication title
    pub title: String,

    /// Author display names, in publication order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Journal or venue name
    #[serde(default)]
    pub journal: Option<String>,

    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,

    /// Citation count
    #[serde(default)]
    pub citations: Option<u32>,

    /// Digital Object Identifier, in whatever surface form the source used
    #[serde(default)]
    pub doi: Option<String>,

    /// Landing page URL
    #[serde(default)]
    pub url: Option<String>,

    /// Abstract text
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Author-supplied keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Subject topics assigned by the source
    #[serde(default)]
    pub topics: Vec<String>,

    /// Extraction confidence reported upstream, in [0, 1]
    #[serde(default)]
    pub confidence: f64,

    /// Relevance score reported upstream, in [0, 1]
    #[serde(default)]
    pub relevance_score: f64,
}

impl CandidateRecord {
    /// Create a record with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            journal: None,
            year: None,
            citations: None,
            doi: None,
            url: None,
            r#abstract: None,
            keywords: Vec::new(),
            topics: Vec::new(),
            confidence: 0.0,
            relevance_score: 0.0,
        }
    }

    /// Combined upstream quality signal used by [`MergeStrategy::KeepHighestQuality`]
    ///
    /// [`MergeStrategy::KeepHighestQuality`]: crate::config::MergeStrategy::KeepHighestQuality
    pub fn quality_score(&self) -> f64 {
        let confidence = if self.confidence.is_finite() { self.confidence } else { 0.0 };
        let relevance = if self.relevance_score.is_finite() {
            self.relevance_score
        } else {
            0.0
        };
        (confidence + relevance) / 2.0
    }

    /// Check if the record carries a usable title
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Builder for constructing CandidateRecord objects
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: CandidateRecord,
}

impl RecordBuilder {
    /// Create a new builder with the required title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            record: CandidateRecord::new(title),
        }
    }

    /// Append one author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.record.authors.push(name.into());
        self
    }

    /// Replace the author list
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set journal
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.record.journal = Some(journal.into());
        self
    }

    /// Set publication year
    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    /// Set citation count
    pub fn citations(mut self, count: u32) -> Self {
        self.record.citations = Some(count);
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.record.doi = Some(doi.into());
        self
    }

    /// Set URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.record.url = Some(url.into());
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.record.r#abstract = Some(abstract_text.into());
        self
    }

    /// Replace keywords
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace topics
    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Set upstream confidence
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.record.confidence = confidence;
        self
    }

    /// Set upstream relevance score
    pub fn relevance_score(mut self, score: f64) -> Self {
        self.record.relevance_score = score;
        self
    }

    /// Build the CandidateRecord
    pub fn build(self) -> CandidateRecord {
        self.record
    }
}
