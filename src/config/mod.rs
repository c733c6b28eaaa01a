//! Configuration management.
//!
//! [`DuplicateDetectionOptions`] is validated when it is built or deserialized,
//! so every value reaching the engine already has thresholds in `[0, 1]`.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or loading detection options
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("{name} must be a number in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("Unknown merge strategy: {0}")]
    InvalidMergeStrategy(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// How field values are chosen when a duplicate group is collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Prefer the member with the best upstream confidence and relevance
    #[default]
    KeepHighestQuality,
    /// Prefer the member with the latest publication year
    KeepMostRecent,
    /// Prefer the member with the most citations
    KeepMostCitations,
}

impl MergeStrategy {
    /// Returns the configuration identifier
    pub fn id(&self) -> &'static str {
        match self {
            MergeStrategy::KeepHighestQuality => "keep_highest_quality",
            MergeStrategy::KeepMostRecent => "keep_most_recent",
            MergeStrategy::KeepMostCitations => "keep_most_citations",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep_highest_quality" => Ok(MergeStrategy::KeepHighestQuality),
            "keep_most_recent" => Ok(MergeStrategy::KeepMostRecent),
            "keep_most_citations" => Ok(MergeStrategy::KeepMostCitations),
            other => Err(OptionsError::InvalidMergeStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Validated tunables for one deduplication call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetectionOptions", into = "RawDetectionOptions")]
pub struct DuplicateDetectionOptions {
    title_similarity_threshold: f64,
    author_similarity_threshold: f64,
    enable_fuzzy_matching: bool,
    strict_doi_matching: bool,
    merge_strategy: MergeStrategy,
}

impl Default for DuplicateDetectionOptions {
    fn default() -> Self {
        Self {
            title_similarity_threshold: default_title_threshold(),
            author_similarity_threshold: default_author_threshold(),
            enable_fuzzy_matching: true,
            strict_doi_matching: true,
            merge_strategy: MergeStrategy::default(),
        }
    }
}

impl DuplicateDetectionOptions {
    /// Start from the defaults
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Minimum title similarity for a fuzzy match
    pub fn title_similarity_threshold(&self) -> f64 {
        self.title_similarity_threshold
    }

    /// Minimum author-list similarity for a fuzzy match
    pub fn author_similarity_threshold(&self) -> f64 {
        self.author_similarity_threshold
    }

    /// Whether the fuzzy rule is evaluated at all
    pub fn enable_fuzzy_matching(&self) -> bool {
        self.enable_fuzzy_matching
    }

    /// Whether DOI equality alone is definitive
    pub fn strict_doi_matching(&self) -> bool {
        self.strict_doi_matching
    }

    /// Field-resolution policy for merging
    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    /// Copy of these options with a different merge strategy
    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }
}

fn default_title_threshold() -> f64 {
    0.85
}

fn default_author_threshold() -> f64 {
    0.75
}

fn default_true() -> bool {
    true
}

/// Unvalidated options as they appear in a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDetectionOptions {
    #[serde(default = "default_title_threshold")]
    pub title_similarity_threshold: f64,

    #[serde(default = "default_author_threshold")]
    pub author_similarity_threshold: f64,

    #[serde(default = "default_true")]
    pub enable_fuzzy_matching: bool,

    #[serde(default = "default_true")]
    pub strict_doi_matching: bool,

    #[serde(default)]
    pub merge_strategy: MergeStrategy,
}

impl Default for RawDetectionOptions {
    fn default() -> Self {
        DuplicateDetectionOptions::default().into()
    }
}

impl From<DuplicateDetectionOptions> for RawDetectionOptions {
    fn from(options: DuplicateDetectionOptions) -> Self {
        Self {
            title_similarity_threshold: options.title_similarity_threshold,
            author_similarity_threshold: options.author_similarity_threshold,
            enable_fuzzy_matching: options.enable_fuzzy_matching,
            strict_doi_matching: options.strict_doi_matching,
            merge_strategy: options.merge_strategy,
        }
    }
}

impl TryFrom<RawDetectionOptions> for DuplicateDetectionOptions {
    type Error = OptionsError;

    fn try_from(raw: RawDetectionOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            title_similarity_threshold: check_threshold(
                "title_similarity_threshold",
                raw.title_similarity_threshold,
            )?,
            author_similarity_threshold: check_threshold(
                "author_similarity_threshold",
                raw.author_similarity_threshold,
            )?,
            enable_fuzzy_matching: raw.enable_fuzzy_matching,
            strict_doi_matching: raw.strict_doi_matching,
            merge_strategy: raw.merge_strategy,
        })
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<f64, OptionsError> {
    // NaN fails the range check as well
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OptionsError::ThresholdOutOfRange { name, value })
    }
}

/// Builder for [`DuplicateDetectionOptions`]
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    raw: RawDetectionOptions,
}

impl OptionsBuilder {
    /// Set the title similarity threshold
    pub fn title_similarity_threshold(mut self, threshold: f64) -> Self {
        self.raw.title_similarity_threshold = threshold;
        self
    }

    /// Set the author-list similarity threshold
    pub fn author_similarity_threshold(mut self, threshold: f64) -> Self {
        self.raw.author_similarity_threshold = threshold;
        self
    }

    /// Enable or disable fuzzy matching
    pub fn enable_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.raw.enable_fuzzy_matching = enabled;
        self
    }

    /// Enable or disable strict DOI matching
    pub fn strict_doi_matching(mut self, strict: bool) -> Self {
        self.raw.strict_doi_matching = strict;
        self
    }

    /// Set the merge strategy
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.raw.merge_strategy = strategy;
        self
    }

    /// Validate and build the options
    pub fn build(self) -> Result<DuplicateDetectionOptions, OptionsError> {
        DuplicateDetectionOptions::try_from(self.raw)
    }
}

/// Load detection options from the `[dedup]` table of a configuration file
///
/// A file without a `[dedup]` table yields the defaults.
pub fn load_options(path: &Path) -> Result<DuplicateDetectionOptions, OptionsError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let raw = match settings.get::<RawDetectionOptions>("dedup") {
        Ok(raw) => raw,
        Err(config::ConfigError::NotFound(_)) => RawDetectionOptions::default(),
        Err(e) => return Err(e.into()),
    };

    tracing::debug!("Loaded dedup options from {}", path.display());
    raw.try_into()
}
