//! Configuration file support for scholar-dedup.
//!
//! # Configuration File Format
//!
//! ```toml
//! [dedup]
//! title_similarity_threshold = 0.85
//! author_similarity_threshold = 0.75
//! enable_fuzzy_matching = true
//! strict_doi_matching = true
//! merge_strategy = "keep_highest_quality"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{DuplicateDetectionOptions, OptionsError, RawDetectionOptions};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Dedup section
    #[serde(default)]
    pub dedup: RawDetectionOptions,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    /// Filter directive scoped to this crate, e.g. `scholar_dedup=debug`
    pub fn filter_directive(&self) -> String {
        format!("scholar_dedup={}", self.level.trim().to_lowercase())
    }

    /// Whether structured JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Validated detection options from the `[dedup]` section
    pub fn detection_options(&self) -> Result<DuplicateDetectionOptions, OptionsError> {
        DuplicateDetectionOptions::try_from(self.dedup)
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeStrategy;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[dedup]
title_similarity_threshold = 0.9
author_similarity_threshold = 0.6
strict_doi_matching = false
merge_strategy = "keep_most_recent"

[logging]
level = "debug"
format = "json"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config.dedup.title_similarity_threshold, 0.9);
        assert_eq!(config.dedup.author_similarity_threshold, 0.6);
        assert!(config.dedup.enable_fuzzy_matching);
        assert!(!config.dedup.strict_doi_matching);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());
        assert_eq!(config.logging.filter_directive(), "scholar_dedup=debug");

        let options = config.detection_options().unwrap();
        assert_eq!(options.merge_strategy(), MergeStrategy::KeepMostRecent);
    }

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ConfigFile::default();
        config.dedup.title_similarity_threshold = 0.7;
        config.dedup.merge_strategy = MergeStrategy::KeepMostCitations;

        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.dedup.title_similarity_threshold, 0.7);
        assert_eq!(loaded.dedup.merge_strategy, MergeStrategy::KeepMostCitations);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_config_file_invalid_threshold() {
        let config: ConfigFile =
            toml::from_str("[dedup]\ntitle_similarity_threshold = 1.2\n").unwrap();
        assert!(config.detection_options().is_err());
    }

    #[test]
    fn test_config_file_nonexistent() {
        let result = ConfigFile::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }
}
