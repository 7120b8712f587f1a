//! Pipeline configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard exploratory report. Unknown keys are rejected.

use crate::filter::FilterPolicy;
use crate::query::MisinformationBands;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Knobs of the derive, filter and report stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Report title
    pub title: String,

    /// Paragraph under the title
    pub introduction: String,

    /// Rows whose text contains this marker (case-insensitive) are removed.
    /// `None` disables the filter.
    pub banned_marker: Option<String>,

    /// Drop rows whose raw fields repeat an earlier row.
    pub drop_duplicate_rows: bool,

    /// Minimum words per message. `None` disables the filter.
    pub min_words: Option<usize>,

    /// Entries kept by top-N queries.
    pub leaderboard_size: usize,

    /// Frequency tables are emitted only below this many distinct values.
    pub cardinality_threshold: usize,

    /// Rows sampled for Cramér's V.
    pub association_sample_size: usize,

    /// Seed of the association sample.
    pub seed: u64,

    /// Largest sample the Shapiro-Wilk test runs on.
    pub normality_ceiling: usize,

    /// Every term must occur in a message for the text search question.
    pub search_terms: Vec<String>,

    /// Columns used for Cramér's V.
    pub categorical_columns: Vec<String>,

    /// Columns analysed one by one. Detected from the data when `None`.
    pub numeric_columns: Option<Vec<String>>,

    /// Directory chart images are expected in, as referenced by the report.
    pub images_dir: String,

    /// Misinformation score bands.
    pub misinformation: MisinformationBands,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "Exploratory Data Analysis Report".to_string(),
            introduction: "This report presents the findings of the exploratory analysis of the processed messaging export.".to_string(),
            banned_marker: Some("trava-zaps".to_string()),
            drop_duplicate_rows: true,
            min_words: Some(5),
            leaderboard_size: 30,
            cardinality_threshold: 50,
            association_sample_size: 5000,
            seed: 42,
            normality_ceiling: 5000,
            search_terms: vec!["FACÇÃO".to_string(), "CRIMINOSA".to_string()],
            categorical_columns: vec![
                "media_type".to_string(),
                "message_type".to_string(),
                "messenger".to_string(),
            ],
            numeric_columns: None,
            images_dir: "./images".to_string(),
            misinformation: MisinformationBands::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard_size == 0 {
            return Err(ConfigError::Invalid("leaderboard_size must be positive".into()));
        }
        if self.association_sample_size == 0 {
            return Err(ConfigError::Invalid("association_sample_size must be positive".into()));
        }
        if self.misinformation.lower > self.misinformation.upper {
            return Err(ConfigError::Invalid(format!(
                "misinformation.lower ({}) exceeds misinformation.upper ({})",
                self.misinformation.lower, self.misinformation.upper
            )));
        }
        Ok(())
    }

    /// Filter stage settings
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy {
            banned_marker: self.banned_marker.clone(),
            drop_duplicate_rows: self.drop_duplicate_rows,
            min_words: self.min_words,
        }
    }

    /// Image reference for a chart file name, under [`images_dir`](Self::images_dir)
    pub fn image_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.images_dir.trim_end_matches('/'), file_name)
    }
}
