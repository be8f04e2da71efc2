//! Core configuration and data directory layout.
//!
//! # Responsibility
//! - Hold the data directory and retrain threshold used by core services.
//! - Own the document file names under the data directory.
//!
//! # Invariants
//! - `data_dir` is never empty.
//! - `retrain_threshold` is at least 1.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Feedback entries required per retrain bucket.
pub const DEFAULT_RETRAIN_THRESHOLD: usize = 5;

const CATEGORIES_FILE: &str = "categories.json";
const NOTES_DIR: &str = "notes";
const FEEDBACK_FILE: &str = "feedback.json";
const MARKER_FILE: &str = ".retrain_marker.json";
const MODEL_FILE: &str = "model.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataDir,
    InvalidRetrainThreshold(usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data_dir cannot be empty"),
            Self::InvalidRetrainThreshold(value) => {
                write!(f, "retrain threshold must be at least 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validated configuration for one notesort data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    data_dir: PathBuf,
    retrain_threshold: usize,
}

impl CoreConfig {
    /// Creates a configuration rooted at `data_dir` with default threshold.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        if data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(Self {
            data_dir,
            retrain_threshold: DEFAULT_RETRAIN_THRESHOLD,
        })
    }

    /// Overrides the retrain threshold.
    pub fn with_retrain_threshold(mut self, threshold: usize) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::InvalidRetrainThreshold(threshold));
        }
        self.retrain_threshold = threshold;
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    pub fn retrain_threshold(&self) -> usize {
        self.retrain_threshold
    }

    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join(CATEGORIES_FILE)
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join(NOTES_DIR)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join(FEEDBACK_FILE)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.data_dir.join(MARKER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_RETRAIN_THRESHOLD};

    #[test]
    fn new_uses_default_threshold_and_layout() {
        let config = CoreConfig::new("/tmp/notesort").unwrap();
        assert_eq!(config.retrain_threshold(), DEFAULT_RETRAIN_THRESHOLD);
        assert!(config.notes_dir().ends_with("notesort/notes"));
        assert!(config.marker_path().ends_with(".retrain_marker.json"));
    }

    #[test]
    fn rejects_empty_dir_and_zero_threshold() {
        assert_eq!(CoreConfig::new(""), Err(ConfigError::EmptyDataDir));
        let err = CoreConfig::new("data")
            .unwrap()
            .with_retrain_threshold(0)
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidRetrainThreshold(0));
    }
}
