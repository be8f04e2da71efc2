//! Trained classifier persistence backed by `model.json`.
//!
//! # Invariants
//! - Vectorizer and predictor live in one document, so they are always
//!   swapped together.
//! - Saves replace the document atomically; a failed save leaves the previous
//!   model intact.
//! - A corrupted model document loads as "no model".

use super::document::{read_document, write_document, DocumentRead};
use super::RepoResult;
use crate::classifier::Classifier;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Durable storage for the trained classifier pair.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Loads the persisted classifier, if a readable one exists.
    pub fn load(&self) -> Option<Classifier> {
        match read_document::<Classifier>(&self.path) {
            DocumentRead::Loaded(model) => {
                info!(
                    "event=model_load module=repo status=ok labels={} vocabulary={}",
                    model.labels().len(),
                    model.vocabulary_len()
                );
                Some(model)
            }
            DocumentRead::Missing => None,
            DocumentRead::Corrupted => {
                warn!(
                    "event=model_load module=repo status=corrupted path={}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Persists `model`, atomically replacing any previous one.
    pub fn save(&self, model: &Classifier) -> RepoResult<()> {
        write_document(&self.path, model)?;
        info!(
            "event=model_save module=repo status=ok examples={} labels={}",
            model.trained_on(),
            model.labels().len()
        );
        Ok(())
    }
}
