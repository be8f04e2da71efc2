//! Retrain marker backed by `.retrain_marker.json`.
//!
//! # Invariants
//! - The marker only moves forward; a lower value is never written.
//! - Missing or corrupted marker documents read as `0`.

use super::document::{read_document, write_document};
use super::RepoResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct MarkerDocument {
    #[serde(default)]
    last_retrained_on: usize,
}

/// Persisted feedback-count bucket of the latest completed retrain.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Returns the last retrain bucket, `0` when none was recorded.
    pub fn load(&self) -> usize {
        read_document::<MarkerDocument>(&self.path)
            .loaded()
            .map_or(0, |doc| doc.last_retrained_on)
    }

    /// Records `bucket` as the latest retrain marker.
    ///
    /// Returns `false` without writing when `bucket` would move the marker
    /// backwards or leave it unchanged.
    pub fn advance(&self, bucket: usize) -> RepoResult<bool> {
        if bucket <= self.load() {
            return Ok(false);
        }
        write_document(
            &self.path,
            &MarkerDocument {
                last_retrained_on: bucket,
            },
        )?;
        Ok(true)
    }
}
