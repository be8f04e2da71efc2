//! Append-only feedback log backed by `feedback.json`.
//!
//! # Responsibility
//! - Record user corrections as `(note, label)` pairs.
//! - Report the entry count the retraining trigger thresholds against.
//!
//! # Invariants
//! - Entries are only ever appended; existing records are rewritten verbatim.
//! - A missing or corrupted log reads as empty.
//! - `count` counts raw records; `entries` yields only records whose label
//!   still normalizes.

use super::document::{read_document_or_default, write_document};
use super::RepoResult;
use crate::model::feedback::FeedbackEntry;
use crate::model::category::Category;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk shape of one feedback record.
///
/// Labels stay raw strings here so one hand-edited bad label cannot make the
/// whole log unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FeedbackRecord {
    note: String,
    label: String,
}

/// Feedback log rooted at one document path.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Appends one entry and persists the whole log.
    ///
    /// Returns the entry count after the append.
    pub fn append(&self, entry: &FeedbackEntry) -> RepoResult<usize> {
        let mut records = self.load();
        records.push(FeedbackRecord {
            note: entry.note.clone(),
            label: entry.label.to_string(),
        });
        write_document(&self.path, &records)?;

        info!(
            "event=feedback_append module=repo status=ok label={} count={}",
            entry.label,
            records.len()
        );
        Ok(records.len())
    }

    /// Returns the number of records in the log.
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Returns every entry with its label re-normalized, in append order.
    pub fn entries(&self) -> Vec<FeedbackEntry> {
        self.load()
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| match Category::normalize(&record.label) {
                Ok(label) => Some(FeedbackEntry::new(record.note, label)),
                Err(err) => {
                    warn!(
                        "event=feedback_load module=repo status=skipped position={} error={}",
                        position, err
                    );
                    None
                }
            })
            .collect()
    }

    fn load(&self) -> Vec<FeedbackRecord> {
        read_document_or_default(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::FeedbackLog;
    use crate::model::category::Category;
    use crate::model::feedback::FeedbackEntry;
    use std::fs;

    #[test]
    fn append_returns_running_count() {
        let dir = tempfile::tempdir().unwrap();
        let log = FeedbackLog::new(dir.path().join("feedback.json"));
        let label = Category::normalize("ideas").unwrap();

        assert_eq!(log.count(), 0);
        assert_eq!(log.append(&FeedbackEntry::new("a", label.clone())).unwrap(), 1);
        assert_eq!(log.append(&FeedbackEntry::new("b", label)).unwrap(), 2);
        assert_eq!(log.count(), 2);
    }

    #[test]
    fn entries_normalize_legacy_labels_and_skip_invalid_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(
            &path,
            r#"[
                {"note": "pay rent", "label": "Reminders"},
                {"note": "odd", "label": "to-do"},
                {"note": "sketch logo", "label": "ideas"}
            ]"#,
        )
        .unwrap();

        let log = FeedbackLog::new(path);
        assert_eq!(log.count(), 3);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "todo");
        assert_eq!(entries[1].note, "sketch logo");
    }

    #[test]
    fn corrupted_log_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, "[{\"note\": ").unwrap();

        let log = FeedbackLog::new(path);
        assert_eq!(log.count(), 0);
        assert!(log.entries().is_empty());
    }
}
