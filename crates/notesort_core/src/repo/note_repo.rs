//! Per-category note lists backed by `notes/<category>.json`.
//!
//! # Responsibility
//! - Provide ordered, index-addressed note storage per category.
//! - Own the file-per-category layout under the notes directory.
//!
//! # Invariants
//! - Indices are 0-based and contiguous; removal shifts later notes down.
//! - A missing or corrupted category document reads as an empty list.
//! - Out-of-range edits fail with `NoteNotFound` and leave storage untouched.

use super::document::{read_document_or_default, write_document};
use super::{RepoError, RepoResult};
use crate::model::category::Category;
use log::info;
use std::path::{Path, PathBuf};

/// Note storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    /// Returns the document path holding notes for `category`.
    pub fn path_for(&self, category: &Category) -> PathBuf {
        self.dir.join(format!("{category}.json"))
    }

    /// Appends one note, creating the category document when absent.
    ///
    /// Returns the index assigned to the new note.
    pub fn append(&self, category: &Category, note: &str) -> RepoResult<usize> {
        let mut notes = self.list(category);
        notes.push(note.to_string());
        self.save(category, &notes)?;

        let index = notes.len() - 1;
        info!(
            "event=note_append module=repo status=ok category={} index={} chars={}",
            category,
            index,
            note.chars().count()
        );
        Ok(index)
    }

    /// Lists notes for `category` in insertion order.
    pub fn list(&self, category: &Category) -> Vec<String> {
        read_document_or_default(&self.path_for(category))
    }

    /// Replaces the note at `index` with `text`.
    pub fn replace(&self, category: &Category, index: usize, text: &str) -> RepoResult<()> {
        let mut notes = self.list(category);
        if index >= notes.len() {
            return Err(not_found(category, index, notes.len()));
        }
        notes[index] = text.to_string();
        self.save(category, &notes)?;

        info!(
            "event=note_replace module=repo status=ok category={} index={}",
            category, index
        );
        Ok(())
    }

    /// Removes the note at `index` and returns its text.
    pub fn remove(&self, category: &Category, index: usize) -> RepoResult<String> {
        let mut notes = self.list(category);
        if index >= notes.len() {
            return Err(not_found(category, index, notes.len()));
        }
        let removed = notes.remove(index);
        self.save(category, &notes)?;

        info!(
            "event=note_remove module=repo status=ok category={} index={} remaining={}",
            category,
            index,
            notes.len()
        );
        Ok(removed)
    }

    fn save(&self, category: &Category, notes: &[String]) -> RepoResult<()> {
        write_document(&self.path_for(category), notes)
    }
}

fn not_found(category: &Category, index: usize, len: usize) -> RepoError {
    RepoError::NoteNotFound {
        category: category.clone(),
        index,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::NoteStore;
    use crate::model::category::Category;
    use crate::repo::RepoError;
    use std::fs;

    fn study() -> Category {
        Category::normalize("study").unwrap()
    }

    #[test]
    fn append_creates_document_and_assigns_indices() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes"));

        assert_eq!(store.append(&study(), "read chapter 1").unwrap(), 0);
        assert_eq!(store.append(&study(), "read chapter 2").unwrap(), 1);
        assert!(store.path_for(&study()).ends_with("notes/study.json"));
        assert_eq!(store.list(&study()), vec!["read chapter 1", "read chapter 2"]);
    }

    #[test]
    fn corrupted_document_lists_empty_and_append_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        fs::write(store.path_for(&study()), "{not json").unwrap();

        assert!(store.list(&study()).is_empty());
        store.append(&study(), "fresh").unwrap();
        assert_eq!(store.list(&study()), vec!["fresh"]);
    }

    #[test]
    fn replace_out_of_range_reports_length() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        store.append(&study(), "only").unwrap();

        let err = store.replace(&study(), 1, "nope").unwrap_err();
        assert!(matches!(err, RepoError::NoteNotFound { index: 1, len: 1, .. }));
        assert_eq!(store.list(&study()), vec!["only"]);
    }
}
