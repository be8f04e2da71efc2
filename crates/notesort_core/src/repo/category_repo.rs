//! Category registry backed by `categories.json`.
//!
//! # Responsibility
//! - Track the set of valid category labels.
//! - Bootstrap the default set when no registry document exists.
//!
//! # Invariants
//! - Persisted registry is sorted and deduplicated.
//! - `register` persists before returning, so later reads observe it.
//! - Persisted labels are re-normalized on load; invalid ones are dropped.

use super::document::{read_document, write_document};
use super::RepoResult;
use crate::model::category::Category;
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Registry of known categories.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    path: PathBuf,
}

impl CategoryRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Lists all categories in sorted order.
    ///
    /// Returns the default set (`todo`, `study`, `ideas`) when the document is
    /// missing or corrupted.
    pub fn list(&self) -> Vec<Category> {
        self.load().into_iter().collect()
    }

    /// Returns whether `category` is registered.
    pub fn contains(&self, category: &Category) -> bool {
        self.load().contains(category)
    }

    /// Registers `category` when absent.
    ///
    /// Returns `true` when the category was newly inserted and persisted,
    /// `false` when it already existed (no write).
    pub fn register(&self, category: &Category) -> RepoResult<bool> {
        let mut categories = self.load();
        if !categories.insert(category.clone()) {
            return Ok(false);
        }

        self.save(&categories)?;
        info!(
            "event=category_register module=repo status=ok category={} total={}",
            category,
            categories.len()
        );
        Ok(true)
    }

    /// Registers every category in `labels`, writing at most once.
    ///
    /// Returns the categories that were newly inserted.
    pub fn register_all<'a>(
        &self,
        labels: impl IntoIterator<Item = &'a Category>,
    ) -> RepoResult<Vec<Category>> {
        let mut categories = self.load();
        let added: Vec<Category> = labels
            .into_iter()
            .filter(|label| categories.insert((*label).clone()))
            .cloned()
            .collect();

        if !added.is_empty() {
            self.save(&categories)?;
            info!(
                "event=category_register module=repo status=ok added={} total={}",
                added.len(),
                categories.len()
            );
        }
        Ok(added)
    }

    fn load(&self) -> BTreeSet<Category> {
        let Some(raw) = read_document::<Vec<String>>(&self.path).loaded() else {
            return Category::defaults().into_iter().collect();
        };

        raw.iter()
            .filter_map(|label| match Category::normalize(label) {
                Ok(category) => Some(category),
                Err(err) => {
                    warn!(
                        "event=category_load module=repo status=skipped path={} error={}",
                        self.path.display(),
                        err
                    );
                    None
                }
            })
            .collect()
    }

    fn save(&self, categories: &BTreeSet<Category>) -> RepoResult<()> {
        let labels: Vec<&str> = categories.iter().map(Category::as_str).collect();
        write_document(&self.path, &labels)
    }
}
