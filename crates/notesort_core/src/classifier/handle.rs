//! Swappable handle to the live classifier.
//!
//! # Invariants
//! - Readers get an `Arc` snapshot; a concurrent swap never affects a
//!   prediction already in progress.
//! - Only whole, fully trained classifiers are ever installed.

use super::Classifier;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, atomically replaceable reference to the current classifier.
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    current: Arc<RwLock<Option<Arc<Classifier>>>>,
}

impl ModelHandle {
    /// Creates a handle holding `model`, or empty when `None`.
    pub fn new(model: Option<Classifier>) -> Self {
        Self {
            current: Arc::new(RwLock::new(model.map(Arc::new))),
        }
    }

    /// Returns a snapshot of the live classifier.
    pub fn current(&self) -> Option<Arc<Classifier>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Installs `model` as the live classifier and returns the new snapshot.
    pub fn replace(&self, model: Classifier) -> Arc<Classifier> {
        let model = Arc::new(model);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&model));
        model
    }
}

#[cfg(test)]
mod tests {
    use super::ModelHandle;
    use crate::classifier::Classifier;
    use crate::model::feedback::seed_examples;

    #[test]
    fn snapshots_survive_replacement() {
        let handle = ModelHandle::default();
        assert!(handle.current().is_none());

        let installed = handle.replace(Classifier::train(&seed_examples()).unwrap());
        let snapshot = handle.current().unwrap();
        assert!(handle.is_loaded());

        handle.replace(Classifier::train(&seed_examples()).unwrap());
        assert_eq!(snapshot.trained_on(), installed.trained_on());
        assert!(!std::sync::Arc::ptr_eq(&snapshot, &handle.current().unwrap()));
    }
}
