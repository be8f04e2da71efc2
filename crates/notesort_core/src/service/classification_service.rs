//! Classification use-case service.
//!
//! # Responsibility
//! - Tie registry, note store, feedback log, retraining controller and the
//!   live classifier together behind use-case level APIs.
//! - Enforce label normalization on every category argument.
//!
//! # Invariants
//! - Feedback steps run in order: normalize, register, log, store note,
//!   evaluate retrain; all under one service-wide write lock.
//! - Every category a stored note or feedback entry references is registered
//!   before the note/entry is written.
//! - `classify` never mutates storage.
//! - The live classifier is only replaced by the retraining controller.

use crate::classifier::handle::ModelHandle;
use crate::classifier::{TrainError, TrainingReport};
use crate::config::CoreConfig;
use crate::model::category::{Category, CategoryError};
use crate::model::feedback::{build_training_set, FeedbackEntry};
use crate::repo::category_repo::CategoryRegistry;
use crate::repo::feedback_repo::FeedbackLog;
use crate::repo::marker_repo::MarkerStore;
use crate::repo::model_repo::ModelStore;
use crate::repo::note_repo::NoteStore;
use crate::repo::RepoError;
use crate::service::retrain::{RetrainController, RetrainOutcome};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Service error for classification and note use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Label fails normalization.
    InvalidLabel(CategoryError),
    /// Note index outside the category's list.
    NoteNotFound { category: Category, index: usize },
    /// No trained classifier has been installed yet.
    ModelUnavailable,
    /// Explicit (bootstrap) training failed.
    Training(TrainError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(err) => write!(f, "{err}"),
            Self::NoteNotFound { category, index } => {
                write!(f, "note not found: index {index} in `{category}`")
            }
            Self::ModelUnavailable => write!(f, "no trained classifier is available"),
            Self::Training(err) => write!(f, "training failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLabel(err) => Some(err),
            Self::Training(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound { .. } | Self::ModelUnavailable => None,
        }
    }
}

impl From<CategoryError> for ServiceError {
    fn from(value: CategoryError) -> Self {
        Self::InvalidLabel(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound {
                category, index, ..
            } => Self::NoteNotFound { category, index },
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result of one feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReceipt {
    /// Normalized category the note was filed under.
    pub category: Category,
    /// Whether the category was registered by this call.
    pub new_category: bool,
    /// Feedback log size after the append.
    pub feedback_count: usize,
    /// Retrain trigger evaluation result.
    pub retrain: RetrainOutcome,
}

/// Classification service facade over the data directory.
#[derive(Debug)]
pub struct ClassificationService {
    categories: CategoryRegistry,
    notes: NoteStore,
    feedback: FeedbackLog,
    controller: RetrainController,
    model: ModelHandle,
    write_lock: Mutex<()>,
}

impl ClassificationService {
    /// Opens the service over `config.data_dir()` and loads the persisted
    /// classifier when one exists.
    pub fn open(config: &CoreConfig) -> Self {
        let controller = RetrainController::new(
            config.retrain_threshold(),
            MarkerStore::new(config.marker_path()),
            ModelStore::new(config.model_path()),
        );
        let model = ModelHandle::new(controller.load_model());

        info!(
            "event=service_open module=service status=ok data_dir={} threshold={} model_loaded={}",
            config.data_dir().display(),
            config.retrain_threshold(),
            model.is_loaded()
        );

        Self {
            categories: CategoryRegistry::new(config.categories_path()),
            notes: NoteStore::new(config.notes_dir()),
            feedback: FeedbackLog::new(config.feedback_path()),
            controller,
            model,
            write_lock: Mutex::new(()),
        }
    }

    /// Predicts a category for `text` with the live classifier.
    ///
    /// # Errors
    /// - `ServiceError::ModelUnavailable` when no classifier is installed.
    pub fn classify(&self, text: &str) -> ServiceResult<Category> {
        let model = self.model.current().ok_or(ServiceError::ModelUnavailable)?;
        let category = model.predict(text).ok_or(ServiceError::ModelUnavailable)?;
        debug!(
            "event=classify module=service status=ok category={} chars={}",
            category,
            text.chars().count()
        );
        Ok(category)
    }

    /// Records a correction and files the note under the corrected label.
    ///
    /// Steps: normalize, register if new, append feedback, append note,
    /// evaluate the retrain trigger.
    ///
    /// # Errors
    /// - `ServiceError::InvalidLabel` before any write when `raw_label` is bad.
    /// - `ServiceError::Repo` when the registry, feedback log or note store
    ///   cannot be written. Retrain failures are reported in the receipt.
    pub fn submit_feedback(&self, note: &str, raw_label: &str) -> ServiceResult<FeedbackReceipt> {
        let category = Category::normalize(raw_label)?;
        let _guard = self.lock_writes();

        let new_category = self.categories.register(&category)?;
        let feedback_count = self
            .feedback
            .append(&FeedbackEntry::new(note, category.clone()))?;
        self.notes.append(&category, note)?;
        let retrain = self.controller.evaluate(&self.feedback, &self.model);

        info!(
            "event=feedback module=service status=ok category={} new_category={} count={} retrained={}",
            category,
            new_category,
            feedback_count,
            retrain.retrained()
        );
        Ok(FeedbackReceipt {
            category,
            new_category,
            feedback_count,
            retrain,
        })
    }

    /// Files `text` under the accepted prediction without recording feedback.
    ///
    /// Returns the index assigned to the stored note.
    pub fn accept_prediction(&self, text: &str, predicted_label: &str) -> ServiceResult<usize> {
        let category = Category::normalize(predicted_label)?;
        let _guard = self.lock_writes();
        self.categories.register(&category)?;
        Ok(self.notes.append(&category, text)?)
    }

    /// Trains and installs a classifier from seed corpus + all feedback.
    ///
    /// Every label in the training set is registered first.
    ///
    /// # Errors
    /// - `ServiceError::Training` when the training set is degenerate; the
    ///   previous classifier stays installed.
    pub fn bootstrap_model(&self) -> ServiceResult<TrainingReport> {
        let _guard = self.lock_writes();
        let examples = build_training_set(self.feedback.entries());
        let added = self
            .categories
            .register_all(examples.iter().map(|example| &example.label))?;
        if !added.is_empty() {
            info!(
                "event=bootstrap module=service status=ok registered={}",
                added.len()
            );
        }

        self.controller
            .retrain_now(&self.feedback, &self.model)?
            .map_err(ServiceError::Training)
    }

    /// Lists registered categories in sorted order.
    pub fn categories(&self) -> Vec<Category> {
        self.categories.list()
    }

    /// Lists notes stored under `category`.
    pub fn notes(&self, category: &str) -> ServiceResult<Vec<String>> {
        let category = Category::normalize(category)?;
        Ok(self.notes.list(&category))
    }

    /// Stores `note` under `category` directly, without classification.
    pub fn add_note(&self, category: &str, note: &str) -> ServiceResult<usize> {
        let category = Category::normalize(category)?;
        let _guard = self.lock_writes();
        self.categories.register(&category)?;
        Ok(self.notes.append(&category, note)?)
    }

    /// Replaces the note at `index` in `category`.
    pub fn edit_note(&self, category: &str, index: usize, note: &str) -> ServiceResult<()> {
        let category = Category::normalize(category)?;
        let _guard = self.lock_writes();
        Ok(self.notes.replace(&category, index, note)?)
    }

    /// Deletes the note at `index` in `category` and returns its text.
    pub fn delete_note(&self, category: &str, index: usize) -> ServiceResult<String> {
        let category = Category::normalize(category)?;
        let _guard = self.lock_writes();
        Ok(self.notes.remove(&category, index)?)
    }

    pub fn has_model(&self) -> bool {
        self.model.is_loaded()
    }

    /// Returns a clone of the live classifier handle.
    pub fn model_handle(&self) -> ModelHandle {
        self.model.clone()
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.count()
    }

    pub fn last_retrain_marker(&self) -> usize {
        self.controller.last_marker()
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
