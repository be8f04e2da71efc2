//! Core domain logic for notesort.
//! Classifies notes into categories and retrains from user corrections.

pub mod api;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use classifier::handle::ModelHandle;
pub use classifier::{Classifier, LabelCount, TrainError, TrainingReport};
pub use config::{ConfigError, CoreConfig, DEFAULT_RETRAIN_THRESHOLD};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryError};
pub use model::feedback::{FeedbackEntry, TrainingExample, SEED_CORPUS};
pub use repo::{RepoError, RepoResult};
pub use service::classification_service::{
    ClassificationService, FeedbackReceipt, ServiceError, ServiceResult,
};
pub use service::retrain::{RetrainController, RetrainFailure, RetrainOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
