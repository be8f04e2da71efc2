//! Transport-agnostic request/response boundary.
//!
//! # Responsibility
//! - Expose classify/feedback/category/note operations as stable envelopes
//!   any HTTP or CLI shell can serialize directly.
//! - Map service errors to HTTP-style status codes and stable details.
//!
//! # Invariants
//! - Boundary functions never panic.
//! - Client mistakes map to 4xx (`400` bad label, `404` bad index); missing
//!   model maps to `503`; storage/training failures map to `500`.

use crate::classifier::{LabelCount, TrainingReport};
use crate::model::category::Category;
use crate::service::classification_service::{ClassificationService, ServiceError};
use crate::service::retrain::RetrainOutcome;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Note body request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteIn {
    pub note: String,
}

/// Correction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackIn {
    pub note: String,
    pub correct_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyResponse {
    pub predicted_category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainResponse {
    pub message: String,
    pub examples: usize,
    pub labels: Vec<Category>,
    pub undertrained: Vec<LabelCount>,
}

impl From<TrainingReport> for TrainResponse {
    fn from(report: TrainingReport) -> Self {
        Self {
            message: "Model trained.".to_string(),
            examples: report.examples,
            labels: report.labels,
            undertrained: report.undertrained,
        }
    }
}

/// Boundary error: status code plus a client-facing detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn note_not_found() -> Self {
        Self::new(404, "Note not found.")
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.detail)
    }
}

impl Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::InvalidLabel(_) => Self::new(400, "Invalid category format."),
            ServiceError::NoteNotFound { .. } => Self::note_not_found(),
            ServiceError::ModelUnavailable => {
                Self::new(503, "Model not trained. Run training first.")
            }
            ServiceError::Training(err) => Self::new(500, format!("Training failed: {err}")),
            ServiceError::Repo(err) => {
                warn!("event=api module=api status=error error={}", err);
                Self::new(500, "Storage error.")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn classify(service: &ClassificationService, request: &NoteIn) -> ApiResult<ClassifyResponse> {
    let predicted_category = service.classify(&request.note)?;
    Ok(ClassifyResponse { predicted_category })
}

pub fn feedback(service: &ClassificationService, request: &FeedbackIn) -> ApiResult<MessageResponse> {
    let receipt = service.submit_feedback(&request.note, &request.correct_label)?;
    if let RetrainOutcome::Failed { bucket, reason } = &receipt.retrain {
        warn!(
            "event=api module=api status=retrain_failed bucket={} error={}",
            bucket, reason
        );
    }
    Ok(MessageResponse::new("Feedback saved."))
}

/// Stores a note under its confirmed prediction.
pub fn accept(
    service: &ClassificationService,
    request: &NoteIn,
    category: &str,
) -> ApiResult<MessageResponse> {
    service.accept_prediction(&request.note, category)?;
    Ok(MessageResponse::new("Note saved."))
}

pub fn train(service: &ClassificationService) -> ApiResult<TrainResponse> {
    Ok(service.bootstrap_model()?.into())
}

pub fn categories(service: &ClassificationService) -> CategoriesResponse {
    CategoriesResponse {
        categories: service.categories(),
    }
}

pub fn notes(service: &ClassificationService, category: &str) -> ApiResult<NotesResponse> {
    Ok(NotesResponse {
        notes: service.notes(category)?,
    })
}

pub fn add_note(
    service: &ClassificationService,
    category: &str,
    request: &NoteIn,
) -> ApiResult<MessageResponse> {
    service.add_note(category, &request.note)?;
    Ok(MessageResponse::new("Note added."))
}

/// Replaces one note; negative indices are reported as not found.
pub fn edit_note(
    service: &ClassificationService,
    category: &str,
    index: i64,
    request: &NoteIn,
) -> ApiResult<MessageResponse> {
    let index = usize::try_from(index).map_err(|_| ApiError::note_not_found())?;
    service.edit_note(category, index, &request.note)?;
    Ok(MessageResponse::new("Note updated."))
}

/// Deletes one note; negative indices are reported as not found.
pub fn delete_note(
    service: &ClassificationService,
    category: &str,
    index: i64,
) -> ApiResult<MessageResponse> {
    let index = usize::try_from(index).map_err(|_| ApiError::note_not_found())?;
    service.delete_note(category, index)?;
    Ok(MessageResponse::new("Note deleted."))
}
