//! Repository layer over JSON documents in the data directory.
//!
//! # Responsibility
//! - Provide per-concern persistence APIs (categories, notes, feedback,
//!   retrain marker, trained model).
//! - Isolate file layout and encoding details from service orchestration.
//!
//! # Invariants
//! - Every write replaces its document atomically (temp file + rename).
//! - Corrupted or missing documents read as empty/default; corruption is
//!   logged and never surfaced to callers.
//! - Repository APIs return semantic errors (`NoteNotFound`) in addition to
//!   I/O and encoding errors.

use crate::model::category::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod category_repo;
pub mod document;
pub mod feedback_repo;
pub mod marker_repo;
pub mod model_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for document persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    NoteNotFound {
        category: Category,
        index: usize,
        len: usize,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Serialize { path, source } => {
                write!(f, "failed to encode `{}`: {source}", path.display())
            }
            Self::NoteNotFound {
                category,
                index,
                len,
            } => write!(
                f,
                "note not found: index {index} in `{category}` (holds {len} notes)"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::NoteNotFound { .. } => None,
        }
    }
}
