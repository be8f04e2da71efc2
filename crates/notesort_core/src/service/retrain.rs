//! Feedback-driven retraining controller.
//!
//! # Responsibility
//! - Decide after each feedback append whether a retrain is due.
//! - Run full retrains (seed corpus + feedback) and install the result.
//!
//! # Invariants
//! - A retrain fires iff `count >= threshold` and the current bucket
//!   (`count / threshold * threshold`) is above the persisted marker.
//! - At most one retrain runs at a time.
//! - Order on success: persist model, swap live handle, advance marker.
//! - A failed training run or model save leaves model file, live handle and
//!   marker untouched; it is reported in the outcome, never as an error.

use crate::classifier::handle::ModelHandle;
use crate::classifier::{Classifier, TrainError, TrainingReport};
use crate::model::feedback::{build_training_set, TrainingExample};
use crate::repo::feedback_repo::FeedbackLog;
use crate::repo::marker_repo::MarkerStore;
use crate::repo::model_repo::ModelStore;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Largest multiple of `threshold` not exceeding `count`.
pub fn retrain_bucket(count: usize, threshold: usize) -> usize {
    (count / threshold) * threshold
}

/// Returns the bucket to retrain at, or `None` when no retrain is due.
pub fn due_bucket(count: usize, threshold: usize, last_marker: usize) -> Option<usize> {
    let bucket = retrain_bucket(count, threshold);
    (count >= threshold && bucket > last_marker).then_some(bucket)
}

/// Why a due retrain did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrainFailure {
    /// The training set was rejected by the classifier.
    Training(TrainError),
    /// The trained model or the marker could not be persisted.
    Persist(String),
}

impl Display for RetrainFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Training(err) => write!(f, "{err}"),
            Self::Persist(detail) => write!(f, "persist failed: {detail}"),
        }
    }
}

impl Error for RetrainFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Training(err) => Some(err),
            Self::Persist(_) => None,
        }
    }
}

impl From<RepoError> for RetrainFailure {
    fn from(value: RepoError) -> Self {
        Self::Persist(value.to_string())
    }
}

/// Result of evaluating the retrain trigger once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrainOutcome {
    /// Not enough new feedback since the last retrain.
    Skipped {
        feedback_count: usize,
        last_marker: usize,
    },
    /// New classifier trained, persisted and installed.
    Retrained {
        bucket: usize,
        report: TrainingReport,
    },
    /// Retrain did not complete; the marker was not advanced.
    Failed {
        bucket: usize,
        reason: RetrainFailure,
    },
}

impl RetrainOutcome {
    pub fn retrained(&self) -> bool {
        matches!(self, Self::Retrained { .. })
    }
}

/// Owns the retrain decision, model persistence and marker bookkeeping.
#[derive(Debug)]
pub struct RetrainController {
    threshold: usize,
    markers: MarkerStore,
    models: ModelStore,
    in_flight: Mutex<()>,
}

impl RetrainController {
    pub fn new(threshold: usize, markers: MarkerStore, models: ModelStore) -> Self {
        Self {
            threshold: threshold.max(1),
            markers,
            models,
            in_flight: Mutex::new(()),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Feedback count at which the latest retrain happened (`0` if none).
    pub fn last_marker(&self) -> usize {
        self.markers.load()
    }

    /// Loads the persisted classifier, if any.
    pub fn load_model(&self) -> Option<Classifier> {
        self.models.load()
    }

    /// Evaluates the trigger against the current feedback log and retrains
    /// when a new bucket was reached.
    ///
    /// Training and persistence failures are reported as
    /// `RetrainOutcome::Failed`; the next evaluation in the same bucket
    /// retries.
    pub fn evaluate(&self, feedback: &FeedbackLog, live: &ModelHandle) -> RetrainOutcome {
        let _guard = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        let feedback_count = feedback.count();
        let last_marker = self.markers.load();
        let Some(bucket) = due_bucket(feedback_count, self.threshold, last_marker) else {
            return RetrainOutcome::Skipped {
                feedback_count,
                last_marker,
            };
        };

        info!(
            "event=retrain module=service status=start trigger=threshold bucket={} feedback_count={} last_marker={}",
            bucket, feedback_count, last_marker
        );
        let examples = build_training_set(feedback.entries());
        let result = match self.train_and_install(&examples, live) {
            Ok(Ok(report)) => self
                .markers
                .advance(bucket)
                .map(|_| report)
                .map_err(RetrainFailure::from),
            Ok(Err(err)) => Err(RetrainFailure::Training(err)),
            Err(err) => Err(RetrainFailure::from(err)),
        };

        match result {
            Ok(report) => RetrainOutcome::Retrained { bucket, report },
            Err(reason) => {
                warn!(
                    "event=retrain module=service status=error bucket={} error={}",
                    bucket, reason
                );
                RetrainOutcome::Failed { bucket, reason }
            }
        }
    }

    /// Retrains unconditionally from seed corpus + feedback.
    ///
    /// Used to bootstrap the first classifier; the marker is not touched.
    pub fn retrain_now(
        &self,
        feedback: &FeedbackLog,
        live: &ModelHandle,
    ) -> RepoResult<Result<TrainingReport, TrainError>> {
        let _guard = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        info!("event=retrain module=service status=start trigger=manual");
        let examples = build_training_set(feedback.entries());
        self.train_and_install(&examples, live)
    }

    fn train_and_install(
        &self,
        examples: &[TrainingExample],
        live: &ModelHandle,
    ) -> RepoResult<Result<TrainingReport, TrainError>> {
        let started_at = Instant::now();
        let report = TrainingReport::from_examples(examples);
        for weak in &report.undertrained {
            warn!(
                "event=retrain module=service status=undertrained label={} examples={}",
                weak.label, weak.examples
            );
        }

        let model = match Classifier::train(examples) {
            Ok(model) => model,
            Err(err) => return Ok(Err(err)),
        };
        self.models.save(&model)?;
        live.replace(model);

        info!(
            "event=retrain module=service status=ok examples={} labels={} duration_ms={}",
            report.examples,
            report.labels.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Ok(report))
    }
}

#[cfg(test)]
mod tests {
    use super::{due_bucket, retrain_bucket};

    #[test]
    fn bucket_is_largest_multiple_not_above_count() {
        assert_eq!(retrain_bucket(0, 5), 0);
        assert_eq!(retrain_bucket(4, 5), 0);
        assert_eq!(retrain_bucket(5, 5), 5);
        assert_eq!(retrain_bucket(9, 5), 5);
        assert_eq!(retrain_bucket(10, 5), 10);
    }

    #[test]
    fn due_only_when_new_bucket_reached() {
        let fired: Vec<usize> = (1..=12)
            .scan(0usize, |marker, count| {
                let due = due_bucket(count, 5, *marker);
                if let Some(bucket) = due {
                    *marker = bucket;
                }
                Some(due)
            })
            .flatten()
            .collect();
        assert_eq!(fired, vec![5, 10]);
    }

    #[test]
    fn replay_at_same_count_does_not_refire() {
        assert_eq!(due_bucket(5, 5, 0), Some(5));
        assert_eq!(due_bucket(5, 5, 5), None);
        assert_eq!(due_bucket(7, 5, 5), None);
    }

    #[test]
    fn skipped_bucket_fires_once_at_highest_multiple() {
        // log grew from 3 to 11 entries without an evaluation in between
        assert_eq!(due_bucket(11, 5, 0), Some(10));
    }
}
