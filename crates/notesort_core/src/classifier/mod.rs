//! Text classifier: TF-IDF vectorizer paired with multinomial naive Bayes.
//!
//! # Responsibility
//! - Train an immutable classifier from ordered training examples.
//! - Predict one normalized category for free text.
//! - Provide the swappable live handle shared by readers.
//!
//! # Invariants
//! - A `Classifier` is never mutated after training; retraining builds a new
//!   one.
//! - The label space covers every label present in the training examples.
//! - Training is deterministic for identical example sequences.

use crate::model::category::Category;
use crate::model::feedback::TrainingExample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod handle;
pub mod naive_bayes;
pub mod tfidf;

use naive_bayes::{MultinomialNb, DEFAULT_ALPHA};
use tfidf::{SparseVector, TfidfVectorizer};

/// Labels with fewer examples than this are reported as undertrained.
pub const MIN_EXAMPLES_PER_LABEL: usize = 3;

/// Training failure. The previously trained classifier stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainError {
    /// No training examples were supplied.
    EmptyTrainingSet,
    /// No example produced a single token.
    EmptyVocabulary,
    /// Every example carries the same label.
    SingleClass(Category),
}

impl Display for TrainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTrainingSet => write!(f, "training set is empty"),
            Self::EmptyVocabulary => write!(f, "training text produced an empty vocabulary"),
            Self::SingleClass(label) => write!(
                f,
                "training set only contains label `{label}`; at least two are required"
            ),
        }
    }
}

impl Error for TrainError {}

/// Trained vectorizer + predictor pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    predictor: MultinomialNb,
    trained_on: usize,
}

impl Classifier {
    /// Trains a new classifier on `examples`.
    ///
    /// # Errors
    /// - `TrainError::EmptyTrainingSet` for no examples.
    /// - `TrainError::EmptyVocabulary` when no text yields a token.
    /// - `TrainError::SingleClass` for fewer than two distinct labels.
    pub fn train(examples: &[TrainingExample]) -> Result<Self, TrainError> {
        let texts: Vec<&str> = examples.iter().map(|example| example.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts)?;

        let rows: Vec<SparseVector> = texts.iter().map(|text| vectorizer.transform(text)).collect();
        let labels: Vec<Category> = examples.iter().map(|example| example.label.clone()).collect();
        let predictor =
            MultinomialNb::fit(&rows, &labels, vectorizer.vocabulary_len(), DEFAULT_ALPHA)?;

        Ok(Self {
            vectorizer,
            predictor,
            trained_on: examples.len(),
        })
    }

    /// Predicts the most likely category for `text`.
    ///
    /// Text without any known token is classified by class priors alone.
    /// Returns `None` only for a classifier without classes, which `train`
    /// never produces.
    pub fn predict(&self, text: &str) -> Option<Category> {
        let row = self.vectorizer.transform(text);
        self.predictor.predict(&row).cloned()
    }

    /// Labels this classifier can predict, alphabetically ordered.
    pub fn labels(&self) -> &[Category] {
        self.predictor.classes()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Number of examples the classifier was trained on.
    pub fn trained_on(&self) -> usize {
        self.trained_on
    }
}

/// Per-label example count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: Category,
    pub examples: usize,
}

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingReport {
    /// Total examples (seed + feedback).
    pub examples: usize,
    /// Distinct labels, alphabetically ordered.
    pub labels: Vec<Category>,
    /// Labels with fewer than `MIN_EXAMPLES_PER_LABEL` examples.
    pub undertrained: Vec<LabelCount>,
}

impl TrainingReport {
    pub fn from_examples(examples: &[TrainingExample]) -> Self {
        let mut counts: BTreeMap<&Category, usize> = BTreeMap::new();
        for example in examples {
            *counts.entry(&example.label).or_insert(0) += 1;
        }

        Self {
            examples: examples.len(),
            labels: counts.keys().map(|label| (*label).clone()).collect(),
            undertrained: counts
                .iter()
                .filter(|(_, count)| **count < MIN_EXAMPLES_PER_LABEL)
                .map(|(label, count)| LabelCount {
                    label: (*label).clone(),
                    examples: *count,
                })
                .collect(),
        }
    }
}
