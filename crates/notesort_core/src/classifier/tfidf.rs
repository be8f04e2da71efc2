//! TF-IDF text vectorizer.
//!
//! # Responsibility
//! - Learn a vocabulary and inverse document frequencies from training text.
//! - Map free text to L2-normalized sparse TF-IDF vectors.
//!
//! # Invariants
//! - Tokens are lowercased runs of two or more word characters.
//! - Vocabulary indices follow alphabetical token order.
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` (smoothed).

use super::TrainError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse feature vector as `(feature index, weight)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Splits text into lowercase word tokens of length >= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fits vocabulary and idf weights over `documents`.
    ///
    /// # Errors
    /// - `TrainError::EmptyTrainingSet` when `documents` is empty.
    /// - `TrainError::EmptyVocabulary` when no document yields a token.
    pub fn fit(documents: &[&str]) -> Result<Self, TrainError> {
        if documents.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let unique: BTreeSet<String> = tokenize(document).into_iter().collect();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(TrainError::EmptyVocabulary);
        }

        let total = documents.len() as f64;
        let idf = doc_freq
            .values()
            .map(|&df| ((1.0 + total) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let vocabulary = doc_freq
            .into_keys()
            .enumerate()
            .map(|(index, token)| (token, index))
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Number of distinct tokens learned during fit.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Returns the feature index of `token`, if it is in the vocabulary.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    /// Vectorizes `text`; unknown tokens are ignored.
    ///
    /// Returns an empty vector when no token is known.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(index) = self.index_of(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: SparseVector = counts
            .into_iter()
            .filter_map(|(index, count)| self.idf.get(index).map(|idf| (index, count * idf)))
            .collect();

        let norm = weighted
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut weighted {
                *weight /= norm;
            }
        }
        weighted
    }
}
