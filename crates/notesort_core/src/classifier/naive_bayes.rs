//! Multinomial naive Bayes over sparse TF-IDF features.
//!
//! # Invariants
//! - Classes are ordered alphabetically; ties resolve to the first class.
//! - Feature likelihoods use additive (Laplace) smoothing, so every
//!   log-probability is finite.
//! - Class priors are the empirical label frequencies.

use super::tfidf::SparseVector;
use super::TrainError;
use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Additive smoothing parameter.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fitted multinomial naive Bayes predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<Category>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fits the predictor on `rows` labeled by `labels` (same length).
    ///
    /// # Errors
    /// - `TrainError::EmptyTrainingSet` when there are no rows.
    /// - `TrainError::SingleClass` when fewer than two distinct labels exist.
    pub fn fit(
        rows: &[SparseVector],
        labels: &[Category],
        n_features: usize,
        alpha: f64,
    ) -> Result<Self, TrainError> {
        let Some(first) = labels.first() else {
            return Err(TrainError::EmptyTrainingSet);
        };
        let classes: Vec<Category> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(TrainError::SingleClass(first.clone()));
        }

        let mut class_count = vec![0.0f64; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];
        for (row, label) in rows.iter().zip(labels) {
            let Ok(class) = classes.binary_search(label) else {
                continue;
            };
            class_count[class] += 1.0;
            for &(feature, weight) in row {
                if let Some(slot) = feature_count[class].get_mut(feature) {
                    *slot += weight;
                }
            }
        }

        let total: f64 = class_count.iter().sum();
        let class_log_prior = class_count
            .iter()
            .map(|count| count.ln() - total.ln())
            .collect();
        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
                counts
                    .iter()
                    .map(|count| (count + alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Classes known to the predictor, alphabetically ordered.
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    /// Unnormalized log posterior per class for `row`.
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .filter_map(|&(feature, weight)| {
                            log_probs.get(feature).map(|log_prob| weight * log_prob)
                        })
                        .sum::<f64>()
            })
            .collect()
    }

    /// Returns the highest-scoring class for `row`.
    ///
    /// Returns `None` only for a predictor without classes.
    pub fn predict(&self, row: &SparseVector) -> Option<&Category> {
        let scores = self.joint_log_likelihood(row);
        let mut best: Option<(usize, f64)> = None;
        for (index, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.and_then(|(index, _)| self.classes.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{MultinomialNb, DEFAULT_ALPHA};
    use crate::classifier::TrainError;
    use crate::model::category::Category;

    fn label(value: &str) -> Category {
        Category::normalize(value).unwrap()
    }

    #[test]
    fn fit_requires_two_classes() {
        let rows = vec![vec![(0, 1.0)], vec![(0, 1.0)]];
        let labels = vec![label("todo"), label("todo")];
        let err = MultinomialNb::fit(&rows, &labels, 1, DEFAULT_ALPHA).unwrap_err();
        assert_eq!(err, TrainError::SingleClass(label("todo")));
    }

    #[test]
    fn predicts_class_owning_the_feature() {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(1, 1.0)]];
        let labels = vec![label("study"), label("todo"), label("todo")];
        let model = MultinomialNb::fit(&rows, &labels, 2, DEFAULT_ALPHA).unwrap();

        assert_eq!(model.classes(), &[label("study"), label("todo")]);
        assert_eq!(model.predict(&vec![(0, 1.0)]), Some(&label("study")));
        assert_eq!(model.predict(&vec![(1, 1.0)]), Some(&label("todo")));
    }

    #[test]
    fn empty_row_falls_back_to_prior_and_ties_pick_first_class() {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(1, 1.0)]];
        let labels = vec![label("study"), label("todo"), label("todo")];
        let model = MultinomialNb::fit(&rows, &labels, 2, DEFAULT_ALPHA).unwrap();
        assert_eq!(model.predict(&Vec::new()), Some(&label("todo")));

        let balanced = MultinomialNb::fit(
            &[vec![(0, 1.0)], vec![(1, 1.0)]],
            &[label("ideas"), label("todo")],
            2,
            DEFAULT_ALPHA,
        )
        .unwrap();
        assert_eq!(balanced.predict(&Vec::new()), Some(&label("ideas")));
    }

    #[test]
    fn log_probabilities_are_smoothed() {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let labels = vec![label("ideas"), label("todo")];
        let model = MultinomialNb::fit(&rows, &labels, 2, DEFAULT_ALPHA).unwrap();
        // ideas: counts [1, 0] -> probs [2/3, 1/3], prior 1/2
        let scores = model.joint_log_likelihood(&vec![(1, 1.0)]);
        let expected = 0.5f64.ln() + (1.0f64 / 3.0).ln();
        assert!((scores[0] - expected).abs() < 1e-12);
    }
}
