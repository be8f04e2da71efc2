//! Feedback and training example records.
//!
//! # Responsibility
//! - Define the correction record appended by the feedback flow.
//! - Own the fixed seed corpus every training run starts from.
//!
//! # Invariants
//! - Feedback entries are immutable once appended.
//! - Training sets are always `seed corpus ++ feedback`, in that order.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};

/// Hand-authored bootstrap examples spanning the default categories.
pub const SEED_CORPUS: [(&str, &str); 9] = [
    ("Buy milk and eggs", "todo"),
    ("Complete AI assignment", "study"),
    ("Call mom tomorrow", "todo"),
    ("Idea for startup: reusable notebook", "ideas"),
    ("Revise neural networks", "study"),
    ("Think about app for learning languages", "ideas"),
    ("Doctor appointment at 5 PM", "todo"),
    ("Prepare for viva exam", "study"),
    ("Plan trip to Ladakh", "ideas"),
];

/// One user correction: the note text and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub note: String,
    pub label: Category,
}

impl FeedbackEntry {
    pub fn new(note: impl Into<String>, label: Category) -> Self {
        Self {
            note: note.into(),
            label,
        }
    }
}

/// Labeled text consumed by classifier training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub text: String,
    pub label: Category,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: Category) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

impl From<FeedbackEntry> for TrainingExample {
    fn from(value: FeedbackEntry) -> Self {
        Self {
            text: value.note,
            label: value.label,
        }
    }
}

/// Returns the seed corpus as training examples.
pub fn seed_examples() -> Vec<TrainingExample> {
    SEED_CORPUS
        .iter()
        .filter_map(|(text, label)| {
            Category::normalize(label)
                .ok()
                .map(|label| TrainingExample::new(*text, label))
        })
        .collect()
}

/// Builds the full training set: seed corpus followed by every feedback entry.
pub fn build_training_set(feedback: Vec<FeedbackEntry>) -> Vec<TrainingExample> {
    let mut examples = seed_examples();
    examples.extend(feedback.into_iter().map(TrainingExample::from));
    examples
}

#[cfg(test)]
mod tests {
    use super::{build_training_set, seed_examples, FeedbackEntry, SEED_CORPUS};
    use crate::model::category::Category;

    #[test]
    fn seed_corpus_is_fully_valid() {
        let seed = seed_examples();
        assert_eq!(seed.len(), SEED_CORPUS.len());
        for label in ["todo", "study", "ideas"] {
            assert_eq!(seed.iter().filter(|ex| ex.label == label).count(), 3);
        }
    }

    #[test]
    fn training_set_keeps_seed_first_then_feedback_order() {
        let feedback = vec![
            FeedbackEntry::new("water plants", Category::normalize("chores").unwrap()),
            FeedbackEntry::new("read paper", Category::normalize("study").unwrap()),
        ];
        let examples = build_training_set(feedback);
        assert_eq!(examples.len(), SEED_CORPUS.len() + 2);
        assert_eq!(examples[0].text, "Buy milk and eggs");
        assert_eq!(examples[9].text, "water plants");
        assert_eq!(examples[9].label, "chores");
        assert_eq!(examples[10].text, "read paper");
    }
}
