//! Category label model and normalization rules.
//!
//! # Responsibility
//! - Define the single validated label type notes are filed under.
//! - Own the normalization rule applied before any storage or comparison.
//!
//! # Invariants
//! - A `Category` always matches `^[a-z]+$`.
//! - `reminders` never survives normalization; it is filed as `todo`.
//! - Normalization is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+$").expect("valid label regex"));

const ALIASES: &[(&str, &str)] = &[("reminders", "todo")];

/// Categories present before any registry document exists.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["todo", "study", "ideas"];

/// Label normalization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Normalized label is empty or contains non `a-z` characters.
    InvalidLabel(String),
}

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(raw) => write!(
                f,
                "invalid category `{raw}`: expected one lowercase word with letters a-z only"
            ),
        }
    }
}

impl Error for CategoryError {}

/// Normalized category label.
///
/// Serialized as a bare string. Deserialization runs the same normalization,
/// so persisted legacy labels such as `Reminders` load as `todo`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Normalizes raw user input into a category.
    ///
    /// Rules, applied in order:
    /// - surrounding whitespace is trimmed;
    /// - text is lowercased;
    /// - aliases are resolved (`reminders` -> `todo`);
    /// - the result must match `^[a-z]+$`.
    ///
    /// # Errors
    /// - `CategoryError::InvalidLabel` carrying the raw input when the result
    ///   does not match.
    pub fn normalize(raw: &str) -> Result<Self, CategoryError> {
        let lowered = raw.trim().to_lowercase();
        let resolved = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map_or(lowered.as_str(), |(_, target)| *target);

        if !LABEL_RE.is_match(resolved) {
            return Err(CategoryError::InvalidLabel(raw.to_string()));
        }

        Ok(Self(resolved.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the bootstrap registry contents.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|label| Self((*label).to_string()))
            .collect()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl PartialEq<&str> for Category {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, CategoryError};

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(Category::normalize("  STUDY ").unwrap(), "study");
    }

    #[test]
    fn reminders_alias_resolves_to_todo() {
        assert_eq!(Category::normalize("Reminders").unwrap(), "todo");
        assert_eq!(Category::normalize(" reminders\n").unwrap(), "todo");
    }

    #[test]
    fn normalize_rejects_symbols_digits_and_empty() {
        for raw in ["to-do", "todo2", "two words", "", "   ", "caf\u{e9}"] {
            let err = Category::normalize(raw).unwrap_err();
            assert_eq!(err, CategoryError::InvalidLabel(raw.to_string()));
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["Ideas", "  todo", "REMINDERS", "Groceries  "] {
            let once = Category::normalize(raw).unwrap();
            let twice = Category::normalize(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn serde_uses_plain_string_and_normalizes_on_read() {
        let category = Category::normalize("ideas").unwrap();
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"ideas\"");

        let loaded: Category = serde_json::from_str("\"Reminders\"").unwrap();
        assert_eq!(loaded, "todo");
        assert!(serde_json::from_str::<Category>("\"to-do\"").is_err());
    }
}
