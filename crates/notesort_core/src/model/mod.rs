//! Domain model for categorized notes and classifier feedback.
//!
//! # Responsibility
//! - Define canonical label, feedback and training record types.
//! - Keep normalization rules in one place for every caller.
//!
//! # Invariants
//! - Every stored label is a normalized `Category`.
//! - Notes themselves are opaque text and carry no identity beyond their
//!   position in a category.

pub mod category;
pub mod feedback;
