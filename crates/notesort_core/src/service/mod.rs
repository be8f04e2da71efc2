//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and classifier training into use-case
//!   level APIs.
//! - Keep CLI/boundary layers decoupled from storage and model details.

pub mod classification_service;
pub mod retrain;
