//! CLO Model
//!
//! Entities and identifiers for Course Learning Outcome (มคอ.3) documents.
//!
//! # Core Concepts
//!
//! - [`EntityId`]: Temporary (in-memory) or persisted identifier
//! - [`IdGenerator`]: Pluggable allocation of temporary ids
//! - [`Clo`], [`TeachingMethod`], [`AssessmentMethod`], [`Plo`]: Document entities
//! - [`Percentage`]: Validated value in `[0, 100]`
//! - [`ValidationError`]: Malformed constructor input
//!
//! # Example
//!
//! ```rust
//! use clo_model::{AssessmentMethod, IdGenerator, SequentialIdGenerator};
//!
//! let mut ids = SequentialIdGenerator::new();
//! let exam = AssessmentMethod::new(ids.next_id(), "Final exam", "สอบปลายภาค", 40.0).unwrap();
//! assert_eq!(exam.weight.value(), 40.0);
//!
//! assert!(AssessmentMethod::new(ids.next_id(), "Quiz", "แบบทดสอบ", 140.0).is_err());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod entity;
mod error;
mod id;
mod percentage;

// Re-exports
pub use entity::{AssessmentMethod, BloomLevel, Clo, Entity, Plo, Strength, TeachingMethod};
pub use error::ValidationError;
pub use id::{EntityId, IdGenerator, SequentialIdGenerator, UlidGenerator};
pub use percentage::Percentage;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
