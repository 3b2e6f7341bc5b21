//! CLO Mapping
//!
//! Consistency model for the three CLO-keyed relation tables of a course
//! document: CLO × teaching method, CLO × assessment method, CLO × PLO.
//!
//! # Core Concepts
//!
//! - [`MappingKind`]: Sealed marker trait, one per relation table
//! - [`MappingSet`]: Raw relation table of one kind
//! - [`reconcile`]: Regenerate a table so it holds exactly one record per pair
//! - [`CloSnapshot`]: Immutable document aggregate with reducer methods
//! - [`check_consistency`]: Report every broken invariant
//!
//! # Example
//!
//! ```rust
//! use clo_mapping::CloSnapshot;
//! use clo_model::{BloomLevel, EntityId, Plo, SequentialIdGenerator};
//!
//! let mut ids = SequentialIdGenerator::new();
//! let snapshot = CloSnapshot::with_plos(vec![Plo::new(EntityId::persisted("p1"), "PLO1", "PLO1")]);
//!
//! let (snapshot, clo) = snapshot.add_clo(None, BloomLevel::Apply, &mut ids).unwrap();
//! let (snapshot, exam) = snapshot.add_assessment_method("Exam", "สอบ", 60.0, &mut ids).unwrap();
//! let snapshot = snapshot.set_percentage(&clo, &exam, 40.0).unwrap();
//!
//! assert_eq!(snapshot.assessment_total(&clo), 40.0);
//! assert!(snapshot.is_consistent());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod consistency;
mod error;
mod kind;
mod mapping;
mod methods;
mod numbering;
mod reconcile;
mod sets;
mod snapshot;

// Re-exports
pub use consistency::{check_consistency, duplicate_ids, ConsistencyViolation};
pub use error::MappingError;
pub use kind::{Assessment, MappingKind, MappingKindTag, MappingValue, ProgramOutcome, Teaching};
pub use mapping::{set_mapping_value, total_for_clo, Mapping, MappingSet};
pub use methods::{add_method, remove_method};
pub use numbering::{add_clo, is_dense, move_clo, normalize_numbers, remove_clo, renumber};
pub use reconcile::reconcile;
pub use sets::MappingSets;
pub use snapshot::{CloSnapshot, CloTotal, TOTAL_EPSILON};

#[doc(hidden)]
pub mod __private {
    pub use crate::kind::private::Sealed;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
