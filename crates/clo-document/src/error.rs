//! Error types for document lifecycle operations
//!
//! Provides error handling for:
//! - Missing courses, documents and PLOs
//! - Optimistic concurrency conflicts
//! - Aggregates that break a mapping invariant
//! - Configuration and rendering failures

use clo_mapping::{ConsistencyViolation, MappingError};
use clo_model::ValidationError;

/// Main document error type
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Stored revision moved on since the caller loaded the document
    #[error("revision conflict on document {id}: expected {expected}, found {found}")]
    RevisionConflict {
        id: String,
        expected: u64,
        found: u64,
    },

    /// Aggregate violates a mapping or numbering invariant
    #[error("document {id} is inconsistent: {} violation(s)", .violations.len())]
    Inconsistent {
        id: String,
        violations: Vec<ConsistencyViolation>,
    },

    /// Mapping maintenance failed
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Malformed input
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Renderer failed
    #[error("render failed: {0}")]
    Render(String),
}

impl DocumentError {
    /// Create not-found error
    #[inline]
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Check if this is a not-found error, including mapping lookups
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Mapping(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Check if this is a revision conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RevisionConflict { .. })
    }

    /// Check if this is a validation error, including mapping validation
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Mapping(e) => e.is_validation(),
            _ => false,
        }
    }

    /// Violations carried by an [`DocumentError::Inconsistent`] error
    #[must_use]
    pub fn violations(&self) -> &[ConsistencyViolation] {
        match self {
            Self::Inconsistent { violations, .. } => violations,
            _ => &[],
        }
    }
}
