//! Error types for mapping maintenance

use crate::kind::MappingKindTag;
use clo_model::{EntityId, ValidationError};

/// Mapping maintenance error
///
/// Not-found variants signal a caller bug (an operation on a pair or CLO
/// that reconciliation never produced); they are fatal to the operation but
/// not to the process.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    /// No record for the pair; reconcile first
    #[error("no {kind} mapping for ({clo_id}, {target_id}); reconcile before setting values")]
    MappingNotFound {
        kind: MappingKindTag,
        clo_id: EntityId,
        target_id: EntityId,
    },

    /// Referenced CLO is not in the document
    #[error("CLO not found: {0}")]
    CloNotFound(EntityId),

    /// Malformed input
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl MappingError {
    /// Create mapping-not-found error
    #[inline]
    #[must_use]
    pub fn mapping_not_found(
        kind: MappingKindTag,
        clo_id: &EntityId,
        target_id: &EntityId,
    ) -> Self {
        Self::MappingNotFound {
            kind,
            clo_id: clo_id.clone(),
            target_id: target_id.clone(),
        }
    }

    /// Check if this is a not-found error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MappingNotFound { .. } | Self::CloNotFound(_))
    }

    /// Check if this is a validation error
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
