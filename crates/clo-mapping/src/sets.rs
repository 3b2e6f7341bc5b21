//! The three mapping sets of a document, grouped by kind

use crate::kind::{Assessment, MappingKindTag, ProgramOutcome, Teaching};
use crate::mapping::MappingSet;
use clo_model::EntityId;
use serde::{Deserialize, Serialize};

/// Mapping sets keyed by kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingSets {
    #[serde(default)]
    pub teaching: MappingSet<Teaching>,
    #[serde(default)]
    pub assessment: MappingSet<Assessment>,
    #[serde(default)]
    pub plo: MappingSet<ProgramOutcome>,
}

impl MappingSets {
    /// Create empty sets
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy without any record referencing `clo_id`
    #[must_use]
    pub fn without_clo(&self, clo_id: &EntityId) -> Self {
        Self {
            teaching: self.teaching.without_clo(clo_id),
            assessment: self.assessment.without_clo(clo_id),
            plo: self.plo.without_clo(clo_id),
        }
    }

    /// Record count of one kind
    #[must_use]
    pub fn len_of(&self, kind: MappingKindTag) -> usize {
        match kind {
            MappingKindTag::Teaching => self.teaching.len(),
            MappingKindTag::Assessment => self.assessment.len(),
            MappingKindTag::ProgramOutcome => self.plo.len(),
        }
    }

    /// Total record count
    #[must_use]
    pub fn total_len(&self) -> usize {
        MappingKindTag::ALL.iter().map(|k| self.len_of(*k)).sum()
    }

    /// Check if `clo_id` is referenced by any kind
    #[must_use]
    pub fn references_clo(&self, clo_id: &EntityId) -> bool {
        self.teaching.for_clo(clo_id).next().is_some()
            || self.assessment.for_clo(clo_id).next().is_some()
            || self.plo.for_clo(clo_id).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;

    #[test]
    fn without_clo_prunes_every_kind() {
        let c1 = EntityId::persisted("c1");
        let c2 = EntityId::persisted("c2");
        let sets = MappingSets {
            teaching: vec![
                Mapping::with_default(c1.clone(), EntityId::persisted("t")),
                Mapping::with_default(c2.clone(), EntityId::persisted("t")),
            ]
            .into(),
            assessment: vec![Mapping::with_default(c1.clone(), EntityId::persisted("a"))].into(),
            plo: vec![Mapping::with_default(c1.clone(), EntityId::persisted("p"))].into(),
        };

        let pruned = sets.without_clo(&c1);
        assert!(!pruned.references_clo(&c1));
        assert!(pruned.references_clo(&c2));
        assert_eq!(pruned.total_len(), 1);
        assert_eq!(pruned.len_of(MappingKindTag::Teaching), 1);
    }

    #[test]
    fn missing_kinds_deserialize_empty() {
        let sets: MappingSets = serde_json::from_str("{}").unwrap();
        assert_eq!(sets.total_len(), 0);
    }
}
