//! Mapping records and mapping sets
//!
//! A [`MappingSet`] is the raw relation table for one kind. It may hold
//! whatever a loaded document contained (duplicates, orphans, gaps);
//! [`reconcile`](crate::reconcile) is what turns it into a table satisfying
//! the one-record-per-pair invariant.

use crate::error::MappingError;
use crate::kind::{Assessment, MappingKind};
use clo_model::EntityId;
use serde::{Deserialize, Serialize};

/// One (CLO, target) relation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Mapping<K: MappingKind> {
    pub clo_id: EntityId,
    pub target_id: EntityId,
    pub value: K::Value,
}

impl<K: MappingKind> Mapping<K> {
    /// Create mapping record
    #[inline]
    #[must_use]
    pub fn new(clo_id: EntityId, target_id: EntityId, value: K::Value) -> Self {
        Self {
            clo_id,
            target_id,
            value,
        }
    }

    /// Create mapping record with the kind's default value
    #[inline]
    #[must_use]
    pub fn with_default(clo_id: EntityId, target_id: EntityId) -> Self {
        Self::new(clo_id, target_id, K::DEFAULT)
    }

    /// Check if this record links `clo_id` and `target_id`
    #[inline]
    #[must_use]
    pub fn links(&self, clo_id: &EntityId, target_id: &EntityId) -> bool {
        &self.clo_id == clo_id && &self.target_id == target_id
    }
}

/// Relation table of one mapping kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct MappingSet<K: MappingKind> {
    entries: Vec<Mapping<K>>,
}

impl<K: MappingKind> Default for MappingSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MappingKind> MappingSet<K> {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate records in stored order
    pub fn iter(&self) -> impl Iterator<Item = &Mapping<K>> {
        self.entries.iter()
    }

    /// Records as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mapping<K>] {
        &self.entries
    }

    /// Value for a pair, if a record exists
    #[must_use]
    pub fn get(&self, clo_id: &EntityId, target_id: &EntityId) -> Option<K::Value> {
        self.entries
            .iter()
            .find(|m| m.links(clo_id, target_id))
            .map(|m| m.value)
    }

    /// Check if a record exists for the pair
    #[inline]
    #[must_use]
    pub fn contains(&self, clo_id: &EntityId, target_id: &EntityId) -> bool {
        self.get(clo_id, target_id).is_some()
    }

    /// Records of one CLO
    pub fn for_clo<'a>(&'a self, clo_id: &'a EntityId) -> impl Iterator<Item = &'a Mapping<K>> {
        self.entries.iter().filter(move |m| &m.clo_id == clo_id)
    }

    /// Records of one target
    pub fn for_target<'a>(
        &'a self,
        target_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a Mapping<K>> {
        self.entries.iter().filter(move |m| &m.target_id == target_id)
    }

    /// Copy without records referencing `clo_id`
    #[must_use]
    pub fn without_clo(&self, clo_id: &EntityId) -> Self {
        self.entries
            .iter()
            .filter(|m| &m.clo_id != clo_id)
            .cloned()
            .collect()
    }

    /// Copy without records referencing `target_id`
    #[must_use]
    pub fn without_target(&self, target_id: &EntityId) -> Self {
        self.entries
            .iter()
            .filter(|m| &m.target_id != target_id)
            .cloned()
            .collect()
    }

    /// Copy with one record's value replaced
    ///
    /// Never creates a record: the pair must already be present, which is
    /// what reconciliation guarantees.
    ///
    /// # Errors
    /// Returns [`MappingError::MappingNotFound`] if no record links the pair
    pub fn with_value(
        &self,
        clo_id: &EntityId,
        target_id: &EntityId,
        value: K::Value,
    ) -> Result<Self, MappingError> {
        let position = self
            .entries
            .iter()
            .position(|m| m.links(clo_id, target_id))
            .ok_or_else(|| MappingError::mapping_not_found(K::TAG, clo_id, target_id))?;

        let mut entries = self.entries.clone();
        entries[position].value = value;
        Ok(Self { entries })
    }

    /// Copy with every id passed through `remap`
    #[must_use]
    pub fn map_ids(&self, mut remap: impl FnMut(&EntityId) -> EntityId) -> Self {
        self.entries
            .iter()
            .map(|m| Mapping::new(remap(&m.clo_id), remap(&m.target_id), m.value))
            .collect()
    }

    /// Unwrap into records
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<Mapping<K>> {
        self.entries
    }
}

impl MappingSet<Assessment> {
    /// Sum of assessment percentages for one CLO
    ///
    /// Display aid only: nothing requires the total to reach 100.
    #[must_use]
    pub fn total_for_clo(&self, clo_id: &EntityId) -> f64 {
        self.for_clo(clo_id).map(|m| m.value.value()).sum()
    }
}

impl<K: MappingKind> FromIterator<Mapping<K>> for MappingSet<K> {
    fn from_iter<I: IntoIterator<Item = Mapping<K>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: MappingKind> From<Vec<Mapping<K>>> for MappingSet<K> {
    fn from(entries: Vec<Mapping<K>>) -> Self {
        Self { entries }
    }
}

impl<'a, K: MappingKind> IntoIterator for &'a MappingSet<K> {
    type Item = &'a Mapping<K>;
    type IntoIter = std::slice::Iter<'a, Mapping<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Replace one mapping's value
///
/// Free-function form of [`MappingSet::with_value`].
///
/// # Errors
/// Returns [`MappingError::MappingNotFound`] if the pair was never reconciled
pub fn set_mapping_value<K: MappingKind>(
    mappings: &MappingSet<K>,
    clo_id: &EntityId,
    target_id: &EntityId,
    value: K::Value,
) -> Result<MappingSet<K>, MappingError> {
    mappings.with_value(clo_id, target_id, value)
}

/// Sum of assessment percentages for one CLO
///
/// Free-function form of [`MappingSet::total_for_clo`].
#[must_use]
pub fn total_for_clo(mappings: &MappingSet<Assessment>, clo_id: &EntityId) -> f64 {
    mappings.total_for_clo(clo_id)
}
