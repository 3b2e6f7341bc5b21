//! Immutable document snapshot with reducer methods
//!
//! [`CloSnapshot`] bundles the CLOs, methods, PLOs and mapping sets of one
//! document. Every reducer takes `&self` and returns a new snapshot; the
//! input is never modified. Reducers that change the CLO or target lists
//! reconcile the affected mapping sets before returning.

use crate::consistency::{check_consistency, duplicate_ids, ConsistencyViolation};
use crate::error::MappingError;
use crate::kind::{Assessment, MappingKind, MappingKindTag, MappingValue, ProgramOutcome, Teaching};
use crate::methods::{add_method, remove_method};
use crate::numbering::{self, normalize_numbers};
use crate::sets::MappingSets;
use clo_model::{
    AssessmentMethod, BloomLevel, Clo, Entity, EntityId, IdGenerator, Percentage, Plo, Strength,
    TeachingMethod, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// CLOs, methods, PLOs and their mappings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CloSnapshot {
    #[serde(default)]
    pub clos: Vec<Clo>,
    #[serde(default)]
    pub teaching_methods: Vec<TeachingMethod>,
    #[serde(default)]
    pub assessment_methods: Vec<AssessmentMethod>,
    #[serde(default)]
    pub plos: Vec<Plo>,
    #[serde(default)]
    pub mappings: MappingSets,
}

/// Tolerance when comparing an assessment total against 100
pub const TOTAL_EPSILON: f64 = 1e-6;

/// Assessment total of one CLO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloTotal {
    pub clo_id: EntityId,
    pub number: u32,
    pub total: f64,
}

impl CloTotal {
    /// Check if the CLO is assessed at all but not to exactly 100%
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.total > 0.0 && (self.total - 100.0).abs() > TOTAL_EPSILON
    }
}

impl CloSnapshot {
    /// Empty snapshot mapped against a PLO catalog
    #[must_use]
    pub fn with_plos(plos: Vec<Plo>) -> Self {
        Self {
            plos,
            ..Self::default()
        }
    }

    /// Reconcile all three mapping sets against the current lists
    #[must_use]
    pub fn reconciled(&self) -> Self {
        let mut next = self.clone();
        next.reconcile_in_place();
        next
    }

    /// Repair numbering, then reconcile
    ///
    /// Entry point for aggregates loaded from storage.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut next = self.clone();
        next.clos = normalize_numbers(&self.clos);
        next.reconcile_in_place();
        next
    }

    fn reconcile_in_place(&mut self) {
        let sets = &self.mappings;
        self.mappings = MappingSets {
            teaching: sets.teaching.reconciled(&self.clos, &self.teaching_methods),
            assessment: sets.assessment.reconciled(&self.clos, &self.assessment_methods),
            plo: sets.plo.reconciled(&self.clos, &self.plos),
        };
    }

    // --- CLOs ---

    /// Add a CLO (appended, or inserted at `number`) and reconcile
    ///
    /// # Errors
    /// Returns [`MappingError::Validation`] if `number` is outside `1..=len + 1`
    pub fn add_clo(
        &self,
        number: Option<u32>,
        bloom_level: BloomLevel,
        ids: &mut impl IdGenerator,
    ) -> Result<(Self, EntityId), MappingError> {
        let (mut clos, id) = numbering::add_clo(&self.clos, number, ids)?;
        if let Some(clo) = clos.iter_mut().find(|clo| clo.id == id) {
            clo.bloom_level = bloom_level;
        }

        let mut next = Self {
            clos,
            ..self.clone()
        };
        next.reconcile_in_place();
        Ok((next, id))
    }

    /// Remove a CLO, renumber and prune its mappings
    #[must_use]
    pub fn remove_clo(&self, clo_id: &EntityId) -> Self {
        let (clos, mappings) = numbering::remove_clo(&self.clos, &self.mappings, clo_id);
        Self {
            clos,
            mappings,
            ..self.clone()
        }
    }

    /// Move a CLO to `new_number`
    ///
    /// # Errors
    /// See [`numbering::move_clo`]
    pub fn move_clo(&self, clo_id: &EntityId, new_number: u32) -> Result<Self, MappingError> {
        Ok(Self {
            clos: numbering::move_clo(&self.clos, clo_id, new_number)?,
            ..self.clone()
        })
    }

    /// Edit a CLO's text fields
    ///
    /// `id` and `number` are restored after `edit` runs; use
    /// [`CloSnapshot::move_clo`] to renumber.
    ///
    /// # Errors
    /// Returns [`MappingError::CloNotFound`] if `clo_id` is not present
    pub fn edit_clo(
        &self,
        clo_id: &EntityId,
        edit: impl FnOnce(&mut Clo),
    ) -> Result<Self, MappingError> {
        let mut next = self.clone();
        let clo = next
            .clos
            .iter_mut()
            .find(|clo| &clo.id == clo_id)
            .ok_or_else(|| MappingError::CloNotFound(clo_id.clone()))?;

        let (id, number) = (clo.id.clone(), clo.number);
        edit(clo);
        clo.id = id;
        clo.number = number;
        Ok(next)
    }

    // --- Targets ---

    /// Append a teaching method and map it to every CLO
    #[must_use]
    pub fn add_teaching_method(
        &self,
        name_en: &str,
        name_th: &str,
        ids: &mut impl IdGenerator,
    ) -> (Self, EntityId) {
        let (methods, id, teaching) = add_method(
            &self.teaching_methods,
            &self.clos,
            &self.mappings.teaching,
            Teaching::DEFAULT,
            ids,
            |id| TeachingMethod::new(id, name_en, name_th),
        );

        let mut next = self.clone();
        next.teaching_methods = methods;
        next.mappings.teaching = teaching;
        (next, id)
    }

    /// Remove a teaching method and its mappings
    #[must_use]
    pub fn remove_teaching_method(&self, method_id: &EntityId) -> Self {
        let (methods, teaching) =
            remove_method(&self.teaching_methods, &self.mappings.teaching, method_id);

        let mut next = self.clone();
        next.teaching_methods = methods;
        next.mappings.teaching = teaching;
        next
    }

    /// Append an assessment method and map it to every CLO
    ///
    /// # Errors
    /// Returns [`MappingError::Validation`] if `weight` is outside `[0, 100]`
    pub fn add_assessment_method(
        &self,
        name_en: &str,
        name_th: &str,
        weight: f64,
        ids: &mut impl IdGenerator,
    ) -> Result<(Self, EntityId), MappingError> {
        let weight = Percentage::for_field("weight", weight)?;
        let (methods, id, assessment) = add_method(
            &self.assessment_methods,
            &self.clos,
            &self.mappings.assessment,
            Assessment::DEFAULT,
            ids,
            |id| AssessmentMethod {
                weight,
                name_en: name_en.to_owned(),
                name_th: name_th.to_owned(),
                ..AssessmentMethod::blank(id)
            },
        );

        let mut next = self.clone();
        next.assessment_methods = methods;
        next.mappings.assessment = assessment;
        Ok((next, id))
    }

    /// Remove an assessment method and its mappings
    #[must_use]
    pub fn remove_assessment_method(&self, method_id: &EntityId) -> Self {
        let (methods, assessment) =
            remove_method(&self.assessment_methods, &self.mappings.assessment, method_id);

        let mut next = self.clone();
        next.assessment_methods = methods;
        next.mappings.assessment = assessment;
        next
    }

    /// Swap in a new PLO catalog and reconcile the PLO mappings against it
    #[must_use]
    pub fn replace_plos(&self, plos: Vec<Plo>) -> Self {
        let mut next = self.clone();
        next.mappings.plo = self.mappings.plo.reconciled(&self.clos, &plos);
        next.plos = plos;
        next
    }

    // --- Values ---

    /// Mark a teaching method as used (or not) for a CLO
    ///
    /// # Errors
    /// Returns [`MappingError::MappingNotFound`] if the pair was never reconciled
    pub fn set_used(
        &self,
        clo_id: &EntityId,
        method_id: &EntityId,
        used: bool,
    ) -> Result<Self, MappingError> {
        let mut next = self.clone();
        next.mappings.teaching = self.mappings.teaching.with_value(clo_id, method_id, used)?;
        Ok(next)
    }

    /// Set the share of a CLO assessed by a method
    ///
    /// # Errors
    /// - [`MappingError::Validation`] if `percentage` is outside `[0, 100]`
    /// - [`MappingError::MappingNotFound`] if the pair was never reconciled
    pub fn set_percentage(
        &self,
        clo_id: &EntityId,
        method_id: &EntityId,
        percentage: f64,
    ) -> Result<Self, MappingError> {
        let percentage = Percentage::new(percentage)?;
        let mut next = self.clone();
        next.mappings.assessment =
            self.mappings
                .assessment
                .with_value(clo_id, method_id, percentage)?;
        Ok(next)
    }

    /// Set a CLO's contribution strength to a PLO
    ///
    /// # Errors
    /// Returns [`MappingError::MappingNotFound`] if the pair was never reconciled
    pub fn set_strength(
        &self,
        clo_id: &EntityId,
        plo_id: &EntityId,
        strength: Strength,
    ) -> Result<Self, MappingError> {
        let mut next = self.clone();
        next.mappings.plo = self.mappings.plo.with_value(clo_id, plo_id, strength)?;
        Ok(next)
    }

    /// Set a kind-erased value
    ///
    /// # Errors
    /// - [`MappingError::Validation`] if `value` does not belong to `kind`
    /// - [`MappingError::MappingNotFound`] if the pair was never reconciled
    pub fn set_value(
        &self,
        kind: MappingKindTag,
        clo_id: &EntityId,
        target_id: &EntityId,
        value: MappingValue,
    ) -> Result<Self, MappingError> {
        let mismatch = || ValidationError::invalid("mapping value", format!("{kind}: {value}"));
        match kind {
            MappingKindTag::Teaching => {
                let used = Teaching::from_value(value).ok_or_else(mismatch)?;
                self.set_used(clo_id, target_id, used)
            }
            MappingKindTag::Assessment => {
                let p = Assessment::from_value(value).ok_or_else(mismatch)?;
                self.set_percentage(clo_id, target_id, p.value())
            }
            MappingKindTag::ProgramOutcome => {
                let s = ProgramOutcome::from_value(value).ok_or_else(mismatch)?;
                self.set_strength(clo_id, target_id, s)
            }
        }
    }

    // --- Queries ---

    /// Look up a CLO by id
    #[must_use]
    pub fn clo(&self, clo_id: &EntityId) -> Option<&Clo> {
        self.clos.iter().find(|clo| &clo.id == clo_id)
    }

    /// Look up a CLO by its displayed number
    #[must_use]
    pub fn clo_by_number(&self, number: u32) -> Option<&Clo> {
        self.clos.iter().find(|clo| clo.number == number)
    }

    /// Resolve a mapping target of `kind` by id, or by English name (methods)
    /// or English code (PLOs)
    #[must_use]
    pub fn find_target(&self, kind: MappingKindTag, key: &str) -> Option<&EntityId> {
        let key = key.trim();
        match kind {
            MappingKindTag::Teaching => self
                .teaching_methods
                .iter()
                .find(|m| m.id.to_string() == key || m.name_en == key)
                .map(|m| &m.id),
            MappingKindTag::Assessment => self
                .assessment_methods
                .iter()
                .find(|m| m.id.to_string() == key || m.name_en == key)
                .map(|m| &m.id),
            MappingKindTag::ProgramOutcome => self
                .plos
                .iter()
                .find(|p| p.id.to_string() == key || p.code_en == key)
                .map(|p| &p.id),
        }
    }

    /// Assessment total of one CLO
    #[must_use]
    pub fn assessment_total(&self, clo_id: &EntityId) -> f64 {
        self.mappings.assessment.total_for_clo(clo_id)
    }

    /// Assessment totals of every CLO, in CLO order
    #[must_use]
    pub fn assessment_totals(&self) -> Vec<CloTotal> {
        self.clos
            .iter()
            .map(|clo| CloTotal {
                clo_id: clo.id.clone(),
                number: clo.number,
                total: self.assessment_total(&clo.id),
            })
            .collect()
    }

    /// Every invariant violation, empty when consistent
    #[must_use]
    pub fn violations(&self) -> Vec<ConsistencyViolation> {
        check_consistency(self)
    }

    /// Check every mapping and numbering invariant
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.violations().is_empty()
    }

    /// Reject content where two entities share an id
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidValue`] naming the first shared id
    pub fn ensure_unique_ids(&self) -> Result<(), ValidationError> {
        match duplicate_ids(self).into_iter().next() {
            Some(id) => Err(ValidationError::invalid("id", format!("{id} is used twice"))),
            None => Ok(()),
        }
    }

    // --- Id hand-off ---

    /// Temporary ids still present, sorted
    #[must_use]
    pub fn temporary_ids(&self) -> BTreeSet<EntityId> {
        self.entity_ids().filter(|id| id.is_temporary()).cloned().collect()
    }

    /// Replace ids across entities and mappings
    ///
    /// Ids absent from `assignments` are kept.
    #[must_use]
    pub fn remap_ids(&self, assignments: &HashMap<EntityId, EntityId>) -> Self {
        let remap = |id: &EntityId| assignments.get(id).cloned().unwrap_or_else(|| id.clone());
        let mut next = self.clone();

        next.clos.iter_mut().for_each(|e| remap_entity(e, &remap));
        next.teaching_methods.iter_mut().for_each(|e| remap_entity(e, &remap));
        next.assessment_methods.iter_mut().for_each(|e| remap_entity(e, &remap));
        next.plos.iter_mut().for_each(|e| remap_entity(e, &remap));
        next.mappings = MappingSets {
            teaching: self.mappings.teaching.map_ids(remap),
            assessment: self.mappings.assessment.map_ids(remap),
            plo: self.mappings.plo.map_ids(remap),
        };
        next
    }

    fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.clos
            .iter()
            .map(Entity::id)
            .chain(self.teaching_methods.iter().map(Entity::id))
            .chain(self.assessment_methods.iter().map(Entity::id))
            .chain(self.plos.iter().map(Entity::id))
    }
}

fn remap_entity<E: Entity>(entity: &mut E, remap: &impl Fn(&EntityId) -> EntityId) {
    let id = remap(entity.id());
    *entity.id_mut() = id;
}
