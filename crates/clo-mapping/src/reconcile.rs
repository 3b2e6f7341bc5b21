//! Reconciliation of a mapping set against the current CLO and target lists
//!
//! # Contract
//! - Output holds exactly one record per (CLO, target) pair, in CLO-major
//!   order following the input lists
//! - Existing values are kept; missing pairs get `default`
//! - Records whose CLO or target is gone are dropped
//! - Idempotent: reconciling the output again yields the same set

use crate::kind::MappingKind;
use crate::mapping::{Mapping, MappingSet};
use clo_model::{Clo, Entity, EntityId};
use std::collections::{HashMap, HashSet};

/// Regenerate `existing` to match `clos` × `targets`
///
/// When `existing` holds several records for one pair the first one wins.
/// Duplicate ids in `clos` or `targets` are visited once.
///
/// # Performance
/// O(|clos| × |targets| + |existing|)
#[must_use]
pub fn reconcile<K, T>(
    clos: &[Clo],
    targets: &[T],
    existing: &MappingSet<K>,
    default: K::Value,
) -> MappingSet<K>
where
    K: MappingKind,
    T: Entity,
{
    if clos.is_empty() || targets.is_empty() {
        if !existing.is_empty() {
            tracing::debug!(
                kind = %K::TAG,
                dropped = existing.len(),
                "reconciled against empty side"
            );
        }
        return MappingSet::new();
    }

    let mut known: HashMap<(&EntityId, &EntityId), K::Value> =
        HashMap::with_capacity(existing.len());
    for m in existing {
        known.entry((&m.clo_id, &m.target_id)).or_insert(m.value);
    }

    let clo_ids = unique_ids(clos.iter().map(Entity::id));
    let target_ids = unique_ids(targets.iter().map(Entity::id));

    let mut kept = 0usize;
    let mut entries = Vec::with_capacity(clo_ids.len() * target_ids.len());
    for clo_id in &clo_ids {
        for target_id in &target_ids {
            let value = match known.get(&(*clo_id, *target_id)) {
                Some(value) => {
                    kept += 1;
                    *value
                }
                None => default,
            };
            entries.push(Mapping::new((*clo_id).clone(), (*target_id).clone(), value));
        }
    }

    tracing::debug!(
        kind = %K::TAG,
        clos = clo_ids.len(),
        targets = target_ids.len(),
        kept,
        synthesized = entries.len() - kept,
        dropped = existing.len().saturating_sub(kept),
        "reconciled mappings"
    );

    entries.into()
}

/// First occurrence of each id, in input order
fn unique_ids<'a>(ids: impl Iterator<Item = &'a EntityId>) -> Vec<&'a EntityId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

impl<K: MappingKind> MappingSet<K> {
    /// Reconcile with the kind's default value
    #[must_use]
    pub fn reconciled<T: Entity>(&self, clos: &[Clo], targets: &[T]) -> Self {
        reconcile(clos, targets, self, K::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Assessment, ProgramOutcome, Teaching};
    use clo_model::{Percentage, Plo, Strength, TeachingMethod};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> EntityId {
        EntityId::persisted(s)
    }

    fn clos(names: &[&str]) -> Vec<Clo> {
        names
            .iter()
            .zip(1..)
            .map(|(n, i)| Clo::new(id(n), i))
            .collect()
    }

    fn methods(names: &[&str]) -> Vec<TeachingMethod> {
        names
            .iter()
            .map(|n| TeachingMethod::new(id(n), *n, *n))
            .collect()
    }

    #[test]
    fn two_clos_one_method() {
        let result = reconcile(
            &clos(&["c1", "c2"]),
            &methods(&["lecture"]),
            &MappingSet::<Teaching>::new(),
            false,
        );

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|m| !m.value));
    }

    #[test]
    fn keeps_existing_values() {
        let cs = clos(&["c1", "c2"]);
        let ms = methods(&["lecture", "lab"]);
        let existing = MappingSet::<Teaching>::from(vec![Mapping::new(id("c2"), id("lab"), true)]);

        let result = existing.reconciled(&cs, &ms);
        assert_eq!(result.len(), 4);
        assert_eq!(result.get(&id("c2"), &id("lab")), Some(true));
        assert_eq!(result.get(&id("c1"), &id("lab")), Some(false));
    }

    #[test]
    fn drops_orphans() {
        let existing = MappingSet::<ProgramOutcome>::from(vec![
            Mapping::new(id("gone"), id("plo-1"), Strength::High),
            Mapping::new(id("c1"), id("plo-gone"), Strength::Low),
            Mapping::new(id("c1"), id("plo-1"), Strength::Medium),
        ]);
        let plos = vec![Plo::new(id("plo-1"), "PLO1", "PLO1")];

        let result = existing.reconciled(&clos(&["c1"]), &plos);
        let records: Vec<_> = result.iter().cloned().collect();
        assert_eq!(records, vec![Mapping::new(id("c1"), id("plo-1"), Strength::Medium)]);
    }

    #[test]
    fn first_duplicate_wins() {
        let existing = MappingSet::<Teaching>::from(vec![
            Mapping::new(id("c1"), id("lab"), true),
            Mapping::new(id("c1"), id("lab"), false),
        ]);

        let result = existing.reconciled(&clos(&["c1"]), &methods(&["lab"]));
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&id("c1"), &id("lab")), Some(true));
    }

    #[test]
    fn empty_sides_give_empty_set() {
        let existing = MappingSet::<Teaching>::from(vec![Mapping::new(id("c1"), id("lab"), true)]);

        assert!(existing.reconciled(&[], &methods(&["lab"])).is_empty());
        assert!(existing
            .reconciled::<TeachingMethod>(&clos(&["c1"]), &[])
            .is_empty());
    }

    #[test]
    fn custom_default_is_used() {
        let half = Percentage::new(50.0).unwrap();
        let result = reconcile(
            &clos(&["c1"]),
            &methods(&["exam"]),
            &MappingSet::<Assessment>::new(),
            half,
        );
        assert_eq!(result.get(&id("c1"), &id("exam")), Some(half));
    }

    #[test]
    fn idempotent() {
        let cs = clos(&["c1", "c2", "c3"]);
        let ms = methods(&["a", "b"]);
        let existing = MappingSet::<Teaching>::from(vec![
            Mapping::new(id("c3"), id("b"), true),
            Mapping::new(id("zz"), id("b"), true),
        ]);

        let once = existing.reconciled(&cs, &ms);
        let twice = once.reconciled(&cs, &ms);
        assert_eq!(once, twice);
    }

    #[test]
    fn duplicate_clo_ids_visited_once() {
        let mut cs = clos(&["c1"]);
        cs.push(Clo::new(id("c1"), 2));

        let result = MappingSet::<Teaching>::new().reconciled(&cs, &methods(&["lab"]));
        assert_eq!(result.len(), 1);
    }
}
