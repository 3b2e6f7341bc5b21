//! Read-only invariant checks over a document snapshot
//!
//! Reports every violation instead of stopping at the first, so callers can
//! show the full list before exporting or publishing.

use crate::kind::{MappingKind, MappingKindTag};
use crate::mapping::MappingSet;
use crate::snapshot::CloSnapshot;
use clo_model::{Clo, Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// One broken invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum ConsistencyViolation {
    /// CLO numbers are not `1..=count` in list order
    Numbering {
        clo_id: EntityId,
        expected: u32,
        found: u32,
    },

    /// Two entities of the document share an id
    DuplicateId { id: EntityId },

    /// A (CLO, target) pair has no record
    MissingMapping {
        kind: MappingKindTag,
        clo_id: EntityId,
        target_id: EntityId,
    },

    /// A record references an absent CLO or target
    OrphanMapping {
        kind: MappingKindTag,
        clo_id: EntityId,
        target_id: EntityId,
    },

    /// A pair has more than one record
    DuplicateMapping {
        kind: MappingKindTag,
        clo_id: EntityId,
        target_id: EntityId,
    },
}

impl Display for ConsistencyViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbering {
                clo_id,
                expected,
                found,
            } => write!(f, "CLO {clo_id} numbered {found}, expected {expected}"),
            Self::DuplicateId { id } => write!(f, "duplicate id {id}"),
            Self::MissingMapping {
                kind,
                clo_id,
                target_id,
            } => write!(f, "missing {kind} mapping ({clo_id}, {target_id})"),
            Self::OrphanMapping {
                kind,
                clo_id,
                target_id,
            } => write!(f, "orphan {kind} mapping ({clo_id}, {target_id})"),
            Self::DuplicateMapping {
                kind,
                clo_id,
                target_id,
            } => write!(f, "duplicate {kind} mapping ({clo_id}, {target_id})"),
        }
    }
}

/// Collect every invariant violation in `snapshot`
#[must_use]
pub fn check_consistency(snapshot: &CloSnapshot) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    check_numbering(&snapshot.clos, &mut violations);
    check_unique_ids(snapshot, &mut violations);
    check_kind(
        &snapshot.clos,
        &snapshot.teaching_methods,
        &snapshot.mappings.teaching,
        &mut violations,
    );
    check_kind(
        &snapshot.clos,
        &snapshot.assessment_methods,
        &snapshot.mappings.assessment,
        &mut violations,
    );
    check_kind(
        &snapshot.clos,
        &snapshot.plos,
        &snapshot.mappings.plo,
        &mut violations,
    );

    violations
}

fn check_numbering(clos: &[Clo], out: &mut Vec<ConsistencyViolation>) {
    for (clo, expected) in clos.iter().zip(1u32..) {
        if clo.number != expected {
            out.push(ConsistencyViolation::Numbering {
                clo_id: clo.id.clone(),
                expected,
                found: clo.number,
            });
        }
    }
}

fn check_unique_ids(snapshot: &CloSnapshot, out: &mut Vec<ConsistencyViolation>) {
    out.extend(
        duplicate_ids(snapshot)
            .into_iter()
            .map(|id| ConsistencyViolation::DuplicateId { id }),
    );
}

/// Ids shared by more than one CLO, method or PLO, in document order
///
/// Reconciliation cannot repair these, so loaded content carrying any of
/// them has to be rejected.
#[must_use]
pub fn duplicate_ids(snapshot: &CloSnapshot) -> Vec<EntityId> {
    let mut seen = HashSet::new();
    snapshot
        .clos
        .iter()
        .map(Entity::id)
        .chain(snapshot.teaching_methods.iter().map(Entity::id))
        .chain(snapshot.assessment_methods.iter().map(Entity::id))
        .chain(snapshot.plos.iter().map(Entity::id))
        .filter(|id| !seen.insert(*id))
        .cloned()
        .collect()
}

fn check_kind<K: MappingKind, T: Entity>(
    clos: &[Clo],
    targets: &[T],
    mappings: &MappingSet<K>,
    out: &mut Vec<ConsistencyViolation>,
) {
    let clo_ids: HashSet<&EntityId> = clos.iter().map(Entity::id).collect();
    let target_ids: HashSet<&EntityId> = targets.iter().map(Entity::id).collect();
    let mut present = HashSet::new();

    for m in mappings {
        let key = (&m.clo_id, &m.target_id);
        if !clo_ids.contains(&m.clo_id) || !target_ids.contains(&m.target_id) {
            out.push(ConsistencyViolation::OrphanMapping {
                kind: K::TAG,
                clo_id: m.clo_id.clone(),
                target_id: m.target_id.clone(),
            });
        } else if !present.insert(key) {
            out.push(ConsistencyViolation::DuplicateMapping {
                kind: K::TAG,
                clo_id: m.clo_id.clone(),
                target_id: m.target_id.clone(),
            });
        }
    }

    let mut visited = HashSet::new();
    for clo in clos {
        for target in targets {
            let key = (clo.id(), target.id());
            if visited.insert(key) && !present.contains(&key) {
                out.push(ConsistencyViolation::MissingMapping {
                    kind: K::TAG,
                    clo_id: clo.id.clone(),
                    target_id: target.id().clone(),
                });
            }
        }
    }
}
