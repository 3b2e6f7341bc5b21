//! Adding and removing mapping targets (teaching/assessment methods, PLOs)

use crate::kind::MappingKind;
use crate::mapping::{Mapping, MappingSet};
use clo_model::{Clo, Entity, EntityId, IdGenerator};

/// Append a target with a fresh temporary id
///
/// `make` builds the target from its allocated id. One `default` mapping is
/// added per CLO; existing records are kept as they are.
#[must_use]
pub fn add_method<K, M>(
    methods: &[M],
    clos: &[Clo],
    mappings: &MappingSet<K>,
    default: K::Value,
    ids: &mut impl IdGenerator,
    make: impl FnOnce(EntityId) -> M,
) -> (Vec<M>, EntityId, MappingSet<K>)
where
    K: MappingKind,
    M: Entity + Clone,
{
    let id = ids.next_id();
    let mut updated = methods.to_vec();
    updated.push(make(id.clone()));

    let mappings: MappingSet<K> = mappings
        .iter()
        .cloned()
        .chain(clos.iter().map(|clo| Mapping::new(clo.id.clone(), id.clone(), default)))
        .collect();

    tracing::debug!(kind = %K::TAG, method = %id, clos = clos.len(), "added method");
    (updated, id, mappings)
}

/// Remove a target and prune every mapping referencing it
///
/// Removing an id that is not present returns the inputs unchanged.
#[must_use]
pub fn remove_method<K, M>(
    methods: &[M],
    mappings: &MappingSet<K>,
    method_id: &EntityId,
) -> (Vec<M>, MappingSet<K>)
where
    K: MappingKind,
    M: Entity + Clone,
{
    if !methods.iter().any(|m| m.id() == method_id) {
        tracing::warn!(kind = %K::TAG, method = %method_id, "remove of unknown method ignored");
        return (methods.to_vec(), mappings.clone());
    }

    let updated = methods
        .iter()
        .filter(|m| m.id() != method_id)
        .cloned()
        .collect();
    (updated, mappings.without_target(method_id))
}
