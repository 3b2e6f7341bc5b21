//! CLO list maintenance with dense numbering
//!
//! Every function here returns a list whose numbers are exactly `1..=len`
//! in list order. Survivors keep their relative order; only `number`
//! changes.

use crate::error::MappingError;
use crate::sets::MappingSets;
use clo_model::{Clo, EntityId, IdGenerator, ValidationError};

/// Assign numbers `1..=len` following list order
#[must_use]
pub fn renumber(clos: &[Clo]) -> Vec<Clo> {
    clos.iter()
        .cloned()
        .zip(1u32..)
        .map(|(mut clo, number)| {
            clo.number = number;
            clo
        })
        .collect()
}

/// Stable-sort by current number, then renumber densely
///
/// Repairs loaded data with gaps or duplicate numbers. Ties keep list order.
#[must_use]
pub fn normalize_numbers(clos: &[Clo]) -> Vec<Clo> {
    let mut sorted = clos.to_vec();
    sorted.sort_by_key(|clo| clo.number);
    renumber(&sorted)
}

/// Check that numbers are exactly `1..=len` in list order
#[must_use]
pub fn is_dense(clos: &[Clo]) -> bool {
    clos.iter().zip(1u32..).all(|(clo, n)| clo.number == n)
}

/// Insert a new CLO with a fresh temporary id
///
/// Without `number` the CLO is appended as `len + 1`. With `number` it is
/// inserted at that position and later CLOs shift up by one.
///
/// # Errors
/// Returns [`ValidationError::OutOfBounds`] if `number` is outside
/// `1..=len + 1`
pub fn add_clo(
    clos: &[Clo],
    number: Option<u32>,
    ids: &mut impl IdGenerator,
) -> Result<(Vec<Clo>, EntityId), MappingError> {
    let position = match number {
        None => clos.len(),
        Some(n) => position_for(n, clos.len() + 1)?,
    };

    let id = ids.next_id();
    let mut updated = clos.to_vec();
    // number is fixed by the renumber pass below
    updated.insert(position, Clo::new(id.clone(), 0));

    tracing::debug!(clo = %id, position = position + 1, "added CLO");
    Ok((renumber(&updated), id))
}

/// Remove a CLO, renumber survivors and prune its mappings from every kind
///
/// Removing an id that is not present returns the inputs unchanged.
#[must_use]
pub fn remove_clo(
    clos: &[Clo],
    mappings: &MappingSets,
    clo_id: &EntityId,
) -> (Vec<Clo>, MappingSets) {
    if !clos.iter().any(|clo| &clo.id == clo_id) {
        tracing::warn!(clo = %clo_id, "remove of unknown CLO ignored");
        return (clos.to_vec(), mappings.clone());
    }

    let survivors: Vec<Clo> = clos.iter().filter(|clo| &clo.id != clo_id).cloned().collect();
    tracing::debug!(clo = %clo_id, remaining = survivors.len(), "removed CLO");
    (renumber(&survivors), mappings.without_clo(clo_id))
}

/// Move a CLO so that it carries `new_number`
///
/// CLOs between the old and new position shift by one; numbering stays
/// dense.
///
/// # Errors
/// - [`MappingError::CloNotFound`] if `clo_id` is not in the list
/// - [`ValidationError::OutOfBounds`] if `new_number` is outside `1..=len`
pub fn move_clo(
    clos: &[Clo],
    clo_id: &EntityId,
    new_number: u32,
) -> Result<Vec<Clo>, MappingError> {
    let from = clos
        .iter()
        .position(|clo| &clo.id == clo_id)
        .ok_or_else(|| MappingError::CloNotFound(clo_id.clone()))?;
    let to = position_for(new_number, clos.len())?;

    let mut updated = clos.to_vec();
    let clo = updated.remove(from);
    updated.insert(to, clo);
    Ok(renumber(&updated))
}

/// Zero-based position for a 1-based `number` in `1..=max`
fn position_for(number: u32, max: usize) -> Result<usize, ValidationError> {
    let index = usize::try_from(number).unwrap_or(usize::MAX);
    if (1..=max).contains(&index) {
        Ok(index - 1)
    } else {
        Err(ValidationError::OutOfBounds {
            field: "number",
            value: i64::from(number),
            min: 1,
            max: i64::try_from(max).unwrap_or(i64::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use clo_model::SequentialIdGenerator;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> EntityId {
        EntityId::persisted(s)
    }

    fn three() -> Vec<Clo> {
        vec![
            Clo::new(id("a"), 1),
            Clo::new(id("b"), 2),
            Clo::new(id("c"), 3),
        ]
    }

    fn order(clos: &[Clo]) -> Vec<(String, u32)> {
        clos.iter().map(|c| (c.id.to_string(), c.number)).collect()
    }

    #[test]
    fn add_appends_next_number() {
        let mut ids = SequentialIdGenerator::new();
        let (clos, new_id) = add_clo(&three(), None, &mut ids).unwrap();

        assert_eq!(clos.len(), 4);
        assert_eq!(clos[3].id, new_id);
        assert_eq!(clos[3].number, 4);
        assert!(new_id.is_temporary());
    }

    #[test]
    fn add_to_empty_list() {
        let mut ids = SequentialIdGenerator::new();
        let (clos, _) = add_clo(&[], None, &mut ids).unwrap();
        assert_eq!(clos[0].number, 1);
    }

    #[test]
    fn add_at_position_shifts_later_clos() {
        let mut ids = SequentialIdGenerator::new();
        let (clos, new_id) = add_clo(&three(), Some(2), &mut ids).unwrap();

        assert_eq!(clos[1].id, new_id);
        assert_eq!(
            order(&[clos[0].clone(), clos[2].clone(), clos[3].clone()]),
            vec![("a".into(), 1), ("b".into(), 3), ("c".into(), 4)]
        );
        assert!(is_dense(&clos));
    }

    #[test]
    fn add_rejects_bad_number() {
        let mut ids = SequentialIdGenerator::new();
        assert!(add_clo(&three(), Some(0), &mut ids).unwrap_err().is_validation());
        assert!(add_clo(&three(), Some(5), &mut ids).unwrap_err().is_validation());
        assert!(add_clo(&three(), Some(4), &mut ids).is_ok());
    }

    #[test]
    fn remove_middle_renumbers() {
        let mappings = MappingSets {
            teaching: vec![
                Mapping::with_default(id("a"), id("t")),
                Mapping::with_default(id("b"), id("t")),
            ]
            .into(),
            ..MappingSets::default()
        };

        let (clos, mappings) = remove_clo(&three(), &mappings, &id("b"));
        assert_eq!(order(&clos), vec![("a".into(), 1), ("c".into(), 2)]);
        assert!(!mappings.references_clo(&id("b")));
        assert_eq!(mappings.teaching.len(), 1);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mappings = MappingSets::default();
        let (clos, _) = remove_clo(&three(), &mappings, &id("zzz"));
        assert_eq!(clos, three());
    }

    #[test]
    fn move_forward_and_back() {
        let moved = move_clo(&three(), &id("a"), 3).unwrap();
        assert_eq!(
            order(&moved),
            vec![("b".into(), 1), ("c".into(), 2), ("a".into(), 3)]
        );

        let back = move_clo(&moved, &id("a"), 1).unwrap();
        assert_eq!(back, three());
    }

    #[test]
    fn move_errors() {
        assert!(move_clo(&three(), &id("x"), 1).unwrap_err().is_not_found());
        assert!(move_clo(&three(), &id("a"), 4).unwrap_err().is_validation());
    }

    #[test]
    fn normalize_repairs_gaps_and_duplicates() {
        let messy = vec![
            Clo::new(id("c"), 7),
            Clo::new(id("a"), 2),
            Clo::new(id("b"), 2),
        ];
        let fixed = normalize_numbers(&messy);
        assert_eq!(
            order(&fixed),
            vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3)]
        );
        assert!(!is_dense(&messy));
        assert!(is_dense(&fixed));
    }
}
