//! Entity identifiers and id allocation
//!
//! Entities created in memory receive an [`EntityId::Temporary`] id from an
//! [`IdGenerator`]. The persistence layer later swaps it for an
//! [`EntityId::Persisted`] id; temporary ids are never written to storage.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Identifier of a CLO, method or PLO within one document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityId {
    /// Allocated in memory, valid until the aggregate is persisted
    Temporary(Ulid),

    /// Assigned by the persistence layer
    Persisted(String),
}

impl EntityId {
    /// Create a persisted id
    #[inline]
    #[must_use]
    pub fn persisted(id: impl Into<String>) -> Self {
        Self::Persisted(id.into())
    }

    /// Check if the id still awaits persistence
    #[inline]
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// Persisted id value, if any
    #[inline]
    #[must_use]
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Temporary(_) => None,
        }
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temporary(ulid) => write!(f, "tmp:{ulid}"),
            Self::Persisted(id) => f.write_str(id),
        }
    }
}

/// Source of fresh temporary ids
///
/// Reducers never invent ids themselves; callers hand in a generator so
/// tests can use [`SequentialIdGenerator`] and applications [`UlidGenerator`].
pub trait IdGenerator {
    /// Allocate the next temporary id
    fn next_id(&mut self) -> EntityId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> EntityId {
        (**self).next_id()
    }
}

/// Time-ordered random ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&mut self) -> EntityId {
        EntityId::Temporary(Ulid::new())
    }
}

/// Deterministic ids: zero timestamp, incrementing random part
#[derive(Debug, Default, Clone)]
pub struct SequentialIdGenerator {
    issued: u128,
}

impl SequentialIdGenerator {
    /// Create generator whose first id has counter 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids issued so far
    #[inline]
    #[must_use]
    pub fn issued(&self) -> u128 {
        self.issued
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> EntityId {
        self.issued += 1;
        EntityId::Temporary(Ulid::from_parts(0, self.issued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_distinct_and_temporary() {
        let mut ids = SequentialIdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();

        assert_ne!(a, b);
        assert!(a.is_temporary());
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn sequential_generators_agree() {
        let mut left = SequentialIdGenerator::new();
        let mut right = SequentialIdGenerator::new();
        assert_eq!(left.next_id(), right.next_id());
    }

    #[test]
    fn ulid_generator_is_temporary() {
        let mut ids = UlidGenerator;
        assert!(ids.next_id().is_temporary());
    }

    #[test]
    fn persisted_accessors() {
        let id = EntityId::persisted("plo-1");
        assert!(!id.is_temporary());
        assert_eq!(id.as_persisted(), Some("plo-1"));
        assert_eq!(id.to_string(), "plo-1");
    }

    #[test]
    fn generator_through_mut_ref() {
        fn take(mut ids: impl IdGenerator) -> EntityId {
            ids.next_id()
        }

        let mut ids = SequentialIdGenerator::new();
        let _ = take(&mut ids);
        assert_eq!(ids.issued(), 1);
    }

    #[test]
    fn serde_snake_case_tags() {
        let json = serde_json::to_string(&EntityId::persisted("clo-7")).unwrap();
        assert_eq!(json, r#"{"persisted":"clo-7"}"#);

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityId::persisted("clo-7"));
    }
}
