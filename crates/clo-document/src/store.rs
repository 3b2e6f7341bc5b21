//! Persistence collaborator
//!
//! [`DocumentStore`] is the seam to whatever database the host application
//! uses. [`MemoryStore`] keeps everything in concurrent maps and mints
//! UUID ids; it backs tests and the CLI.

use crate::course::{Course, NewCourse};
use crate::document::DocumentVersion;
use crate::error::DocumentError;
use crate::identity::Identity;
use async_trait::async_trait;
use chrono::Utc;
use clo_mapping::CloSnapshot;
use clo_model::{EntityId, Plo};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// Storage for courses, documents and the PLO catalog
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a validated course
    async fn insert_course(
        &self,
        course: NewCourse,
        created_by: &Identity,
    ) -> Result<Course, DocumentError>;

    /// Course by id
    async fn course(&self, id: &str) -> Result<Option<Course>, DocumentError>;

    /// All courses, in no particular order
    async fn courses(&self) -> Result<Vec<Course>, DocumentError>;

    /// Store a new draft for `course`
    async fn insert_document(
        &self,
        course: Course,
        content: CloSnapshot,
        created_by: &Identity,
    ) -> Result<DocumentVersion, DocumentError>;

    /// Document by id
    async fn document(&self, id: &str) -> Result<Option<DocumentVersion>, DocumentError>;

    /// All documents, in no particular order
    async fn documents(&self) -> Result<Vec<DocumentVersion>, DocumentError>;

    /// Replace a stored document if its revision still equals `expected_revision`
    ///
    /// On success the stored copy has `revision + 1` and a fresh `updated_at`.
    ///
    /// # Errors
    /// - [`DocumentError::NotFound`] if the document does not exist
    /// - [`DocumentError::RevisionConflict`] if the revision moved on
    async fn save_document(
        &self,
        document: DocumentVersion,
        expected_revision: u64,
    ) -> Result<DocumentVersion, DocumentError>;

    /// Delete a document, returning whether it existed
    async fn delete_document(&self, id: &str) -> Result<bool, DocumentError>;

    /// PLO catalog, in no particular order
    async fn plos(&self) -> Result<Vec<Plo>, DocumentError>;

    /// Allocate a persisted id for every temporary id
    async fn assign_ids(
        &self,
        temporary: &BTreeSet<EntityId>,
    ) -> Result<HashMap<EntityId, EntityId>, DocumentError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    courses: DashMap<String, Course>,
    documents: DashMap<String, DocumentVersion>,
    plos: RwLock<Vec<Plo>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store with a PLO catalog
    #[must_use]
    pub fn with_plos(plos: Vec<Plo>) -> Self {
        Self {
            plos: RwLock::new(plos),
            ..Self::default()
        }
    }

    fn mint_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_course(
        &self,
        course: NewCourse,
        created_by: &Identity,
    ) -> Result<Course, DocumentError> {
        let course = course.into_course(Self::mint_id(), created_by.user_id.clone(), Utc::now());
        self.courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn course(&self, id: &str) -> Result<Option<Course>, DocumentError> {
        Ok(self.courses.get(id).map(|c| c.value().clone()))
    }

    async fn courses(&self) -> Result<Vec<Course>, DocumentError> {
        Ok(self.courses.iter().map(|c| c.value().clone()).collect())
    }

    async fn insert_document(
        &self,
        course: Course,
        content: CloSnapshot,
        created_by: &Identity,
    ) -> Result<DocumentVersion, DocumentError> {
        let document = DocumentVersion::draft(
            Self::mint_id(),
            course,
            created_by.user_id.clone(),
            content,
            Utc::now(),
        );
        self.documents.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn document(&self, id: &str) -> Result<Option<DocumentVersion>, DocumentError> {
        Ok(self.documents.get(id).map(|d| d.value().clone()))
    }

    async fn documents(&self) -> Result<Vec<DocumentVersion>, DocumentError> {
        Ok(self.documents.iter().map(|d| d.value().clone()).collect())
    }

    async fn save_document(
        &self,
        mut document: DocumentVersion,
        expected_revision: u64,
    ) -> Result<DocumentVersion, DocumentError> {
        let mut stored = self
            .documents
            .get_mut(&document.id)
            .ok_or_else(|| DocumentError::not_found("document", document.id.clone()))?;

        if stored.revision != expected_revision {
            return Err(DocumentError::RevisionConflict {
                id: document.id,
                expected: expected_revision,
                found: stored.revision,
            });
        }

        document.revision = expected_revision + 1;
        document.created_at = stored.created_at;
        document.updated_at = Utc::now();
        *stored = document.clone();
        Ok(document)
    }

    async fn delete_document(&self, id: &str) -> Result<bool, DocumentError> {
        Ok(self.documents.remove(id).is_some())
    }

    async fn plos(&self) -> Result<Vec<Plo>, DocumentError> {
        Ok(self.plos.read().await.clone())
    }

    async fn assign_ids(
        &self,
        temporary: &BTreeSet<EntityId>,
    ) -> Result<HashMap<EntityId, EntityId>, DocumentError> {
        Ok(temporary
            .iter()
            .filter(|id| id.is_temporary())
            .map(|id| (id.clone(), EntityId::persisted(Self::mint_id())))
            .collect())
    }
}
