//! Document lifecycle service
//!
//! Owns the store and renderer, applies configuration limits and keeps every
//! stored document reconciled.
//!
//! # Workflow
//! 1. `create_course` / `create_document` start an empty draft mapped
//!    against the PLO catalog
//! 2. Callers edit a [`CloSnapshot`] with its reducers (or the capacity
//!    checked helpers here) and hand it to `update_document`
//! 3. `publish` and `export` accept only consistent aggregates

use crate::config::DocumentConfig;
use crate::course::{Course, NewCourse};
use crate::document::{DocumentStatus, DocumentVersion};
use crate::error::DocumentError;
use crate::export::{export_document, ExportArtifact, ExportFormat, OutlineRenderer, Renderer};
use crate::identity::Identity;
use crate::store::DocumentStore;
use clo_mapping::CloSnapshot;
use clo_model::{EntityId, IdGenerator, Plo, ValidationError};
use std::sync::Arc;

/// Document service
#[derive(Debug)]
pub struct DocumentService<S, R = OutlineRenderer> {
    store: Arc<S>,
    renderer: R,
    config: DocumentConfig,
}

impl<S: DocumentStore> DocumentService<S> {
    /// Create service with the outline renderer
    #[must_use]
    pub fn new(store: Arc<S>, config: DocumentConfig) -> Self {
        Self::with_renderer(store, OutlineRenderer, config)
    }
}

impl<S: DocumentStore, R: Renderer> DocumentService<S, R> {
    /// Create service with a custom renderer
    #[must_use]
    pub fn with_renderer(store: Arc<S>, renderer: R, config: DocumentConfig) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // --- Courses ---

    /// Validate and store a course
    ///
    /// # Errors
    /// Returns [`DocumentError::Validation`] for blank required fields or
    /// credits outside `1..=12`
    pub async fn create_course(
        &self,
        identity: &Identity,
        course: NewCourse,
    ) -> Result<Course, DocumentError> {
        course.validate()?;
        let course = self.store.insert_course(course, identity).await?;
        tracing::info!(course = %course.id, code = %course.code, user = %identity.user_id, "created course");
        Ok(course)
    }

    /// Courses, most recently updated first
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn list_courses(&self) -> Result<Vec<Course>, DocumentError> {
        let mut courses = self.store.courses().await?;
        courses.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(courses)
    }

    /// PLO catalog ordered by English code
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn list_plos(&self) -> Result<Vec<Plo>, DocumentError> {
        let mut plos = self.store.plos().await?;
        plos.sort_by(|a, b| a.code_en.cmp(&b.code_en));
        Ok(plos)
    }

    // --- Documents ---

    /// Start a draft for an existing course
    ///
    /// # Errors
    /// Returns [`DocumentError::NotFound`] if the course does not exist
    pub async fn create_document(
        &self,
        identity: &Identity,
        course_id: &str,
    ) -> Result<DocumentVersion, DocumentError> {
        let course = self
            .store
            .course(course_id)
            .await?
            .ok_or_else(|| DocumentError::not_found("course", course_id))?;

        let content = CloSnapshot::with_plos(self.list_plos().await?);
        let document = self.store.insert_document(course, content, identity).await?;
        tracing::info!(document = %document.id, course = %course_id, user = %identity.user_id, "created document");
        Ok(document)
    }

    /// Document by id
    ///
    /// # Errors
    /// Returns [`DocumentError::NotFound`] if the document does not exist
    pub async fn get_document(&self, id: &str) -> Result<DocumentVersion, DocumentError> {
        self.store
            .document(id)
            .await?
            .ok_or_else(|| DocumentError::not_found("document", id))
    }

    /// Documents, most recently updated first
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn list_documents(&self) -> Result<Vec<DocumentVersion>, DocumentError> {
        let mut documents = self.store.documents().await?;
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    /// Delete a document and everything it owns
    ///
    /// # Errors
    /// Returns [`DocumentError::NotFound`] if the document does not exist
    pub async fn delete_document(&self, id: &str) -> Result<(), DocumentError> {
        if !self.store.delete_document(id).await? {
            return Err(DocumentError::not_found("document", id));
        }
        tracing::info!(document = %id, "deleted document");
        Ok(())
    }

    /// Store edited content
    ///
    /// The content is renumbered and reconciled, temporary ids are replaced
    /// by store-assigned ids, and the revision is bumped.
    ///
    /// # Errors
    /// - [`DocumentError::NotFound`] if the document does not exist
    /// - [`DocumentError::Validation`] if the content exceeds a configured
    ///   limit or two of its entities share an id
    /// - [`DocumentError::RevisionConflict`] if `expected_revision` is stale
    pub async fn update_document(
        &self,
        identity: &Identity,
        id: &str,
        content: CloSnapshot,
        expected_revision: u64,
    ) -> Result<DocumentVersion, DocumentError> {
        let mut document = self.get_document(id).await?;
        self.check_capacity(&content)?;
        content.ensure_unique_ids()?;

        let content = content.normalized();
        let assignments = self.store.assign_ids(&content.temporary_ids()).await?;
        let content = content.remap_ids(&assignments);
        self.warn_on_totals(id, &content);

        document.content = content;
        let saved = self.store.save_document(document, expected_revision).await?;
        tracing::info!(
            document = %id,
            revision = saved.revision,
            persisted_ids = assignments.len(),
            user = %identity.user_id,
            "updated document"
        );
        Ok(saved)
    }

    /// Mark a document as published
    ///
    /// # Errors
    /// - [`DocumentError::NotFound`] if the document does not exist
    /// - [`DocumentError::Inconsistent`] if its content breaks an invariant
    pub async fn publish(&self, id: &str) -> Result<DocumentVersion, DocumentError> {
        let mut document = self.get_document(id).await?;
        let violations = document.content.violations();
        if !violations.is_empty() {
            tracing::warn!(document = %id, violations = violations.len(), "refusing to publish");
            return Err(DocumentError::Inconsistent {
                id: id.to_owned(),
                violations,
            });
        }

        let revision = document.revision;
        document.status = DocumentStatus::Published;
        let saved = self.store.save_document(document, revision).await?;
        tracing::info!(document = %id, "published document");
        Ok(saved)
    }

    /// Render a document
    ///
    /// `format` falls back to the configured default.
    ///
    /// # Errors
    /// - [`DocumentError::NotFound`] if the document does not exist
    /// - [`DocumentError::Inconsistent`] if its content breaks an invariant
    /// - [`DocumentError::Render`] if the renderer fails
    pub async fn export(
        &self,
        id: &str,
        format: Option<ExportFormat>,
    ) -> Result<ExportArtifact, DocumentError> {
        let document = self.get_document(id).await?;
        export_document(
            &document,
            format.unwrap_or(self.config.default_export_format),
            &self.renderer,
        )
    }

    // --- Capacity-checked editing ---

    /// Add a CLO with the configured default bloom level
    ///
    /// # Errors
    /// - [`DocumentError::Validation`] if the document already has `max_clos` CLOs
    /// - [`DocumentError::Mapping`] if `number` is out of range
    pub fn add_clo(
        &self,
        content: &CloSnapshot,
        number: Option<u32>,
        ids: &mut impl IdGenerator,
    ) -> Result<(CloSnapshot, EntityId), DocumentError> {
        ensure_room("CLOs", content.clos.len(), self.config.max_clos)?;
        Ok(content.add_clo(number, self.config.default_bloom_level, ids)?)
    }

    /// Add a teaching method
    ///
    /// # Errors
    /// Returns [`DocumentError::Validation`] if `max_methods` is reached
    pub fn add_teaching_method(
        &self,
        content: &CloSnapshot,
        name_en: &str,
        name_th: &str,
        ids: &mut impl IdGenerator,
    ) -> Result<(CloSnapshot, EntityId), DocumentError> {
        ensure_room("teaching methods", content.teaching_methods.len(), self.config.max_methods)?;
        Ok(content.add_teaching_method(name_en, name_th, ids))
    }

    /// Add an assessment method
    ///
    /// # Errors
    /// - [`DocumentError::Validation`] if `max_methods` is reached
    /// - [`DocumentError::Mapping`] if `weight` is outside `[0, 100]`
    pub fn add_assessment_method(
        &self,
        content: &CloSnapshot,
        name_en: &str,
        name_th: &str,
        weight: f64,
        ids: &mut impl IdGenerator,
    ) -> Result<(CloSnapshot, EntityId), DocumentError> {
        ensure_room(
            "assessment methods",
            content.assessment_methods.len(),
            self.config.max_methods,
        )?;
        Ok(content.add_assessment_method(name_en, name_th, weight, ids)?)
    }

    fn check_capacity(&self, content: &CloSnapshot) -> Result<(), ValidationError> {
        check_limit("CLOs", content.clos.len(), self.config.max_clos)?;
        check_limit(
            "teaching methods",
            content.teaching_methods.len(),
            self.config.max_methods,
        )?;
        check_limit(
            "assessment methods",
            content.assessment_methods.len(),
            self.config.max_methods,
        )
    }

    fn warn_on_totals(&self, id: &str, content: &CloSnapshot) {
        if !self.config.warn_on_assessment_total {
            return;
        }
        for total in content.assessment_totals().iter().filter(|t| t.is_partial()) {
            tracing::warn!(
                document = %id,
                clo = total.number,
                total = total.total,
                "assessment total differs from 100"
            );
        }
    }
}

fn ensure_room(what: &'static str, len: usize, limit: usize) -> Result<(), ValidationError> {
    if len >= limit {
        return Err(ValidationError::CapacityExceeded { what, limit });
    }
    Ok(())
}

fn check_limit(what: &'static str, len: usize, limit: usize) -> Result<(), ValidationError> {
    if len > limit {
        return Err(ValidationError::CapacityExceeded { what, limit });
    }
    Ok(())
}
