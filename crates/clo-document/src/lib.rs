//! CLO Document
//!
//! Course documents (มคอ.3) built on the `clo-mapping` consistency model.
//!
//! # Core Concepts
//!
//! - [`Course`]: Course a document describes
//! - [`DocumentVersion`]: Versioned CLO content with lifecycle status
//! - [`DocumentStore`]: Persistence seam, [`MemoryStore`] in-process
//! - [`DocumentService`]: Lifecycle operations with configured limits
//! - [`Renderer`]: Export seam, [`OutlineRenderer`] built in
//! - [`DocumentConfig`]: TOML configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use clo_document::{DocumentConfig, DocumentService, Identity, MemoryStore, NewCourse};
//! use std::sync::Arc;
//!
//! let service = DocumentService::new(Arc::new(MemoryStore::new()), DocumentConfig::default());
//! let me = Identity::new("u1", "Somchai");
//!
//! let course = service.create_course(&me, NewCourse::new("CS101", "Programming", "การเขียนโปรแกรม", 3)).await?;
//! let draft = service.create_document(&me, &course.id).await?;
//!
//! let mut ids = clo_model::UlidGenerator;
//! let (content, _) = service.add_clo(&draft.content, None, &mut ids)?;
//! let saved = service.update_document(&me, &draft.id, content, draft.revision).await?;
//! let artifact = service.export(&saved.id, None).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod course;
mod document;
mod error;
mod export;
mod identity;
mod service;
mod store;

// Re-exports
pub use config::DocumentConfig;
pub use course::{Course, NewCourse, CREDIT_RANGE};
pub use document::{DocumentStatus, DocumentVersion};
pub use error::DocumentError;
pub use export::{export_document, ExportArtifact, ExportFormat, OutlineRenderer, Renderer};
pub use identity::{Identity, Role};
pub use service::DocumentService;
pub use store::{DocumentStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
