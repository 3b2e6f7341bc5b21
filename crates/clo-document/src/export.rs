//! Export of consistent documents
//!
//! # Core Concepts
//!
//! - [`ExportFormat`]: Requested output format
//! - [`Renderer`]: Turns a document into bytes
//! - [`OutlineRenderer`]: Deterministic plain-text outline
//! - [`ExportArtifact`]: Named, typed, digested output
//!
//! Only aggregates that pass [`check_consistency`] are rendered.

use crate::document::DocumentVersion;
use crate::error::DocumentError;
use clo_mapping::{check_consistency, MappingKind, MappingSet};
use clo_model::{Clo, Entity, ValidationError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter, Write as _};
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
}

impl ExportFormat {
    /// All formats
    pub const ALL: [Self; 2] = [Self::Pdf, Self::Docx];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// File extension
    #[inline]
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME type
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::invalid("format", s))
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
    /// Hex SHA-256 of `body`
    pub digest: String,
}

impl ExportArtifact {
    /// Wrap a rendered body, computing its digest
    #[must_use]
    pub fn new(file_name: String, format: ExportFormat, body: Vec<u8>) -> Self {
        let digest = hex::encode(Sha256::digest(&body));
        Self {
            file_name,
            content_type: format.content_type().to_owned(),
            body,
            digest,
        }
    }

    /// Body size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the body is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Document renderer
///
/// Implementations receive only documents that passed the consistency
/// check.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Render `document` as `format`
    ///
    /// # Errors
    /// Returns [`DocumentError::Render`] if the document cannot be rendered
    fn render(
        &self,
        document: &DocumentVersion,
        format: ExportFormat,
    ) -> Result<Vec<u8>, DocumentError>;
}

/// Check, render and package a document
///
/// # Errors
/// - [`DocumentError::Inconsistent`] if the content breaks an invariant
/// - whatever `renderer` returns
pub fn export_document<R: Renderer + ?Sized>(
    document: &DocumentVersion,
    format: ExportFormat,
    renderer: &R,
) -> Result<ExportArtifact, DocumentError> {
    let violations = check_consistency(&document.content);
    if !violations.is_empty() {
        return Err(DocumentError::Inconsistent {
            id: document.id.clone(),
            violations,
        });
    }

    let body = renderer.render(document, format)?;
    let artifact = ExportArtifact::new(document.export_file_name(format), format, body);
    tracing::info!(
        document = %document.id,
        format = %format,
        bytes = artifact.len(),
        "exported document"
    );
    Ok(artifact)
}

/// Plain-text outline renderer
///
/// Both formats share one outline; only the header line names the format.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(
        &self,
        document: &DocumentVersion,
        format: ExportFormat,
    ) -> Result<Vec<u8>, DocumentError> {
        outline(document, format)
            .map(String::into_bytes)
            .map_err(|e| DocumentError::Render(e.to_string()))
    }
}

fn outline(document: &DocumentVersion, format: ExportFormat) -> Result<String, fmt::Error> {
    let course = &document.course;
    let content = &document.content;
    let mut out = String::new();

    writeln!(out, "มคอ.3 {} {} ({})", course.code, course.name_th, course.name_en)?;
    writeln!(out, "credits: {}", course.credits)?;
    if !course.prerequisites.is_empty() {
        writeln!(out, "prerequisites: {}", course.prerequisites.join(", "))?;
    }
    if !course.corequisites.is_empty() {
        writeln!(out, "corequisites: {}", course.corequisites.join(", "))?;
    }
    writeln!(
        out,
        "version: {} ({}) format: {format}",
        document.version, document.status
    )?;

    writeln!(out, "\n[CLOs]")?;
    for clo in &content.clos {
        writeln!(
            out,
            "{} [{} / {}] {} / {}",
            clo.label(),
            clo.bloom_level,
            clo.bloom_level.label_th(),
            clo.description_en,
            clo.description_th
        )?;
    }

    let teaching = Matrix::build(
        &content.clos,
        content.teaching_methods.iter().map(|m| (m, m.name_en.clone())),
        &content.mappings.teaching,
        |used| if used { "x".into() } else { "-".into() },
    );
    writeln!(out, "\n[Teaching methods]")?;
    teaching.write_to(&mut out)?;

    let mut assessment = Matrix::build(
        &content.clos,
        content
            .assessment_methods
            .iter()
            .map(|m| (m, format!("{} ({})", m.name_en, m.weight))),
        &content.mappings.assessment,
        |p| if p.is_zero() { "-".into() } else { amount(p.value()) },
    );
    assessment.push_column("total", |clo| amount(content.assessment_total(&clo.id)));
    writeln!(out, "\n[Assessment]")?;
    assessment.write_to(&mut out)?;

    let plo = Matrix::build(
        &content.clos,
        content.plos.iter().map(|p| (p, p.code_en.clone())),
        &content.mappings.plo,
        |s| s.symbol().to_string(),
    );
    writeln!(out, "\n[PLO mapping]")?;
    plo.write_to(&mut out)?;

    Ok(out)
}

/// Up to two decimals, trailing zeros dropped
fn amount(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// CLO-by-target table, rows keyed by CLO label in CLO order
struct Matrix<'a> {
    header: Vec<String>,
    rows: IndexMap<String, (&'a Clo, Vec<String>)>,
}

impl<'a> Matrix<'a> {
    fn build<'t, K, T, I>(
        clos: &'a [Clo],
        targets: I,
        mappings: &MappingSet<K>,
        cell: impl Fn(K::Value) -> String,
    ) -> Self
    where
        K: MappingKind,
        T: Entity + 't,
        I: Iterator<Item = (&'t T, String)>,
    {
        let (targets, header): (Vec<&T>, Vec<String>) = targets.unzip();
        let rows = clos
            .iter()
            .map(|clo| {
                let cells = targets
                    .iter()
                    .map(|t| mappings.get(&clo.id, t.id()).map_or_else(String::new, &cell))
                    .collect();
                (clo.label(), (clo, cells))
            })
            .collect();
        Self { header, rows }
    }

    fn push_column(&mut self, title: &str, cell: impl Fn(&Clo) -> String) {
        self.header.push(title.to_owned());
        for (clo, cells) in self.rows.values_mut() {
            cells.push(cell(*clo));
        }
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "\t{}", self.header.join("\t"))?;
        for (label, (_, cells)) in &self.rows {
            writeln!(out, "{label}\t{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
