//! Commands behind the `clo` binary
//!
//! Each command reads a JSON-serialized [`DocumentVersion`], works on its
//! content and reports through stdout or files. The binary only parses
//! arguments and installs logging.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{Context, Result};
use clo_document::{export_document, DocumentConfig, DocumentVersion, ExportFormat, OutlineRenderer};
use clo_mapping::{CloTotal, ConsistencyViolation, MappingKindTag};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of `clo check`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub document_id: String,
    pub violations: Vec<ConsistencyViolation>,
}

impl CheckReport {
    /// Check if no invariant is broken
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Process exit code: 0 when consistent, 1 otherwise
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        if self.passed() {
            return format!("{}: consistent\n", self.document_id);
        }
        let mut text = format!(
            "{}: {} violation(s)\n",
            self.document_id,
            self.violations.len()
        );
        for violation in &self.violations {
            text.push_str("  ");
            text.push_str(&violation.to_string());
            text.push('\n');
        }
        text
    }
}

/// Read a document from JSON
///
/// # Errors
/// Fails if the file cannot be read or is not a document
pub async fn load_document(path: &Path) -> Result<DocumentVersion> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a document", path.display()))
}

/// Load the configuration file, or defaults when none is given
///
/// # Errors
/// Fails if the file cannot be read or parsed
pub fn load_config(path: Option<&Path>) -> Result<DocumentConfig> {
    match path {
        Some(path) => Ok(DocumentConfig::load(path)?),
        None => Ok(DocumentConfig::default()),
    }
}

/// `clo check`
///
/// # Errors
/// Fails if the document cannot be loaded
pub async fn check(input: &Path) -> Result<CheckReport> {
    let document = load_document(input).await?;
    let violations = document.content.violations();
    tracing::debug!(document = %document.id, violations = violations.len(), "checked document");
    Ok(CheckReport {
        document_id: document.id,
        violations,
    })
}

/// `clo reconcile`: renumber and reconcile, then write JSON
///
/// Writes to `out`, or returns the JSON when `out` is `None`.
///
/// # Errors
/// Fails if the document cannot be loaded or written, or if two of its
/// entities share an id
pub async fn reconcile(input: &Path, out: Option<&Path>) -> Result<Option<String>> {
    let mut document = load_document(input).await?;
    document
        .content
        .ensure_unique_ids()
        .with_context(|| format!("cannot reconcile {}", input.display()))?;
    let before = document.content.violations().len();
    document.content = document.content.normalized();
    tracing::info!(document = %document.id, repaired = before, "reconciled document");

    emit_json(&document, out).await
}

/// `clo set`: change one mapping value
///
/// `clo_number` picks the CLO by its number; `target` is an id, or a method's
/// English name, or a PLO's English code. `raw_value` is parsed for `kind`.
///
/// # Errors
/// Fails if the document cannot be loaded or written, the CLO or target does
/// not exist, the value is invalid for `kind`, or the pair was never
/// reconciled
pub async fn set(
    input: &Path,
    kind: MappingKindTag,
    clo_number: u32,
    target: &str,
    raw_value: &str,
    out: Option<&Path>,
) -> Result<Option<String>> {
    let mut document = load_document(input).await?;
    let value = kind.parse_value(raw_value)?;

    let content = &document.content;
    let clo_id = content
        .clo_by_number(clo_number)
        .map(|clo| clo.id.clone())
        .with_context(|| format!("no CLO numbered {clo_number}"))?;
    let target_id = content
        .find_target(kind, target)
        .cloned()
        .with_context(|| format!("no {kind} target {target:?}"))?;

    document.content = content.set_value(kind, &clo_id, &target_id, value)?;
    tracing::info!(
        document = %document.id,
        %kind,
        clo = clo_number,
        target = %target_id,
        %value,
        "set mapping value"
    );
    emit_json(&document, out).await
}

/// Pretty JSON to `out`, or returned when `out` is `None`
async fn emit_json(
    document: &DocumentVersion,
    out: Option<&Path>,
) -> Result<Option<String>> {
    let json = serde_json::to_string_pretty(document)?;
    match out {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(None)
        }
        None => Ok(Some(json)),
    }
}

/// `clo totals`
///
/// # Errors
/// Fails if the document cannot be loaded
pub async fn totals(input: &Path, config: &DocumentConfig) -> Result<Vec<CloTotal>> {
    let document = load_document(input).await?;
    let totals = document.content.assessment_totals();
    if config.warn_on_assessment_total {
        for t in totals.iter().filter(|t| t.is_partial()) {
            tracing::warn!(clo = t.number, total = t.total, "assessment total differs from 100");
        }
    }
    Ok(totals)
}

/// `clo export`: returns the written path and the artifact digest
///
/// # Errors
/// Fails if the document cannot be loaded, is inconsistent, or the artifact
/// cannot be written
pub async fn export(
    input: &Path,
    format: Option<ExportFormat>,
    out_dir: &Path,
    config: &DocumentConfig,
) -> Result<(PathBuf, String)> {
    let document = load_document(input).await?;
    let format = format.unwrap_or(config.default_export_format);
    let artifact = export_document(&document, format, &OutlineRenderer)?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok((path, artifact.digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clo_document::DocumentError;
    use clo_model::{Clo, EntityId, Strength, ValidationError};
    use clo_test_utils::sample_document;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_document(dir: &TempDir, document: &DocumentVersion) -> PathBuf {
        let path = dir.path().join("doc.json");
        std::fs::write(&path, serde_json::to_string(document).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn check_reports_violations() {
        let dir = TempDir::new().unwrap();
        let mut document = sample_document();
        let clean = write_document(&dir, &document);
        assert_eq!(check(&clean).await.unwrap().exit_code(), 0);

        document.content.clos[0].number = 5;
        let broken = write_document(&dir, &document);
        let report = check(&broken).await.unwrap();
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
        assert!(report.generate_text().contains("1 violation(s)"));
    }

    #[tokio::test]
    async fn reconcile_repairs_file() {
        let dir = TempDir::new().unwrap();
        let mut document = sample_document();
        document.content.mappings.assessment = Default::default();
        let input = write_document(&dir, &document);
        let out = dir.path().join("fixed.json");

        assert!(reconcile(&input, Some(&out)).await.unwrap().is_none());
        assert!(check(&out).await.unwrap().passed());

        let json = reconcile(&input, None).await.unwrap().unwrap();
        let fixed: DocumentVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(fixed.content.mappings.assessment.len(), 3 * 2);
    }

    #[tokio::test]
    async fn reconcile_refuses_shared_ids() {
        let dir = TempDir::new().unwrap();
        let mut document = sample_document();
        let copy = Clo::new(document.content.clos[0].id.clone(), 4);
        document.content.clos.push(copy);
        let input = write_document(&dir, &document);
        let out = dir.path().join("fixed.json");

        let err = reconcile(&input, Some(&out)).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn set_changes_one_value() {
        let dir = TempDir::new().unwrap();
        let input = write_document(&dir, &sample_document());

        let json = set(&input, MappingKindTag::ProgramOutcome, 3, "PLO2", "medium", None)
            .await
            .unwrap()
            .unwrap();
        let updated: DocumentVersion = serde_json::from_str(&json).unwrap();
        let c3 = &updated.content.clos[2].id;
        assert_eq!(
            updated.content.mappings.plo.get(c3, &EntityId::persisted("plo-2")),
            Some(Strength::Medium)
        );
        assert!(updated.content.is_consistent());

        let out = dir.path().join("set.json");
        assert!(set(&input, MappingKindTag::Assessment, 1, "Exam", "45", Some(&out))
            .await
            .unwrap()
            .is_none());
        let written: DocumentVersion =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.content.assessment_totals()[0].total, 65.0);
    }

    #[tokio::test]
    async fn set_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let input = write_document(&dir, &sample_document());

        assert!(set(&input, MappingKindTag::Assessment, 1, "Exam", "120", None).await.is_err());
        assert!(set(&input, MappingKindTag::Teaching, 9, "Lecture", "yes", None).await.is_err());
        assert!(set(&input, MappingKindTag::Teaching, 1, "Seminar", "yes", None).await.is_err());
    }

    #[tokio::test]
    async fn totals_follow_clo_order() {
        let dir = TempDir::new().unwrap();
        let input = write_document(&dir, &sample_document());

        let totals: Vec<f64> = totals(&input, &DocumentConfig::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.total)
            .collect();
        assert_eq!(totals, vec![50.0, 100.0, 0.0]);
    }

    #[tokio::test]
    async fn export_writes_artifact() {
        let dir = TempDir::new().unwrap();
        let input = write_document(&dir, &sample_document());
        let out_dir = dir.path().join("out");

        let (path, digest) = export(&input, Some(ExportFormat::Docx), &out_dir, &DocumentConfig::default())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap().to_str(), Some("CS101_มคอ3.docx"));
        assert_eq!(digest.len(), 64);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[PLO mapping]"));
    }

    #[tokio::test]
    async fn export_refuses_inconsistent_document() {
        let dir = TempDir::new().unwrap();
        let mut document = sample_document();
        document.content.mappings.plo = Default::default();
        let input = write_document(&dir, &document);

        let err = export(&input, None, dir.path(), &DocumentConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DocumentError>(),
            Some(DocumentError::Inconsistent { .. })
        ));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        assert_eq!(load_config(None).unwrap(), DocumentConfig::default());
        assert!(load_config(Some(Path::new("/nonexistent/clo.toml"))).is_err());
    }

    #[tokio::test]
    async fn load_rejects_non_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"id\": 1}").unwrap();
        assert!(load_document(&path).await.is_err());
    }
}
