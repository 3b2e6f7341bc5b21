//! Document service configuration
//!
//! Loaded from TOML. Every field is optional; missing fields take the
//! defaults below.
//!
//! ```toml
//! max_clos = 50
//! max_methods = 50
//! default_bloom_level = "understand"
//! default_export_format = "pdf"
//! warn_on_assessment_total = true
//! ```

use crate::error::DocumentError;
use crate::export::ExportFormat;
use clo_model::BloomLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Limits and defaults applied by [`DocumentService`](crate::DocumentService)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Maximum CLOs per document
    pub max_clos: usize,
    /// Maximum teaching or assessment methods per document
    pub max_methods: usize,
    /// Bloom level given to new CLOs
    pub default_bloom_level: BloomLevel,
    /// Format used when an export request names none
    pub default_export_format: ExportFormat,
    /// Log a warning on save when a CLO's assessment total is set but not 100
    pub warn_on_assessment_total: bool,
}

impl DocumentConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With CLO limit
    #[inline]
    #[must_use]
    pub fn with_max_clos(mut self, max: usize) -> Self {
        self.max_clos = max;
        self
    }

    /// With method limit
    #[inline]
    #[must_use]
    pub fn with_max_methods(mut self, max: usize) -> Self {
        self.max_methods = max;
        self
    }

    /// With default bloom level
    #[inline]
    #[must_use]
    pub fn with_default_bloom_level(mut self, level: BloomLevel) -> Self {
        self.default_bloom_level = level;
        self
    }

    /// With default export format
    #[inline]
    #[must_use]
    pub fn with_default_export_format(mut self, format: ExportFormat) -> Self {
        self.default_export_format = format;
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// Returns [`DocumentError::Config`] on malformed TOML or zero limits
    pub fn from_toml_str(raw: &str) -> Result<Self, DocumentError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| DocumentError::Config(e.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`DocumentError::Config`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DocumentError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded document config");
        Ok(config)
    }

    /// Check limits
    ///
    /// # Errors
    /// Returns [`DocumentError::Config`] if a limit is zero
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.max_clos == 0 {
            return Err(DocumentError::Config("max_clos must be at least 1".into()));
        }
        if self.max_methods == 0 {
            return Err(DocumentError::Config("max_methods must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_clos: 50,
            max_methods: 50,
            default_bloom_level: BloomLevel::Understand,
            default_export_format: ExportFormat::Pdf,
            warn_on_assessment_total: true,
        }
    }
}
