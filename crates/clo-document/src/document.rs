//! Document versions: one course's CLO content plus lifecycle metadata

use crate::course::Course;
use crate::export::ExportFormat;
use chrono::{DateTime, Utc};
use clo_mapping::CloSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Published,
}

impl DocumentStatus {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One version of a course's มคอ.3 document
///
/// `revision` is bumped by the store on every save and checked against the
/// caller's expected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: String,
    pub version: u32,
    #[serde(default)]
    pub status: DocumentStatus,
    pub course: Course,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub content: CloSnapshot,
}

impl DocumentVersion {
    /// Fresh draft at version 1 with no CLOs
    #[must_use]
    pub fn draft(
        id: String,
        course: Course,
        created_by_id: String,
        content: CloSnapshot,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            version: 1,
            status: DocumentStatus::Draft,
            course,
            created_by_id,
            created_at: now,
            updated_at: now,
            revision: 0,
            content,
        }
    }

    /// Check if published
    #[inline]
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == DocumentStatus::Published
    }

    /// Export file name, e.g. `CS101_มคอ3.pdf`
    #[must_use]
    pub fn export_file_name(&self, format: ExportFormat) -> String {
        format!("{}_มคอ3.{}", self.course.code, format.extension())
    }
}
