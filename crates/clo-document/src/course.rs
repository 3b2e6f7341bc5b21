//! Courses a document describes

use chrono::{DateTime, Utc};
use clo_model::ValidationError;
use serde::{Deserialize, Serialize};

/// Allowed credit range
pub const CREDIT_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

/// Stored course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name_en: String,
    pub name_th: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_th: String,
    pub credits: u8,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course creation request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCourse {
    pub code: String,
    pub name_en: String,
    pub name_th: String,
    pub description_en: String,
    pub description_th: String,
    pub credits: u8,
    pub faculty: String,
    pub department: String,
    pub prerequisites: Vec<String>,
    pub corequisites: Vec<String>,
}

impl NewCourse {
    /// Create request with the required fields
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name_en: impl Into<String>,
        name_th: impl Into<String>,
        credits: u8,
    ) -> Self {
        Self {
            code: code.into(),
            name_en: name_en.into(),
            name_th: name_th.into(),
            credits,
            ..Self::default()
        }
    }

    /// With descriptions
    #[inline]
    #[must_use]
    pub fn with_description(mut self, en: impl Into<String>, th: impl Into<String>) -> Self {
        self.description_en = en.into();
        self.description_th = th.into();
        self
    }

    /// With owning faculty and department
    #[inline]
    #[must_use]
    pub fn with_faculty(mut self, faculty: impl Into<String>, department: impl Into<String>) -> Self {
        self.faculty = faculty.into();
        self.department = department.into();
        self
    }

    /// With prerequisite course codes
    #[inline]
    #[must_use]
    pub fn with_prerequisites(mut self, codes: Vec<String>) -> Self {
        self.prerequisites = codes;
        self
    }

    /// Check required fields and credit range
    ///
    /// # Errors
    /// - [`ValidationError::Missing`] for a blank code or name
    /// - [`ValidationError::OutOfBounds`] if credits are outside `1..=12`
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("code", &self.code),
            ("name_en", &self.name_en),
            ("name_th", &self.name_th),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::missing(field));
            }
        }

        if !CREDIT_RANGE.contains(&self.credits) {
            return Err(ValidationError::OutOfBounds {
                field: "credits",
                value: i64::from(self.credits),
                min: i64::from(*CREDIT_RANGE.start()),
                max: i64::from(*CREDIT_RANGE.end()),
            });
        }
        Ok(())
    }

    /// Build the stored record
    #[must_use]
    pub fn into_course(self, id: String, created_by_id: String, now: DateTime<Utc>) -> Course {
        Course {
            id,
            code: self.code.trim().to_owned(),
            name_en: self.name_en,
            name_th: self.name_th,
            description_en: self.description_en,
            description_th: self.description_th,
            credits: self.credits,
            faculty: self.faculty,
            department: self.department,
            prerequisites: self.prerequisites,
            corequisites: self.corequisites,
            created_by_id,
            created_at: now,
            updated_at: now,
        }
    }
}
