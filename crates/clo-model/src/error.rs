//! Validation errors for entity construction

/// Malformed input to a constructor-style operation
///
/// Values are never clamped; the caller gets the offending value back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Real-valued field outside its range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Integer field outside its range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfBounds {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Required field missing or blank
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Value not in the accepted set
    #[error("invalid {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    /// Collection already at its configured size
    #[error("at most {limit} {what} allowed")]
    CapacityExceeded { what: &'static str, limit: usize },
}

impl ValidationError {
    /// Create missing-field error
    #[inline]
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    /// Create invalid-value error
    #[inline]
    #[must_use]
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// Field the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::OutOfRange { field, .. }
            | Self::OutOfBounds { field, .. }
            | Self::Missing { field }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::CapacityExceeded { .. } => None,
        }
    }
}
