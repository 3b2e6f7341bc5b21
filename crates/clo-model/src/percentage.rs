//! Percentages in `[0, 100]`
//!
//! Used for assessment method weights and CLO×assessment percentages.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Finite value between 0 and 100 inclusive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    /// 0%
    pub const ZERO: Self = Self(0.0);

    /// 100%
    pub const FULL: Self = Self(100.0);

    /// Validate and wrap a raw value
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] for NaN, infinities and values
    /// outside `[0, 100]`
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        Self::for_field("percentage", value)
    }

    /// Same as [`Percentage::new`] but names `field` in the error
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] when out of range
    pub fn for_field(field: &'static str, value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: 0.0,
                max: 100.0,
            })
        }
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Check for 0%
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl Display for Percentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Percentage::new(0.0).unwrap(), Percentage::ZERO);
        assert_eq!(Percentage::new(100.0).unwrap(), Percentage::FULL);
        assert_eq!(Percentage::new(37.5).unwrap().value(), 37.5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Percentage::new(-0.5).is_err());
        assert!(Percentage::new(100.01).is_err());
        assert!(Percentage::new(f64::NAN).is_err());
        assert!(Percentage::new(f64::INFINITY).is_err());
    }

    #[test]
    fn error_names_field() {
        let err = Percentage::for_field("weight", 150.0).unwrap_err();
        assert_eq!(err.field(), Some("weight"));
    }

    #[test]
    fn deserialize_validates() {
        let ok: Percentage = serde_json::from_str("30").unwrap();
        assert_eq!(ok.value(), 30.0);

        let bad = serde_json::from_str::<Percentage>("130");
        assert!(bad.is_err());
    }

    #[test]
    fn display_with_sign() {
        assert_eq!(Percentage::new(50.0).unwrap().to_string(), "50%");
    }
}
