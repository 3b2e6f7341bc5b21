//! Mapping kinds and their default values
//!
//! The three relation tables differ only in the value they carry. Each kind
//! is a zero-sized marker implementing [`MappingKind`]; the reconciliation
//! code is written once, generically.

use clo_model::{Percentage, Strength, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// A CLO-keyed relation table
///
/// This trait is **sealed**: the set of mapping kinds is fixed by the
/// document format.
pub trait MappingKind:
    private::Sealed + Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Value stored per (CLO, target) pair
    type Value: Debug + Clone + Copy + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    /// Runtime tag for this kind
    const TAG: MappingKindTag;

    /// Value given to freshly synthesized mappings
    const DEFAULT: Self::Value;

    /// Erase to a dynamic value
    fn to_value(value: Self::Value) -> MappingValue;

    /// Recover a typed value, `None` if the dynamic value belongs to another kind
    fn from_value(value: MappingValue) -> Option<Self::Value>;
}

#[doc(hidden)]
pub mod private {
    /// Sealed trait marker
    pub trait Sealed {}
}

/// CLO × teaching method: is the method used for the CLO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Teaching;

/// CLO × assessment method: share of the CLO assessed by the method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Assessment;

/// CLO × PLO: contribution strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgramOutcome;

impl private::Sealed for Teaching {}
impl private::Sealed for Assessment {}
impl private::Sealed for ProgramOutcome {}

// Default table. Every default in the workspace comes from these three
// constants; `MappingKindTag::default_value` reads them too.

impl MappingKind for Teaching {
    type Value = bool;
    const TAG: MappingKindTag = MappingKindTag::Teaching;
    const DEFAULT: bool = false;

    fn to_value(value: bool) -> MappingValue {
        MappingValue::Used(value)
    }

    fn from_value(value: MappingValue) -> Option<bool> {
        match value {
            MappingValue::Used(used) => Some(used),
            _ => None,
        }
    }
}

impl MappingKind for Assessment {
    type Value = Percentage;
    const TAG: MappingKindTag = MappingKindTag::Assessment;
    const DEFAULT: Percentage = Percentage::ZERO;

    fn to_value(value: Percentage) -> MappingValue {
        MappingValue::Percentage(value)
    }

    fn from_value(value: MappingValue) -> Option<Percentage> {
        match value {
            MappingValue::Percentage(p) => Some(p),
            _ => None,
        }
    }
}

impl MappingKind for ProgramOutcome {
    type Value = Strength;
    const TAG: MappingKindTag = MappingKindTag::ProgramOutcome;
    const DEFAULT: Strength = Strength::None;

    fn to_value(value: Strength) -> MappingValue {
        MappingValue::Strength(value)
    }

    fn from_value(value: MappingValue) -> Option<Strength> {
        match value {
            MappingValue::Strength(s) => Some(s),
            _ => None,
        }
    }
}

/// Runtime identifier of a mapping kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKindTag {
    /// CLO × teaching method
    Teaching,
    /// CLO × assessment method
    Assessment,
    /// CLO × PLO
    ProgramOutcome,
}

impl MappingKindTag {
    /// All kinds
    pub const ALL: [Self; 3] = [Self::Teaching, Self::Assessment, Self::ProgramOutcome];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teaching => "teaching",
            Self::Assessment => "assessment",
            Self::ProgramOutcome => "plo",
        }
    }

    /// Default value for this kind
    #[must_use]
    pub fn default_value(self) -> MappingValue {
        match self {
            Self::Teaching => Teaching::to_value(Teaching::DEFAULT),
            Self::Assessment => Assessment::to_value(Assessment::DEFAULT),
            Self::ProgramOutcome => ProgramOutcome::to_value(ProgramOutcome::DEFAULT),
        }
    }

    /// Parse a raw value for this kind
    ///
    /// Teaching accepts `true`/`false`/`yes`/`no`, assessment a number in
    /// `[0, 100]`, PLO a strength name.
    ///
    /// # Errors
    /// Returns [`ValidationError`] if `raw` is not a valid value of this kind
    pub fn parse_value(self, raw: &str) -> Result<MappingValue, ValidationError> {
        let raw = raw.trim();
        match self {
            Self::Teaching => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(MappingValue::Used(true)),
                "false" | "no" | "0" => Ok(MappingValue::Used(false)),
                _ => Err(ValidationError::invalid("used", raw)),
            },
            Self::Assessment => {
                let value: f64 = raw
                    .parse()
                    .map_err(|_| ValidationError::invalid("percentage", raw))?;
                Ok(MappingValue::Percentage(Percentage::new(value)?))
            }
            Self::ProgramOutcome => Ok(MappingValue::Strength(raw.parse()?)),
        }
    }
}

impl FromStr for MappingKindTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teaching" => Ok(Self::Teaching),
            "assessment" => Ok(Self::Assessment),
            "plo" | "program_outcome" => Ok(Self::ProgramOutcome),
            _ => Err(ValidationError::invalid("mapping kind", s)),
        }
    }
}

impl Display for MappingKindTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-erased mapping value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingValue {
    /// Teaching method used
    Used(bool),
    /// Assessment percentage
    Percentage(Percentage),
    /// PLO strength
    Strength(Strength),
}

impl MappingValue {
    /// Kind this value belongs to
    #[must_use]
    pub fn tag(self) -> MappingKindTag {
        match self {
            Self::Used(_) => MappingKindTag::Teaching,
            Self::Percentage(_) => MappingKindTag::Assessment,
            Self::Strength(_) => MappingKindTag::ProgramOutcome,
        }
    }
}

impl Display for MappingValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Used(used) => write!(f, "{used}"),
            Self::Percentage(p) => write!(f, "{p}"),
            Self::Strength(s) => write!(f, "{s}"),
        }
    }
}
