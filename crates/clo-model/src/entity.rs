//! Document entities: CLOs, teaching and assessment methods, PLOs
//!
//! Plain data with public fields. Cross-entity invariants (dense CLO
//! numbering, one mapping per pair) live in `clo-mapping`; this module only
//! validates what a single entity can check on its own.

use crate::error::ValidationError;
use crate::id::EntityId;
use crate::percentage::Percentage;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Anything addressed by an [`EntityId`]
pub trait Entity {
    /// Current id
    fn id(&self) -> &EntityId;

    /// Mutable id, used when persisted ids replace temporary ones
    fn id_mut(&mut self) -> &mut EntityId;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                #[inline]
                fn id(&self) -> &EntityId {
                    &self.id
                }

                #[inline]
                fn id_mut(&mut self) -> &mut EntityId {
                    &mut self.id
                }
            }
        )*
    };
}

/// Bloom's taxonomy level, ordered by cognitive complexity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BloomLevel {
    /// Recall facts
    Remember,
    /// Explain ideas
    #[default]
    Understand,
    /// Use information in new situations
    Apply,
    /// Draw connections
    Analyze,
    /// Justify a decision
    Evaluate,
    /// Produce original work
    Create,
}

impl BloomLevel {
    /// All levels, lowest first
    pub const ALL: [Self; 6] = [
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyze,
        Self::Evaluate,
        Self::Create,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remember => "remember",
            Self::Understand => "understand",
            Self::Apply => "apply",
            Self::Analyze => "analyze",
            Self::Evaluate => "evaluate",
            Self::Create => "create",
        }
    }

    /// Thai label used in มคอ.3 documents
    #[must_use]
    pub fn label_th(self) -> &'static str {
        match self {
            Self::Remember => "จำ",
            Self::Understand => "เข้าใจ",
            Self::Apply => "ประยุกต์ใช้",
            Self::Analyze => "วิเคราะห์",
            Self::Evaluate => "ประเมินค่า",
            Self::Create => "สร้างสรรค์",
        }
    }
}

impl FromStr for BloomLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::invalid("bloom_level", s))
    }
}

impl Display for BloomLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a CLO's contribution to a PLO
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    /// Not mapped
    #[default]
    None,
    /// Weak contribution
    Low,
    /// Moderate contribution
    Medium,
    /// Strong contribution
    High,
}

impl Strength {
    /// All strengths, weakest first
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Single-character matrix cell
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::None => '-',
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::High => 'H',
        }
    }
}

impl FromStr for Strength {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strength| strength.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::invalid("strength", s))
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course Learning Outcome
///
/// `number` is the 1-based position shown as "CLO n". Reducers in
/// `clo-mapping` keep it dense across a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clo {
    pub id: EntityId,
    pub number: u32,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_th: String,
    #[serde(default)]
    pub bloom_level: BloomLevel,
}

impl Clo {
    /// Create CLO with empty descriptions
    #[inline]
    #[must_use]
    pub fn new(id: EntityId, number: u32) -> Self {
        Self {
            id,
            number,
            description_en: String::new(),
            description_th: String::new(),
            bloom_level: BloomLevel::default(),
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

    /// With bloom level
    #[inline]
    #[must_use]
    pub fn with_bloom_level(mut self, level: BloomLevel) -> Self {
        self.bloom_level = level;
        self
    }

    /// Display label, e.g. `CLO 2`
    #[must_use]
    pub fn label(&self) -> String {
        format!("CLO {}", self.number)
    }
}

/// Teaching method used to deliver CLOs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingMethod {
    pub id: EntityId,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_th: String,
}

impl TeachingMethod {
    /// Create teaching method
    #[inline]
    #[must_use]
    pub fn new(id: EntityId, name_en: impl Into<String>, name_th: impl Into<String>) -> Self {
        Self {
            id,
            name_en: name_en.into(),
            name_th: name_th.into(),
        }
    }
}

/// Assessment method with its overall course weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMethod {
    pub id: EntityId,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_th: String,
    #[serde(default)]
    pub weight: Percentage,
}

impl AssessmentMethod {
    /// Create assessment method
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] if `weight` is outside `[0, 100]`
    pub fn new(
        id: EntityId,
        name_en: impl Into<String>,
        name_th: impl Into<String>,
        weight: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name_en: name_en.into(),
            name_th: name_th.into(),
            weight: Percentage::for_field("weight", weight)?,
        })
    }

    /// Blank method with zero weight
    #[inline]
    #[must_use]
    pub fn blank(id: EntityId) -> Self {
        Self {
            id,
            name_en: String::new(),
            name_th: String::new(),
            weight: Percentage::ZERO,
        }
    }

    /// Change weight
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] and leaves the weight untouched
    /// if `weight` is outside `[0, 100]`
    pub fn set_weight(&mut self, weight: f64) -> Result<(), ValidationError> {
        self.weight = Percentage::for_field("weight", weight)?;
        Ok(())
    }
}

/// Program Learning Outcome, supplied by the program catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plo {
    pub id: EntityId,
    pub code_en: String,
    pub code_th: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_th: String,
    #[serde(default)]
    pub program: String,
}

impl Plo {
    /// Create PLO with codes only
    #[inline]
    #[must_use]
    pub fn new(id: EntityId, code_en: impl Into<String>, code_th: impl Into<String>) -> Self {
        Self {
            id,
            code_en: code_en.into(),
            code_th: code_th.into(),
            description_en: String::new(),
            description_th: String::new(),
            program: String::new(),
        }
    }
}

impl_entity!(Clo, TeachingMethod, AssessmentMethod, Plo);
