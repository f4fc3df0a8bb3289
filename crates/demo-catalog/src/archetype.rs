//! Archetype template types: personality labels and score vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed total every score vector must sum to.
pub const SCORE_TOTAL: u32 = 100;

/// DISC personality type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityType {
    /// Dominance.
    D,
    /// Influence.
    I,
    /// Steadiness.
    S,
    /// Conscientiousness.
    C,
}

impl PersonalityType {
    /// All four types in canonical D, I, S, C order.
    pub const ALL: [Self; 4] = [Self::D, Self::I, Self::S, Self::C];

    /// Returns the type diagonally opposite on the DISC circle.
    ///
    /// Dominance opposes Steadiness and Influence opposes Conscientiousness.
    ///
    /// # Examples
    ///
    /// ```
    /// use demo_catalog::PersonalityType;
    ///
    /// assert_eq!(PersonalityType::D.opposite(), PersonalityType::S);
    /// assert_eq!(PersonalityType::C.opposite(), PersonalityType::I);
    /// ```
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::D => Self::S,
            Self::I => Self::C,
            Self::S => Self::D,
            Self::C => Self::I,
        }
    }

    /// Single-letter label.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::D => 'D',
            Self::I => 'I',
            Self::S => 'S',
            Self::C => 'C',
        }
    }

    /// Single-letter label as a string slice, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::D => "D",
            Self::I => "I",
            Self::S => "S",
            Self::C => "C",
        }
    }

    /// Parses a single-letter label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "D" => Some(Self::D),
            "I" => Some(Self::I),
            "S" => Some(Self::S),
            "C" => Some(Self::C),
            _ => None,
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-dimension DISC score vector.
///
/// Catalog vectors sum to [`SCORE_TOTAL`]; the catalog loader enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreVector {
    /// Dominance score.
    #[serde(rename = "D")]
    pub d: u8,
    /// Influence score.
    #[serde(rename = "I")]
    pub i: u8,
    /// Steadiness score.
    #[serde(rename = "S")]
    pub s: u8,
    /// Conscientiousness score.
    #[serde(rename = "C")]
    pub c: u8,
}

impl ScoreVector {
    /// Builds a vector from its four components.
    #[must_use]
    pub const fn new(d: u8, i: u8, s: u8, c: u8) -> Self {
        Self { d, i, s, c }
    }

    /// Sum of all four dimensions.
    #[must_use]
    pub fn total(&self) -> u32 {
        [self.d, self.i, self.s, self.c]
            .into_iter()
            .map(u32::from)
            .sum()
    }

    /// Score for one dimension.
    #[must_use]
    pub const fn score(&self, kind: PersonalityType) -> u8 {
        match kind {
            PersonalityType::D => self.d,
            PersonalityType::I => self.i,
            PersonalityType::S => self.s,
            PersonalityType::C => self.c,
        }
    }

    /// Whether `kind` shares the highest score, ties included.
    #[must_use]
    pub fn is_dominant(&self, kind: PersonalityType) -> bool {
        self.score(kind) == self.score(self.dominant())
    }

    /// Highest-scoring dimension; ties resolve in D, I, S, C order.
    ///
    /// # Examples
    ///
    /// ```
    /// use demo_catalog::{PersonalityType, ScoreVector};
    ///
    /// let scores = ScoreVector::new(10, 40, 40, 10);
    /// assert_eq!(scores.dominant(), PersonalityType::I);
    /// ```
    #[must_use]
    pub fn dominant(&self) -> PersonalityType {
        PersonalityType::ALL
            .into_iter()
            .fold(PersonalityType::D, |best, candidate| {
                if self.score(candidate) > self.score(best) {
                    candidate
                } else {
                    best
                }
            })
    }
}

/// Immutable catalog-defined template for one synthetic client or staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeTemplate {
    display_name: String,
    base_identity: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    organization: Option<String>,
    personality_type: PersonalityType,
    score_vector: ScoreVector,
}

impl ArchetypeTemplate {
    /// Builds a template. Validation happens when a catalog is assembled.
    #[must_use]
    pub fn new(
        display_name: impl Into<String>,
        base_identity: impl Into<String>,
        personality_type: PersonalityType,
        score_vector: ScoreVector,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            base_identity: base_identity.into(),
            role: None,
            organization: None,
            personality_type,
            score_vector,
        }
    }

    /// Attaches a job role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Attaches an organization name.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Human-readable name shown in the demo workspace.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Template contact address the identity generator derives from.
    #[must_use]
    pub fn base_identity(&self) -> &str {
        &self.base_identity
    }

    /// Optional job role.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Optional organization name.
    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Dominant personality label.
    #[must_use]
    pub const fn personality_type(&self) -> PersonalityType {
        self.personality_type
    }

    /// Authoritative score vector.
    #[must_use]
    pub const fn score_vector(&self) -> ScoreVector {
        self.score_vector
    }
}
