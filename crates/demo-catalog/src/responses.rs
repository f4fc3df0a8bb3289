//! Cosmetic assessment responses consistent with an archetype.
//!
//! Stored assessments copy their score vector from the archetype; the
//! response set generated here only has to look plausible. Each forced-choice
//! question picks the dominant type with probability
//! `DOMINANT_NUMERATOR / DOMINANT_DENOMINATOR` and the opposite type
//! otherwise, so repeated resets produce different answer sheets.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::PersonalityType;

/// Number of forced-choice questions in a synthesized assessment.
pub const QUESTION_COUNT: u8 = 24;

/// Numerator of the probability of answering with the dominant type.
pub const DOMINANT_NUMERATOR: u32 = 7;

/// Denominator of the probability of answering with the dominant type.
pub const DOMINANT_DENOMINATOR: u32 = 10;

/// One answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// One-based question number.
    pub question: u8,
    /// Chosen personality type.
    pub choice: PersonalityType,
}

/// Full answer sheet for one synthesized assessment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(Vec<QuestionResponse>);

impl ResponseSet {
    /// Answers in question order.
    #[must_use]
    pub fn responses(&self) -> &[QuestionResponse] {
        &self.0
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no questions were answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of answers matching `kind`.
    #[must_use]
    pub fn count_of(&self, kind: PersonalityType) -> usize {
        self.0.iter().filter(|answer| answer.choice == kind).count()
    }
}

/// Randomized response generator.
///
/// Production code seeds from the thread RNG so each run differs; tests use
/// [`ResponseSynthesizer::seeded`] for reproducible sheets.
#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
    rng: ChaCha8Rng,
}

impl ResponseSynthesizer {
    /// Builds a synthesizer seeded from the thread-local RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Builds a synthesizer with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Answers every question for an archetype dominated by `dominant`.
    ///
    /// # Examples
    ///
    /// ```
    /// use demo_catalog::{PersonalityType, QUESTION_COUNT, ResponseSynthesizer};
    ///
    /// let mut synthesizer = ResponseSynthesizer::seeded(7);
    /// let sheet = synthesizer.synthesize(PersonalityType::S);
    /// assert_eq!(sheet.len(), usize::from(QUESTION_COUNT));
    /// let aligned = sheet.count_of(PersonalityType::S) + sheet.count_of(PersonalityType::D);
    /// assert_eq!(aligned, sheet.len());
    /// ```
    pub fn synthesize(&mut self, dominant: PersonalityType) -> ResponseSet {
        let answers = (1..=QUESTION_COUNT)
            .map(|question| {
                let choice = if self
                    .rng
                    .random_ratio(DOMINANT_NUMERATOR, DOMINANT_DENOMINATOR)
                {
                    dominant
                } else {
                    dominant.opposite()
                };
                QuestionResponse { question, choice }
            })
            .collect();
        ResponseSet(answers)
    }
}

impl Default for ResponseSynthesizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn seeded_synthesizers_repeat_themselves() {
        let first = ResponseSynthesizer::seeded(42).synthesize(PersonalityType::D);
        let second = ResponseSynthesizer::seeded(42).synthesize(PersonalityType::D);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(PersonalityType::D)]
    #[case(PersonalityType::I)]
    #[case(PersonalityType::S)]
    #[case(PersonalityType::C)]
    fn answers_are_dominant_or_opposite(#[case] dominant: PersonalityType) {
        let sheet = ResponseSynthesizer::seeded(9).synthesize(dominant);
        assert!(
            sheet
                .responses()
                .iter()
                .all(|answer| answer.choice == dominant || answer.choice == dominant.opposite())
        );
    }

    #[rstest]
    fn questions_are_numbered_from_one() {
        let sheet = ResponseSynthesizer::seeded(1).synthesize(PersonalityType::C);
        let numbers: Vec<u8> = sheet.responses().iter().map(|answer| answer.question).collect();
        let expected: Vec<u8> = (1..=QUESTION_COUNT).collect();
        assert_eq!(numbers, expected);
    }

    #[rstest]
    fn dominant_answers_are_the_majority_over_many_sheets() {
        let mut synthesizer = ResponseSynthesizer::seeded(2024);
        let sheets = 200_usize;
        let dominant: usize = (0..sheets)
            .map(|_| synthesizer.synthesize(PersonalityType::I).count_of(PersonalityType::I))
            .sum();
        let total = sheets * usize::from(QUESTION_COUNT);
        // Expect roughly 70%; allow a wide band for a fixed seed.
        assert!(dominant * 100 > total * 60, "dominant share too low: {dominant}/{total}");
        assert!(dominant * 100 < total * 80, "dominant share too high: {dominant}/{total}");
    }

    #[rstest]
    fn response_set_serialises_as_plain_array() {
        let sheet = ResponseSynthesizer::seeded(3).synthesize(PersonalityType::S);
        let json = serde_json::to_value(&sheet).expect("serialise");
        assert!(json.is_array());
        let back: ResponseSet = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, sheet);
    }
}
