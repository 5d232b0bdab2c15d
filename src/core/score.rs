//! Ocean Score calculator - The pure scoring algorithm.
//!
//! This module converts a product's linked ingredients and the current weight
//! configuration into a full score breakdown. The calculator is a pure
//! function of its arguments: it performs no I/O, never suspends, and never
//! fails on well-formed input. Weight-sum validation is the weight
//! configuration's responsibility; the calculator computes whatever weights
//! it is given.

use crate::entities::{ingredient, score_weights};
use serde::{Deserialize, Serialize};

/// Score at or above which a product is rated `Safe`.
pub const SAFE_THRESHOLD: i32 = 80;
/// Score at or above which a product is rated `Moderate`.
pub const MODERATE_THRESHOLD: i32 = 50;

/// Three-tier safety classification derived from the total Ocean Score.
///
/// `Unknown` is reserved for products with no linked ingredients; it is never
/// produced for a computed score.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLevel {
    /// Total score 80-100
    Safe,
    /// Total score 50-79
    Moderate,
    /// Total score 1-49
    Harmful,
    /// No ingredients linked - no score can be computed
    Unknown,
}

impl SafetyLevel {
    /// Classifies a computed total score. Thresholds are fixed constants,
    /// inclusive on the lower bound of each tier.
    #[must_use]
    pub const fn for_score(total: i32) -> Self {
        if total >= SAFE_THRESHOLD {
            Self::Safe
        } else if total >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Harmful
        }
    }

    /// The string form used in API payloads and the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Harmful => "Harmful",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full output of one score computation.
///
/// The recalculation coordinator writes the five integer fields onto the
/// product row; the ingredient partitions and safety level are surfaced to
/// callers but not persisted on their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Aggregate Ocean Score: 1-100, or 0 when no ingredients are linked
    pub total: i32,
    /// Weighted biodegradability sub-score, rounded
    pub biodegradability: i32,
    /// Weighted coral-safety sub-score, rounded
    pub coral_safety: i32,
    /// Weighted fish-safety sub-score, rounded
    pub fish_safety: i32,
    /// Weighted coverage sub-score, rounded
    pub coverage: i32,
    /// Names of linked ingredients that are not reef-safe, in input order
    pub harmful_ingredients: Vec<String>,
    /// Names of linked reef-safe ingredients, in input order
    pub safe_ingredients: Vec<String>,
    /// Classification of `total`
    pub safety_level: SafetyLevel,
}

impl ScoreBreakdown {
    /// The breakdown for a product with no linked ingredients.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            total: 0,
            biodegradability: 0,
            coral_safety: 0,
            fish_safety: 0,
            coverage: 0,
            harmful_ingredients: Vec::new(),
            safe_ingredients: Vec::new(),
            safety_level: SafetyLevel::Unknown,
        }
    }
}

/// Computes the Ocean Score breakdown for one product.
///
/// For each category the arithmetic mean of that category's sub-score across
/// all linked ingredients is multiplied by the category's weight and clamped
/// to [0, 100]. The total is rounded once from the sum of the four
/// *unrounded* weighted values and clamped to [1, 100] - summing the already
/// rounded sub-scores would compound rounding error differently. The 1 floor
/// means a product with ingredients never scores an absolute zero; 0 is
/// reserved for the no-ingredients case.
#[must_use]
pub fn compute_score(
    ingredients: &[ingredient::Model],
    weights: &score_weights::Model,
) -> ScoreBreakdown {
    if ingredients.is_empty() {
        return ScoreBreakdown::unknown();
    }

    let biodegradability = weighted_category(
        ingredients,
        |i| i.biodegradability,
        weights.biodegradability_weight,
    );
    let coral_safety =
        weighted_category(ingredients, |i| i.coral_safety, weights.coral_safety_weight);
    let fish_safety =
        weighted_category(ingredients, |i| i.fish_safety, weights.fish_safety_weight);
    let coverage = weighted_category(ingredients, |i| i.coverage, weights.coverage_weight);

    // Round once from the unrounded sum, then clamp into 1-100
    #[allow(clippy::cast_possible_truncation)]
    let total = ((biodegradability + coral_safety + fish_safety + coverage).round() as i32)
        .clamp(1, 100);

    let harmful_ingredients = ingredients
        .iter()
        .filter(|i| !i.is_reef_safe)
        .map(|i| i.name.clone())
        .collect();
    let safe_ingredients = ingredients
        .iter()
        .filter(|i| i.is_reef_safe)
        .map(|i| i.name.clone())
        .collect();

    ScoreBreakdown {
        total,
        biodegradability: round_to_i32(biodegradability),
        coral_safety: round_to_i32(coral_safety),
        fish_safety: round_to_i32(fish_safety),
        coverage: round_to_i32(coverage),
        harmful_ingredients,
        safe_ingredients,
        safety_level: SafetyLevel::for_score(total),
    }
}

/// Mean of one category's sub-score across the ingredients, times the
/// category weight, clamped to [0, 100]. The clamp is defensive: sub-scores
/// are already bounded and weights are at most 1, but it guards against
/// future weight ranges above 1.
fn weighted_category(
    ingredients: &[ingredient::Model],
    sub_score: impl Fn(&ingredient::Model) -> i32,
    weight: f64,
) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let average = ingredients.iter().map(|i| f64::from(sub_score(i))).sum::<f64>()
        / ingredients.len() as f64;
    (average * weight).clamp(0.0, 100.0)
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}
