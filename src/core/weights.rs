//! Weight configuration - Storage and validation of the category weights.
//!
//! The four category weights are fractions that must sum to 1.0 (within a
//! 0.01 tolerance). Exactly one live configuration exists, stored as a
//! singleton row that is replaced in place on update. A successful update
//! immediately recalculates every product in the catalog: the persisted
//! scores are a materialized view over (ingredients, weights), and a weight
//! change invalidates all of them at once.

use crate::{
    core::recalc,
    entities::{ScoreWeights, score_weights},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// A candidate weight configuration, as submitted by the admin surface.
///
/// Values are fractions in the 0-1 range. The JSON shape matches the admin
/// weight-update payload.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightUpdate {
    /// Fractional weight for the biodegradability category
    pub biodegradability_weight: f64,
    /// Fractional weight for the coral-safety category
    pub coral_safety_weight: f64,
    /// Fractional weight for the fish-safety category
    pub fish_safety_weight: f64,
    /// Fractional weight for the coverage category
    pub coverage_weight: f64,
}

impl WeightUpdate {
    /// The built-in default configuration (also the first-boot seed).
    #[must_use]
    pub const fn defaults() -> Self {
        Self {
            biodegradability_weight: 0.3,
            coral_safety_weight: 0.3,
            fish_safety_weight: 0.25,
            coverage_weight: 0.15,
        }
    }

    /// Builds a candidate from the whole-number-percentage admin surface
    /// (values 0-100 summing to 100). The fraction-sum validation in
    /// [`update_weights`] still applies to the result.
    #[must_use]
    pub fn from_percentages(
        biodegradability: f64,
        coral_safety: f64,
        fish_safety: f64,
        coverage: f64,
    ) -> Self {
        Self {
            biodegradability_weight: biodegradability / 100.0,
            coral_safety_weight: coral_safety / 100.0,
            fish_safety_weight: fish_safety / 100.0,
            coverage_weight: coverage / 100.0,
        }
    }

    /// Sum of the four fractions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.biodegradability_weight
            + self.coral_safety_weight
            + self.fish_safety_weight
            + self.coverage_weight
    }

    /// Checks the sum-to-1.0 invariant.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWeights`] carrying the offending total when
    /// the sum deviates from 1.0 by more than the tolerance.
    pub fn validate(&self) -> Result<()> {
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights { total });
        }
        Ok(())
    }
}

/// Loads the live weight configuration.
///
/// Falls back to the built-in defaults when the singleton row has not been
/// seeded yet, so callers always get a usable configuration.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_current_weights<C>(db: &C) -> Result<score_weights::Model>
where
    C: ConnectionTrait,
{
    let row = ScoreWeights::find_by_id(score_weights::SINGLETON_ID)
        .one(db)
        .await?;

    Ok(row.unwrap_or_else(|| {
        let defaults = WeightUpdate::defaults();
        score_weights::Model {
            id: score_weights::SINGLETON_ID,
            biodegradability_weight: defaults.biodegradability_weight,
            coral_safety_weight: defaults.coral_safety_weight,
            fish_safety_weight: defaults.fish_safety_weight,
            coverage_weight: defaults.coverage_weight,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }))
}

/// Validates and persists a new weight configuration, then recalculates
/// every product score in the catalog.
///
/// On validation failure nothing is persisted and no recalculation runs; the
/// prior configuration and all prior scores stay untouched. On success the
/// singleton row is replaced (not appended) and the full-catalog
/// recalculation report is logged.
///
/// # Errors
/// Returns [`Error::InvalidWeights`] if the candidate fractions do not sum
/// to 1.0 within tolerance, or a database error from persistence or
/// recalculation.
pub async fn update_weights(
    db: &DatabaseConnection,
    candidate: WeightUpdate,
) -> Result<score_weights::Model> {
    candidate.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let existing = ScoreWeights::find_by_id(score_weights::SINGLETON_ID)
        .one(db)
        .await?;

    let stored = match existing {
        Some(row) => {
            let mut active: score_weights::ActiveModel = row.into();
            active.biodegradability_weight = Set(candidate.biodegradability_weight);
            active.coral_safety_weight = Set(candidate.coral_safety_weight);
            active.fish_safety_weight = Set(candidate.fish_safety_weight);
            active.coverage_weight = Set(candidate.coverage_weight);
            active.updated_at = Set(now);
            active.update(db).await?
        }
        None => {
            let active = score_weights::ActiveModel {
                id: Set(score_weights::SINGLETON_ID),
                biodegradability_weight: Set(candidate.biodegradability_weight),
                coral_safety_weight: Set(candidate.coral_safety_weight),
                fish_safety_weight: Set(candidate.fish_safety_weight),
                coverage_weight: Set(candidate.coverage_weight),
                updated_at: Set(now),
            };
            active.insert(db).await?
        }
    };

    // Stale cached scores must never survive a weight change
    let report = recalc::recalculate_all(db).await?;
    info!(
        recalculated = report.recalculated,
        failed = report.failed,
        "Weight configuration updated, catalog rescored"
    );

    Ok(stored)
}

/// Seeds the singleton weight row on first boot if it is absent.
///
/// Does nothing when a configuration already exists, so re-running the boot
/// sequence never clobbers admin-tuned weights.
///
/// # Errors
/// Returns [`Error::InvalidWeights`] for invalid seed values, or a database
/// error.
pub async fn ensure_default_weights(
    db: &DatabaseConnection,
    seed: WeightUpdate,
) -> Result<score_weights::Model> {
    seed.validate()?;

    if let Some(existing) = ScoreWeights::find_by_id(score_weights::SINGLETON_ID)
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let active = score_weights::ActiveModel {
        id: Set(score_weights::SINGLETON_ID),
        biodegradability_weight: Set(seed.biodegradability_weight),
        coral_safety_weight: Set(seed.coral_safety_weight),
        fish_safety_weight: Set(seed.fish_safety_weight),
        coverage_weight: Set(seed.coverage_weight),
        updated_at: Set(chrono::Utc::now().naive_utc()),
    };
    active.insert(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_validate_accepts_sum_within_tolerance() {
        assert!(WeightUpdate::defaults().validate().is_ok());

        let nearly_one = WeightUpdate {
            biodegradability_weight: 0.25,
            coral_safety_weight: 0.25,
            fish_safety_weight: 0.25,
            coverage_weight: 0.258,
        };
        assert!(nearly_one.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sum_with_total() {
        let candidate = WeightUpdate {
            biodegradability_weight: 0.3,
            coral_safety_weight: 0.3,
            fish_safety_weight: 0.3,
            coverage_weight: 0.3,
        };
        let err = candidate.validate().unwrap_err();
        match err {
            Error::InvalidWeights { total } => assert!((total - 1.2).abs() < 1e-9),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_percentages() {
        let candidate = WeightUpdate::from_percentages(30.0, 30.0, 25.0, 15.0);
        assert_eq!(candidate, WeightUpdate::defaults());
        assert!(candidate.validate().is_ok());
    }

    #[tokio::test]
    async fn test_get_current_weights_falls_back_to_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        // No row seeded - defaults are returned
        let weights = get_current_weights(&db).await?;
        assert_eq!(weights.biodegradability_weight, 0.3);
        assert_eq!(weights.coral_safety_weight, 0.3);
        assert_eq!(weights.fish_safety_weight, 0.25);
        assert_eq!(weights.coverage_weight, 0.15);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_weights_rejects_and_preserves_stored_config() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_default_weights(&db, WeightUpdate::defaults()).await?;

        let bad = WeightUpdate {
            biodegradability_weight: 0.3,
            coral_safety_weight: 0.3,
            fish_safety_weight: 0.3,
            coverage_weight: 0.3,
        };
        let result = update_weights(&db, bad).await;
        assert!(matches!(result, Err(Error::InvalidWeights { .. })));

        // Stored configuration is untouched
        let stored = get_current_weights(&db).await?;
        assert_eq!(stored.biodegradability_weight, 0.3);
        assert_eq!(stored.coverage_weight, 0.15);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_weights_replaces_singleton() -> Result<()> {
        let db = setup_test_db().await?;
        ensure_default_weights(&db, WeightUpdate::defaults()).await?;

        let candidate = WeightUpdate {
            biodegradability_weight: 0.4,
            coral_safety_weight: 0.3,
            fish_safety_weight: 0.2,
            coverage_weight: 0.1,
        };
        let stored = update_weights(&db, candidate).await?;
        assert_eq!(stored.id, score_weights::SINGLETON_ID);
        assert_eq!(stored.biodegradability_weight, 0.4);

        // Replace, not append: still exactly one row
        let all = ScoreWeights::find().all(&db).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].biodegradability_weight, 0.4);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_weights_inserts_when_unseeded() -> Result<()> {
        let db = setup_test_db().await?;

        let stored = update_weights(&db, WeightUpdate::defaults()).await?;
        assert_eq!(stored.id, score_weights::SINGLETON_ID);

        let all = ScoreWeights::find().all(&db).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_weights_rescores_whole_catalog() -> Result<()> {
        use crate::{
            core::score,
            entities::Product,
            test_utils::{create_custom_ingredient, create_test_product},
        };

        let db = setup_test_db().await?;
        let ingredient =
            create_custom_ingredient(&db, "Homosalate", false, [80, 60, 40, 20]).await?;
        let product = create_test_product(&db, "Spray Sunscreen", &[ingredient.id]).await?;

        // Defaults: 80*0.3 + 60*0.3 + 40*0.25 + 20*0.15 = 55
        assert_eq!(product.ocean_score, 55);

        let new_weights = WeightUpdate {
            biodegradability_weight: 0.1,
            coral_safety_weight: 0.2,
            fish_safety_weight: 0.3,
            coverage_weight: 0.4,
        };
        let stored_config = update_weights(&db, new_weights).await?;

        // No stale score survives: the persisted value matches a fresh
        // computation under the new configuration
        let stored = Product::find_by_id(product.id).one(&db).await?.unwrap();
        let expected = score::compute_score(std::slice::from_ref(&ingredient), &stored_config);
        assert_eq!(stored.ocean_score, expected.total);
        assert_eq!(stored.ocean_score, 40); // 8 + 12 + 12 + 8

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_default_weights_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_default_weights(&db, WeightUpdate::defaults()).await?;

        // Admin tunes the configuration afterwards
        let tuned = WeightUpdate {
            biodegradability_weight: 0.25,
            coral_safety_weight: 0.25,
            fish_safety_weight: 0.25,
            coverage_weight: 0.25,
        };
        update_weights(&db, tuned).await?;

        // Re-running the seed does not clobber the tuned values
        let after = ensure_default_weights(&db, WeightUpdate::defaults()).await?;
        assert_eq!(after.biodegradability_weight, 0.25);

        Ok(())
    }
}
