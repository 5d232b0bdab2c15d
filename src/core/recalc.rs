//! Recalculation coordinator - Keeps persisted product scores consistent.
//!
//! Re-derives and persists the cached score columns for one product or for
//! the whole catalog. A full-catalog pass reads the weight configuration
//! once at the start and uses that snapshot for every product, so a single
//! pass stays internally consistent even if a concurrent weight update lands
//! mid-batch. There is no guard between concurrent passes themselves: the
//! weight singleton is last-writer-wins, and a pass triggered by an older
//! update may be overwritten by one triggered by a newer update. That weak
//! window is accepted, not a bug to fix here.

use crate::{
    core::{
        score::{self, ScoreBreakdown},
        weights,
    },
    entities::{Ingredient, Product, ingredient, product, score_weights},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, warn};

/// Outcome of a full-catalog recalculation pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcReport {
    /// Products whose scores were recomputed and persisted
    pub recalculated: usize,
    /// Products that disappeared between the id sweep and their turn
    pub skipped: usize,
    /// Products whose load or write failed (logged, batch continued)
    pub failed: usize,
}

/// Recalculates one product's score using the current weight configuration.
///
/// Loads the weights, then delegates to
/// [`recalculate_product_with_weights`].
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or a
/// database error from the load or write.
pub async fn recalculate_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<ScoreBreakdown> {
    let current = weights::get_current_weights(db).await?;
    recalculate_product_with_weights(db, product_id, &current).await
}

/// Recalculates one product's score against an explicit weight snapshot.
///
/// Loads the product's linked ingredients, runs the calculator, and writes
/// all five derived columns plus the updated timestamp in a single update
/// statement - a half-updated score is never observable. Generic over
/// [`ConnectionTrait`] so product create/update can run the recalculation
/// inside their own database transaction.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or a
/// database error from the load or write.
pub async fn recalculate_product_with_weights<C>(
    db: &C,
    product_id: i64,
    current: &score_weights::Model,
) -> Result<ScoreBreakdown>
where
    C: ConnectionTrait,
{
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let ingredients = product
        .find_related(Ingredient)
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?;

    let breakdown = score::compute_score(&ingredients, current);

    let mut active: product::ActiveModel = product.into();
    active.ocean_score = Set(breakdown.total);
    active.biodegradability_score = Set(breakdown.biodegradability);
    active.coral_safety_score = Set(breakdown.coral_safety);
    active.fish_safety_score = Set(breakdown.fish_safety);
    active.coverage_score = Set(breakdown.coverage);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await?;

    debug!(
        product_id,
        total = breakdown.total,
        level = %breakdown.safety_level,
        "Product score recalculated"
    );

    Ok(breakdown)
}

/// Recalculates every product in the catalog, in id order.
///
/// The weight configuration is read once at the start of the pass. The batch
/// is best-effort: a product that vanished mid-pass is skipped, and a storage
/// error on one product is logged and counted without aborting the rest -
/// one bad row must not block a whole-catalog weight-change rollout. The
/// report says how many products succeeded versus failed.
///
/// # Errors
/// Returns a database error only if the initial id sweep or weight load
/// fails; per-product failures are folded into the report.
pub async fn recalculate_all(db: &DatabaseConnection) -> Result<RecalcReport> {
    // Snapshot the weights once so the whole pass uses one configuration
    let current = weights::get_current_weights(db).await?;

    // Sweep the ids only; each product row is loaded fresh per iteration
    let product_ids: Vec<i64> = Product::find()
        .select_only()
        .column(product::Column::Id)
        .order_by_asc(product::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let mut report = RecalcReport::default();
    for product_id in product_ids {
        match recalculate_product_with_weights(db, product_id, &current).await {
            Ok(_) => report.recalculated += 1,
            Err(Error::ProductNotFound { id }) => {
                warn!(product_id = id, "Product vanished during recalculation, skipping");
                report.skipped += 1;
            }
            Err(error) => {
                warn!(product_id, %error, "Failed to recalculate product, continuing batch");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
