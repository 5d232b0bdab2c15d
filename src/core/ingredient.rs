//! Ingredient business logic - Admin-side ingredient catalog operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! ingredients. All four environmental sub-scores are validated into the
//! 0-100 range at this boundary, so the calculator can treat stored
//! ingredients as well-formed. Because persisted product scores are derived
//! from ingredient data, updating an ingredient rescores every product that
//! links to it, and deleting an ingredient is refused while links remain.

use crate::{
    core::{recalc, weights},
    entities::{Ingredient, ProductIngredient, ingredient, product_ingredient},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Retrieves all ingredients, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_ingredients(db: &DatabaseConnection) -> Result<Vec<ingredient::Model>> {
    Ingredient::find()
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific ingredient by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_ingredient_by_id(
    db: &DatabaseConnection,
    ingredient_id: i64,
) -> Result<Option<ingredient::Model>> {
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an ingredient by its exact (case-sensitive) name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_ingredient_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<ingredient::Model>> {
    Ingredient::find()
        .filter(ingredient::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new ingredient, validating the name and sub-score ranges.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - Any sub-score falls outside [0, 100]
/// - The database insert fails (including a duplicate name)
#[allow(clippy::too_many_arguments)]
pub async fn create_ingredient(
    db: &DatabaseConnection,
    name: String,
    is_reef_safe: bool,
    biodegradability: i32,
    coral_safety: i32,
    fish_safety: i32,
    coverage: i32,
    description: Option<String>,
) -> Result<ingredient::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Ingredient name cannot be empty".to_string(),
        });
    }
    validate_sub_scores(&[biodegradability, coral_safety, fish_safety, coverage])?;

    let model = ingredient::ActiveModel {
        name: Set(name.trim().to_string()),
        is_reef_safe: Set(is_reef_safe),
        biodegradability: Set(biodegradability),
        coral_safety: Set(coral_safety),
        fish_safety: Set(fish_safety),
        coverage: Set(coverage),
        description: Set(description),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Updates an ingredient and rescores every product linked to it.
///
/// Stored product scores are a materialized view over ingredient data, so an
/// edit here would leave them stale without the rescoring step. The update
/// and the rescoring commit together in one database transaction.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or any sub-score falls outside [0, 100]
/// - The ingredient does not exist
/// - The database transaction fails
#[allow(clippy::too_many_arguments)]
pub async fn update_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i64,
    name: String,
    is_reef_safe: bool,
    biodegradability: i32,
    coral_safety: i32,
    fish_safety: i32,
    coverage: i32,
    description: Option<String>,
) -> Result<ingredient::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Ingredient name cannot be empty".to_string(),
        });
    }
    validate_sub_scores(&[biodegradability, coral_safety, fish_safety, coverage])?;

    let txn = db.begin().await?;

    let mut model: ingredient::ActiveModel = Ingredient::find_by_id(ingredient_id)
        .one(&txn)
        .await?
        .ok_or(Error::IngredientNotFound { id: ingredient_id })?
        .into();

    model.name = Set(name.trim().to_string());
    model.is_reef_safe = Set(is_reef_safe);
    model.biodegradability = Set(biodegradability);
    model.coral_safety = Set(coral_safety);
    model.fish_safety = Set(fish_safety);
    model.coverage = Set(coverage);
    model.description = Set(description);
    let updated = model.update(&txn).await?;

    // Rescore the products that derive from this ingredient
    let linked_product_ids: Vec<i64> = ProductIngredient::find()
        .filter(product_ingredient::Column::IngredientId.eq(ingredient_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();

    let current = weights::get_current_weights(&txn).await?;
    for product_id in linked_product_ids {
        recalc::recalculate_product_with_weights(&txn, product_id, &current).await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Deletes an ingredient that no product links to.
///
/// Deletion is refused while link rows remain - removing a linked ingredient
/// would silently change product scores. Unlink it from every product first.
///
/// # Errors
/// Returns an error if:
/// - The ingredient does not exist
/// - Products still link to the ingredient
/// - The database delete fails
pub async fn delete_ingredient(db: &DatabaseConnection, ingredient_id: i64) -> Result<()> {
    let model = Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or(Error::IngredientNotFound { id: ingredient_id })?;

    let product_count = ProductIngredient::find()
        .filter(product_ingredient::Column::IngredientId.eq(ingredient_id))
        .count(db)
        .await?;
    if product_count > 0 {
        return Err(Error::IngredientInUse {
            id: ingredient_id,
            product_count,
        });
    }

    model.delete(db).await?;
    Ok(())
}

fn validate_sub_scores(scores: &[i32]) -> Result<()> {
    for &value in scores {
        if !(0..=100).contains(&value) {
            return Err(Error::InvalidSubScore { value });
        }
    }
    Ok(())
}
