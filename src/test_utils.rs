//! Shared test utilities for the Ocean Score engine.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{ingredient, product},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests. The weight
/// singleton is left unseeded so tests exercise the default fallback unless
/// they seed it themselves.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test ingredient with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Ingredient name
///
/// # Defaults
/// * `is_reef_safe`: true
/// * all four sub-scores: 80
/// * `description`: None
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::ingredient::Model> {
    create_custom_ingredient(db, name, true, [80, 80, 80, 80]).await
}

/// Creates a test ingredient with custom reef-safety and sub-scores
/// (biodegradability, coral safety, fish safety, coverage).
pub async fn create_custom_ingredient(
    db: &DatabaseConnection,
    name: &str,
    is_reef_safe: bool,
    scores: [i32; 4],
) -> Result<entities::ingredient::Model> {
    ingredient::create_ingredient(
        db,
        name.to_string(),
        is_reef_safe,
        scores[0],
        scores[1],
        scores[2],
        scores[3],
        None,
    )
    .await
}

/// Builds a [`product::NewProduct`] payload with placeholder brand/category.
#[must_use]
pub fn new_product(name: &str, ingredient_ids: &[i64]) -> product::NewProduct {
    product::NewProduct {
        name: name.to_string(),
        brand: "Test Brand".to_string(),
        category: "sunscreen".to_string(),
        description: None,
        image_url: None,
        external_link: None,
        ingredient_ids: ingredient_ids.to_vec(),
    }
}

/// Creates a test product linked to the given ingredients. The product is
/// scored against the current weight configuration as part of creation.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    ingredient_ids: &[i64],
) -> Result<entities::product::Model> {
    product::create_product(db, new_product(name, ingredient_ids)).await
}
