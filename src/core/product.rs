//! Product business logic - Catalog operations that own the ingredient links.
//!
//! Creating or updating a product replaces its ingredient associations and
//! recalculates its cached score inside one database transaction: either the
//! product and its correct score become visible together, or neither does.
//! A product is never durably visible with a zero score and a non-empty
//! ingredient set. Read paths surface the persisted score columns only and
//! never invoke the calculator.

use crate::{
    core::{recalc, weights},
    entities::{Ingredient, Product, ProductIngredient, ingredient, product, product_ingredient},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};

/// Descriptive fields and ingredient links for a product create or update.
///
/// Matches the JSON shape of the admin product payload. The same shape
/// serves both create and full-replace update, like the surrounding API.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Brand that sells the product
    pub brand: String,
    /// Catalog category
    pub category: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional product image URL
    pub image_url: Option<String>,
    /// Optional external product page link
    pub external_link: Option<String>,
    /// Ids of the ingredients to link (unordered, may be empty)
    pub ingredient_ids: Vec<i64>,
}

/// Search filter for the product listing, applied to persisted columns only.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct ProductSearch {
    /// Substring matched against product name or brand
    pub term: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Minimum persisted Ocean Score (inclusive)
    pub min_score: Option<i32>,
    /// Maximum persisted Ocean Score (inclusive)
    pub max_score: Option<i32>,
}

/// Retrieves every product, best score first, then alphabetically.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_desc(product::Column::OceanScore)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the ingredients currently linked to a product.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or a
/// database error.
pub async fn get_product_ingredients(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<ingredient::Model>> {
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    product
        .find_related(Ingredient)
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Searches the catalog against persisted columns, best score first.
///
/// The score range filters read the cached `ocean_score` column - search
/// never recomputes scores.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_products(
    db: &DatabaseConnection,
    search: &ProductSearch,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();

    if let Some(term) = search.term.as_deref().filter(|t| !t.trim().is_empty()) {
        query = query.filter(
            Condition::any()
                .add(product::Column::Name.contains(term))
                .add(product::Column::Brand.contains(term)),
        );
    }
    if let Some(category) = search.category.as_deref() {
        query = query.filter(product::Column::Category.eq(category));
    }
    if let Some(min_score) = search.min_score {
        query = query.filter(product::Column::OceanScore.gte(min_score));
    }
    if let Some(max_score) = search.max_score {
        query = query.filter(product::Column::OceanScore.lte(max_score));
    }

    query
        .order_by_desc(product::Column::OceanScore)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a product, links its ingredients, and scores it, atomically.
///
/// The row is inserted with zero score placeholders, the links are inserted,
/// and the recalculation runs against the current weights - all inside one
/// transaction, so no caller ever observes the placeholder state.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - Any referenced ingredient does not exist
/// - The database transaction fails
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<product::Model> {
    // Validate inputs
    if new_product.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    ensure_ingredients_exist(&txn, &new_product.ingredient_ids).await?;

    let now = chrono::Utc::now().naive_utc();
    let inserted = product::ActiveModel {
        name: Set(new_product.name.trim().to_string()),
        brand: Set(new_product.brand),
        category: Set(new_product.category),
        description: Set(new_product.description),
        image_url: Set(new_product.image_url),
        external_link: Set(new_product.external_link),
        // Placeholders until the recalculation below runs
        ocean_score: Set(0),
        biodegradability_score: Set(0),
        coral_safety_score: Set(0),
        fish_safety_score: Set(0),
        coverage_score: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let inserted = inserted.insert(&txn).await?;

    link_ingredients(&txn, inserted.id, &new_product.ingredient_ids).await?;

    let current = weights::get_current_weights(&txn).await?;
    recalc::recalculate_product_with_weights(&txn, inserted.id, &current).await?;

    let created = Product::find_by_id(inserted.id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: inserted.id })?;

    txn.commit().await?;

    Ok(created)
}

/// Replaces a product's descriptive fields and ingredient links, rescoring
/// it in the same transaction.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The product or any referenced ingredient does not exist
/// - The database transaction fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: NewProduct,
) -> Result<product::Model> {
    // Validate inputs
    if changes.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    ensure_ingredients_exist(&txn, &changes.ingredient_ids).await?;

    model.name = Set(changes.name.trim().to_string());
    model.brand = Set(changes.brand);
    model.category = Set(changes.category);
    model.description = Set(changes.description);
    model.image_url = Set(changes.image_url);
    model.external_link = Set(changes.external_link);
    model.updated_at = Set(chrono::Utc::now().naive_utc());
    model.update(&txn).await?;

    // Replace the ingredient links wholesale
    ProductIngredient::delete_many()
        .filter(product_ingredient::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    link_ingredients(&txn, product_id, &changes.ingredient_ids).await?;

    let current = weights::get_current_weights(&txn).await?;
    recalc::recalculate_product_with_weights(&txn, product_id, &current).await?;

    let updated = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    Ok(updated)
}

/// Deletes a product and its ingredient associations in one transaction.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist, or a
/// database error.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let model = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    ProductIngredient::delete_many()
        .filter(product_ingredient::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    model.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Verifies every referenced ingredient id exists before linking.
async fn ensure_ingredients_exist<C>(db: &C, ingredient_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    for &ingredient_id in ingredient_ids {
        Ingredient::find_by_id(ingredient_id)
            .one(db)
            .await?
            .ok_or(Error::IngredientNotFound { id: ingredient_id })?;
    }
    Ok(())
}

async fn link_ingredients<C>(db: &C, product_id: i64, ingredient_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    for &ingredient_id in ingredient_ids {
        let link = product_ingredient::ActiveModel {
            product_id: Set(product_id),
            ingredient_id: Set(ingredient_id),
        };
        link.insert(db).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_custom_ingredient, create_test_ingredient, new_product, setup_test_db,
    };

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(&db, new_product("", &[])).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = create_product(&db, new_product("   ", &[])).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_scores_before_commit() -> Result<()> {
        let db = setup_test_db().await?;
        let ingredient =
            create_custom_ingredient(&db, "Zinc Oxide", true, [100, 100, 100, 80]).await?;

        let product =
            create_product(&db, new_product("Mineral Sunscreen", &[ingredient.id])).await?;

        // The returned (and persisted) model already carries the real score
        assert_eq!(product.ocean_score, 97);
        assert_eq!(product.biodegradability_score, 30);
        assert_eq!(product.coverage_score, 12);

        let stored = Product::find_by_id(product.id).one(&db).await?.unwrap();
        assert_eq!(stored.ocean_score, 97);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_without_ingredients_is_unknown() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, new_product("Mystery Soap", &[])).await?;
        assert_eq!(product.ocean_score, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_ingredient_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(&db, new_product("Ghost Product", &[999])).await;
        assert!(matches!(result, Err(Error::IngredientNotFound { id: 999 })));

        // Nothing persisted
        assert!(Product::find().all(&db).await?.is_empty());
        assert!(ProductIngredient::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_replaces_links_and_rescores() -> Result<()> {
        let db = setup_test_db().await?;
        let good = create_custom_ingredient(&db, "Zinc Oxide", true, [100, 100, 100, 80]).await?;
        let bad = create_custom_ingredient(&db, "Oxybenzone", false, [20, 5, 10, 85]).await?;

        let product = create_product(&db, new_product("Sunscreen", &[good.id])).await?;
        assert_eq!(product.ocean_score, 97);

        let mut changes = new_product("Sunscreen Reformulated", &[bad.id]);
        changes.brand = "New Brand".to_string();
        let updated = update_product(&db, product.id, changes).await?;

        assert_eq!(updated.name, "Sunscreen Reformulated");
        assert_eq!(updated.brand, "New Brand");
        assert_eq!(updated.ocean_score, 23);

        let links = ProductIngredient::find()
            .filter(product_ingredient::Column::ProductId.eq(product.id))
            .all(&db)
            .await?;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].ingredient_id, bad.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_product(&db, 999, new_product("Nothing", &[])).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_links() -> Result<()> {
        let db = setup_test_db().await?;
        let ingredient = create_test_ingredient(&db, "Aloe Vera").await?;
        let product = create_product(&db, new_product("Gel", &[ingredient.id])).await?;

        delete_product(&db, product.id).await?;

        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert!(ProductIngredient::find().all(&db).await?.is_empty());
        // The ingredient itself survives
        assert_eq!(Ingredient::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_products_ordered_by_score() -> Result<()> {
        let db = setup_test_db().await?;
        let good = create_custom_ingredient(&db, "Zinc Oxide", true, [100, 100, 100, 80]).await?;
        let bad = create_custom_ingredient(&db, "Oxybenzone", false, [20, 5, 10, 85]).await?;

        create_product(&db, new_product("Harsh Lotion", &[bad.id])).await?;
        create_product(&db, new_product("Gentle Sunscreen", &[good.id])).await?;

        let all = get_all_products(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Gentle Sunscreen");
        assert_eq!(all[1].name, "Harsh Lotion");

        Ok(())
    }

    #[tokio::test]
    async fn test_search_products_filters_on_persisted_score() -> Result<()> {
        let db = setup_test_db().await?;
        let good = create_custom_ingredient(&db, "Zinc Oxide", true, [100, 100, 100, 80]).await?;
        let bad = create_custom_ingredient(&db, "Oxybenzone", false, [20, 5, 10, 85]).await?;

        create_product(&db, new_product("Gentle Sunscreen", &[good.id])).await?;
        create_product(&db, new_product("Harsh Lotion", &[bad.id])).await?;

        let safe_only = search_products(
            &db,
            &ProductSearch {
                min_score: Some(80),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(safe_only.len(), 1);
        assert_eq!(safe_only[0].name, "Gentle Sunscreen");

        let by_term = search_products(
            &db,
            &ProductSearch {
                term: Some("Lotion".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_term.len(), 1);
        assert_eq!(by_term[0].name, "Harsh Lotion");

        let by_category = search_products(
            &db,
            &ProductSearch {
                category: Some("unlisted".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert!(by_category.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_ingredients() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_ingredient(&db, "Aloe Vera").await?;
        let second = create_test_ingredient(&db, "Shea Butter").await?;
        let product = create_product(&db, new_product("Lotion", &[first.id, second.id])).await?;

        let ingredients = get_product_ingredients(&db, product.id).await?;
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].id, first.id);
        assert_eq!(ingredients[1].id, second.id);

        let result = get_product_ingredients(&db, 999).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 999 })));

        Ok(())
    }
}
