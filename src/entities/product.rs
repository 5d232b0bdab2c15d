//! Product entity - Represents a catalog product with its cached Ocean Score.
//!
//! The five score columns are derived values: they must always equal the
//! calculator's output for the product's current ingredients and the current
//! weight configuration as of the last recalculation. Read paths surface
//! these columns directly and never recompute on the fly, so every mutation
//! of the ingredient links or the global weights must go through the
//! recalculation coordinator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Reef Repair Sunscreen SPF 50")
    pub name: String,
    /// Brand that sells the product
    pub brand: String,
    /// Catalog category (e.g., "sunscreen", "shampoo")
    pub category: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional product image URL
    pub image_url: Option<String>,
    /// Optional link to the product's external page
    pub external_link: Option<String>,
    /// Cached aggregate Ocean Score, 1-100 (0 means no ingredients/unknown)
    pub ocean_score: i32,
    /// Cached weighted biodegradability sub-score
    pub biodegradability_score: i32,
    /// Cached weighted coral-safety sub-score
    pub coral_safety_score: i32,
    /// Cached weighted fish-safety sub-score
    pub fish_safety_score: i32,
    /// Cached weighted coverage sub-score
    pub coverage_score: i32,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product (or its cached score) was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product owns many ingredient link rows
    #[sea_orm(has_many = "super::product_ingredient::Entity")]
    ProductIngredients,
}

impl Related<super::product_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductIngredients.def()
    }
}

// Many-to-many to ingredients through the link table
impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_ingredient::Relation::Ingredient.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_ingredient::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
