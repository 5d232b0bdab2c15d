//! Ingredient entity - Represents a single personal-care product ingredient.
//!
//! Each ingredient carries a reef-safe flag and four environmental sub-scores
//! (biodegradability, coral safety, fish safety, coverage), each an integer
//! in 0-100. Ingredients are created and edited by admins and are read-only
//! inputs to the score calculator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    /// Unique identifier for the ingredient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the ingredient (e.g., "Zinc Oxide"), unique and case-sensitive
    #[sea_orm(unique)]
    pub name: String,
    /// Whether this ingredient is not known to harm coral reefs
    pub is_reef_safe: bool,
    /// How readily the ingredient breaks down in the environment (0-100)
    pub biodegradability: i32,
    /// How safe the ingredient is for coral (0-100)
    pub coral_safety: i32,
    /// How safe the ingredient is for fish (0-100)
    pub fish_safety: i32,
    /// Coverage/effectiveness sub-score (0-100)
    pub coverage: i32,
    /// Optional free-text description shown to admins and consumers
    pub description: Option<String>,
    /// When the ingredient was created
    pub created_at: DateTime,
}

/// Defines relationships between Ingredient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One ingredient appears in many product link rows
    #[sea_orm(has_many = "super::product_ingredient::Entity")]
    ProductIngredients,
}

impl Related<super::product_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductIngredients.def()
    }
}

// Many-to-many to products through the link table
impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_ingredient::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_ingredient::Relation::Ingredient.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
