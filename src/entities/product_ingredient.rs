//! Product-ingredient link entity - The many-to-many association table.
//!
//! A row links one product to one ingredient. The link carries no ordering
//! significance; rows are owned by their product and replaced wholesale when
//! a product's ingredient set is updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product-ingredient association model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_ingredients")]
pub struct Model {
    /// Product side of the association
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    /// Ingredient side of the association
    #[sea_orm(primary_key, auto_increment = false)]
    pub ingredient_id: i64,
}

/// Defines relationships between the link table and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link row belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each link row belongs to one ingredient
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id"
    )]
    Ingredient,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
