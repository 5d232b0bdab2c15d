//! Score weights entity - The singleton weight configuration row.
//!
//! Exactly one live configuration exists at a time (row id 1, replace on
//! update, no history). The four weights are fractions that must sum to 1.0
//! within a 0.01 tolerance; validation happens in the weight-configuration
//! operations, not here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Row id of the single live weight configuration.
pub const SINGLETON_ID: i64 = 1;

/// Weight configuration database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "score_weights")]
pub struct Model {
    /// Always [`SINGLETON_ID`] for the live configuration
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Fractional weight applied to the biodegradability category
    pub biodegradability_weight: f64,
    /// Fractional weight applied to the coral-safety category
    pub coral_safety_weight: f64,
    /// Fractional weight applied to the fish-safety category
    pub fish_safety_weight: f64,
    /// Fractional weight applied to the coverage category
    pub coverage_weight: f64,
    /// When the configuration was last replaced
    pub updated_at: DateTime,
}

/// No relationships - the configuration is global state
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
