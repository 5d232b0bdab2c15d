//! Unified error types for the Ocean Score engine.
//!
//! All fallible operations in the crate return [`Result`], built on a single
//! [`Error`] enum. Validation failures carry the offending value so callers
//! can surface it verbatim.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A weight update whose four fractions do not sum to 1.0 (tolerance 0.01)
    #[error("Ocean score weights must sum to 1.0, got {total}")]
    InvalidWeights {
        /// The sum of the rejected candidate weights
        total: f64,
    },

    /// An ingredient sub-score outside the [0, 100] range
    #[error("Ingredient sub-score {value} is outside the valid range 0-100")]
    InvalidSubScore {
        /// The rejected sub-score value
        value: i32,
    },

    /// A product lookup by id found nothing
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The id that was requested
        id: i64,
    },

    /// An ingredient lookup by id found nothing
    #[error("Ingredient not found: {id}")]
    IngredientNotFound {
        /// The id that was requested
        id: i64,
    },

    /// An ingredient cannot be deleted while products still reference it
    #[error("Ingredient {id} is still linked to {product_count} product(s)")]
    IngredientInUse {
        /// The ingredient that was to be deleted
        id: i64,
        /// How many products still link to it
        product_count: u64,
    },

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
