//! Core business logic - framework-agnostic scoring and catalog operations.
//!
//! The calculator in [`score`] is pure; everything else talks to the
//! database through SeaORM and returns crate [`Result`](crate::errors::Result)s.

/// Ingredient CRUD with sub-score validation
pub mod ingredient;
/// Product CRUD owning ingredient links and transactional rescoring
pub mod product;
/// Recalculation coordinator for one product or the whole catalog
pub mod recalc;
/// The pure Ocean Score calculator
pub mod score;
/// Weight configuration storage, validation, and seeding
pub mod weights;
