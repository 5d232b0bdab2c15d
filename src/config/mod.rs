/// Database configuration and connection management
pub mod database;

/// Default scoring-weight configuration loading from config.toml
pub mod weights;
