//! Default scoring-weight configuration loading from config.toml
//!
//! Deployments can override the built-in seed weights by providing a
//! `[weights]` table in config.toml. These values seed the weight singleton
//! on first boot only; after that the admin weight-update operation owns the
//! live configuration.

use crate::core::weights::WeightUpdate;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Seed weight fractions for first boot
    pub weights: WeightUpdate,
}

/// Loads the weight configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the seed weights from the default location (./config.toml),
/// falling back to the built-in defaults when no file is present.
///
/// A present-but-malformed file is an error rather than a silent fallback.
///
/// # Errors
/// Returns an error if config.toml exists but cannot be parsed.
pub fn load_seed_weights() -> Result<WeightUpdate> {
    let path = Path::new("config.toml");
    if !path.exists() {
        return Ok(WeightUpdate::defaults());
    }
    load_config(path).map(|config| config.weights)
}
