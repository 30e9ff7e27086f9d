//! Product seed catalog loading from config.toml
//!
//! This module provides functionality to load an initial product catalog from
//! a TOML configuration file. The products defined in config.toml are used to
//! seed the database on first run so the point-of-sale has something to sell.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of product configurations to seed
    pub products: Vec<ProductConfig>,
}

/// Configuration for a single catalog product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Name of the product
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Unit price
    pub price: f64,
    /// Initial stock level
    pub stock: i32,
}

/// Loads the product catalog from a TOML file
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

/// Loads the product catalog from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
