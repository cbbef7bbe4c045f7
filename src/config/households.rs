//! Household seed configuration loading from config.toml
//!
//! People and households listed in config.toml are created on startup when they
//! are missing. Households reference their members by account, so the file can be
//! edited by hand without knowing database ids.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "EXPENSE_BUDDY_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// People to seed
    #[serde(default)]
    pub people: Vec<PersonConfig>,
    /// Households to seed
    #[serde(default)]
    pub households: Vec<HouseholdConfig>,
}

/// Configuration for a single person
#[derive(Debug, Deserialize, Clone)]
pub struct PersonConfig {
    /// Display name
    pub name: String,
    /// External account reference, unique across people
    pub account: String,
}

/// Configuration for a single household
#[derive(Debug, Deserialize, Clone)]
pub struct HouseholdConfig {
    /// Household name, used to find an existing household on re-runs
    pub name: String,
    /// Account references of the members
    #[serde(default)]
    pub members: Vec<String>,
}

impl Config {
    /// Checks that every household member refers to a configured person.
    pub fn validate(&self) -> Result<()> {
        for household in &self.households {
            if household.name.trim().is_empty() {
                return Err(Error::Config {
                    message: "Household name cannot be empty".to_string(),
                });
            }
            for account in &household.members {
                if !self.people.iter().any(|p| &p.account == account) {
                    return Err(Error::Config {
                        message: format!(
                            "Household '{}' lists unknown member account '{account}'",
                            household.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Loads the seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A household lists a member account that is not configured
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses and validates TOML seed configuration.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads the seed configuration from `EXPENSE_BUDDY_CONFIG`, or ./config.toml.
///
/// A missing file is not an error: it yields an empty configuration.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!("No config file at {path}, starting without seed data");
        return Ok(Config::default());
    }
    load_config(path)
}
