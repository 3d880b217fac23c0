//! Household configuration loading from config.toml
//!
//! The roster listed in config.toml seeds the member registry on startup. Members
//! that already exist are left alone, so the file can be edited and reloaded.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "MESS_LEDGER_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// General household settings
    #[serde(default)]
    pub household: HouseholdConfig,
    /// Members to seed
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

/// General household settings
#[derive(Debug, Deserialize)]
pub struct HouseholdConfig {
    /// Display name used in reports
    #[serde(default = "default_household_name")]
    pub name: String,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            name: default_household_name(),
        }
    }
}

fn default_household_name() -> String {
    "Mess".to_string()
}

/// Configuration for a single member
#[derive(Debug, Deserialize, Clone)]
pub struct MemberConfig {
    /// Member name, unique within the roster
    pub name: String,
}

/// Loads household configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Path of the config file: `MESS_LEDGER_CONFIG` or `./config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string())
}
