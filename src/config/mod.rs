/// Database configuration and connection management
pub mod database;

/// Household roster loading from config.toml
pub mod household;
