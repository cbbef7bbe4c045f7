/// Database configuration and connection management
pub mod database;

/// People and household seed configuration from config.toml
pub mod households;
