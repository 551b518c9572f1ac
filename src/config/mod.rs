/// Database configuration and connection management
pub mod database;

/// Seed plan configuration from config.toml
pub mod plans;
