/// Default-actor policy for unauthenticated mutations
pub mod actor;

/// Product seed catalog loading from config.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;
