//! Database configuration module for `clubbooks`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{
    BudgetEntry, GameEvent, Member, Product, Sale, SaleItem, Trip, TripEntry,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/clubbooks.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. It creates tables for both ledgers, trips, the sale tables, and the
/// collaborator tables (products, game events, members).
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let member_table = schema.create_table_from_entity(Member);
    let game_event_table = schema.create_table_from_entity(GameEvent);
    let product_table = schema.create_table_from_entity(Product);
    let trip_table = schema.create_table_from_entity(Trip);
    let trip_entry_table = schema.create_table_from_entity(TripEntry);
    let budget_entry_table = schema.create_table_from_entity(BudgetEntry);
    let sale_table = schema.create_table_from_entity(Sale);
    let sale_item_table = schema.create_table_from_entity(SaleItem);

    db.execute(builder.build(&member_table)).await?;
    db.execute(builder.build(&game_event_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&trip_table)).await?;
    db.execute(builder.build(&trip_entry_table)).await?;
    db.execute(builder.build(&budget_entry_table)).await?;
    db.execute(builder.build(&sale_table)).await?;
    db.execute(builder.build(&sale_item_table)).await?;

    Ok(())
}
