//! Shared test utilities for `clubbooks`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{budget, event, member, stock, trip},
    entities::{self, EntryKind, TripStatus},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test member with the given name.
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::member::Model> {
    member::create_member(db, name.to_string()).await
}

/// Creates a test trip with sensible defaults.
///
/// # Defaults
/// * departs in 7 days, returns in 9
/// * status: `Planned`
/// * `initial_cost`: 0 (no auto-booked entry)
pub async fn create_test_trip(
    db: &DatabaseConnection,
    owner_id: i64,
    destination: &str,
) -> Result<entities::trip::Model> {
    let now = chrono::Utc::now();
    trip::create_trip(
        db,
        destination.to_string(),
        "Test trip".to_string(),
        now + chrono::Duration::days(7),
        now + chrono::Duration::days(9),
        TripStatus::Planned,
        0.0,
        owner_id,
        None,
    )
    .await
}

/// Creates a test product with the given price and stock.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    stock_level: i32,
) -> Result<entities::product::Model> {
    stock::create_product(db, name.to_string(), None, price, stock_level).await
}

/// Creates a test game event with sensible defaults.
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::game_event::Model> {
    event::create_event(db, name.to_string(), None, chrono::Utc::now()).await
}

/// Creates an organic general-ledger entry through the public create path.
pub async fn create_test_budget_entry(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: f64,
    kind: EntryKind,
) -> Result<entities::budget_entry::Model> {
    budget::create_entry(
        db,
        "Test entry".to_string(),
        amount,
        kind,
        owner_id,
        None,
    )
    .await
}

/// Inserts a general-ledger row carrying trip correlation columns directly,
/// bypassing the sync layer. Used to test mirror predicates, protection, and
/// orphan reclamation in isolation.
pub async fn insert_mirror_entry(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: f64,
    trip_id: i64,
    trip_entry_id: i64,
) -> Result<entities::budget_entry::Model> {
    let entry = entities::budget_entry::ActiveModel {
        description: Set(format!("Trip - somewhere - entry {trip_entry_id}")),
        amount: Set(amount),
        kind: Set(EntryKind::Expense),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(owner_id),
        notes: Set(None),
        source_trip_id: Set(Some(trip_id)),
        source_trip_entry_id: Set(Some(trip_entry_id)),
        source_sale_id: Set(None),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Inserts a general-ledger row tagged to a sale, bypassing the sale flow.
pub async fn insert_sale_posted_entry(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: f64,
    sale_id: i64,
) -> Result<entities::budget_entry::Model> {
    let entry = entities::budget_entry::ActiveModel {
        description: Set(format!("Sale #{sale_id}")),
        amount: Set(amount),
        kind: Set(EntryKind::Income),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(owner_id),
        notes: Set(None),
        source_trip_id: Set(None),
        source_trip_entry_id: Set(None),
        source_sale_id: Set(Some(sale_id)),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Inserts a trip ledger row directly, without the total-cost or mirror side
/// effects. Used to test the sync layer itself in isolation.
pub async fn insert_raw_trip_entry(
    db: &DatabaseConnection,
    trip_id: i64,
    owner_id: i64,
    amount: f64,
    kind: EntryKind,
) -> Result<entities::trip_entry::Model> {
    let entry = entities::trip_entry::ActiveModel {
        trip_id: Set(trip_id),
        description: Set("Raw test entry".to_string()),
        amount: Set(amount),
        kind: Set(kind),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(owner_id),
        notes: Set(None),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Sets up a complete test environment with a member.
/// Returns (db, member) for common test scenarios.
pub async fn setup_with_member() -> Result<(DatabaseConnection, entities::member::Model)> {
    let db = setup_test_db().await?;
    let member = create_test_member(&db, "Test Member").await?;
    Ok((db, member))
}

/// Sets up a complete test environment with a member and a trip.
/// Returns (db, member, trip) for scoped-ledger tests.
pub async fn setup_with_trip() -> Result<(
    DatabaseConnection,
    entities::member::Model,
    entities::trip::Model,
)> {
    let db = setup_test_db().await?;
    let member = create_test_member(&db, "Test Member").await?;
    let trip = create_test_trip(&db, member.id, "Hilltown").await?;
    Ok((db, member, trip))
}

/// Sets up a complete test environment with a member and a game event.
/// Returns (db, member, event) for sale tests.
pub async fn setup_with_event() -> Result<(
    DatabaseConnection,
    entities::member::Model,
    entities::game_event::Model,
)> {
    let db = setup_test_db().await?;
    let member = create_test_member(&db, "Test Seller").await?;
    let game_event = create_test_event(&db, "Home match").await?;
    Ok((db, member, game_event))
}
