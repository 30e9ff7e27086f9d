//! Trip lifecycle business logic.
//!
//! Trips own their scoped ledger; creating a trip with an initial cost books
//! that cost through the scoped-ledger path so the total-cost cache and the
//! general-ledger mirror appear in the same transaction. Deleting a trip
//! cascades: its mirror set leaves the general ledger, then its entries, then
//! the trip itself, all atomically.

use crate::{
    core::{member, mirror, trip_entry},
    entities::{Trip, TripEntry, TripStatus, trip, trip_entry as trip_entry_entity},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Description used for the automatically booked initial cost entry.
const INITIAL_COST_DESCRIPTION: &str = "Initial trip cost";

/// Adjusts a trip's cached total cost by `delta`.
///
/// This is an atomic database-level update. Instead of reading the current
/// total, modifying it, and writing it back (which can lose updates under
/// concurrent scoped-ledger mutations), it issues a single
/// `UPDATE trips SET total_cost = total_cost + ? WHERE id = ?`.
pub(crate) async fn adjust_total_cost<C>(
    conn: &C,
    trip_id: i64,
    delta: f64,
) -> Result<trip::Model>
where
    C: ConnectionTrait,
{
    // First verify the trip exists
    let _trip = Trip::find_by_id(trip_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: trip_id,
        })?;

    Trip::update_many()
        .col_expr(
            trip::Column::TotalCost,
            Expr::col(trip::Column::TotalCost).add(delta),
        )
        .filter(trip::Column::Id.eq(trip_id))
        .exec(conn)
        .await?;

    Trip::find_by_id(trip_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: trip_id,
        })
}

/// Creates a trip.
///
/// A positive `initial_cost` is booked as the trip's first expense entry
/// through the scoped ledger, inside the same transaction, so the returned
/// trip already carries it in `total_cost` and the general ledger already
/// holds its mirror.
#[allow(clippy::too_many_arguments)]
pub async fn create_trip(
    db: &DatabaseConnection,
    destination: String,
    description: String,
    departure_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    status: TripStatus,
    initial_cost: f64,
    owner_id: i64,
    notes: Option<String>,
) -> Result<trip::Model> {
    if destination.trim().is_empty() {
        return Err(Error::Config {
            message: "Trip destination cannot be empty".to_string(),
        });
    }

    if initial_cost < 0.0 || !initial_cost.is_finite() {
        return Err(Error::InvalidAmount {
            amount: initial_cost,
        });
    }

    let txn = db.begin().await?;

    member::require_member(&txn, owner_id).await?;

    let trip_model = trip::ActiveModel {
        destination: Set(destination.trim().to_string()),
        description: Set(description),
        departure_date: Set(departure_date),
        return_date: Set(return_date),
        status: Set(status),
        initial_cost: Set(initial_cost),
        total_cost: Set(0.0),
        owner_id: Set(owner_id),
        notes: Set(notes),
        ..Default::default()
    };
    let mut trip_model = trip_model.insert(&txn).await?;

    if initial_cost > 0.0 {
        trip_entry::create_entry_within(
            &txn,
            &trip_model,
            INITIAL_COST_DESCRIPTION.to_string(),
            initial_cost,
            crate::entities::EntryKind::Expense,
            owner_id,
            Some("Booked automatically at trip creation".to_string()),
        )
        .await?;

        // Pick up the total cost the initial entry just added
        trip_model = Trip::find_by_id(trip_model.id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "trip",
                id: trip_model.id,
            })?;
    }

    txn.commit().await?;

    info!(trip_id = trip_model.id, destination = %trip_model.destination, "created trip");
    Ok(trip_model)
}

/// Updates a trip's descriptive fields and status.
///
/// The total-cost cache is deliberately untouched here; it moves only with
/// the trip's ledger entries.
#[allow(clippy::too_many_arguments)]
pub async fn update_trip(
    db: &DatabaseConnection,
    trip_id: i64,
    destination: String,
    description: String,
    departure_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    status: TripStatus,
    initial_cost: f64,
    notes: Option<String>,
) -> Result<trip::Model> {
    if destination.trim().is_empty() {
        return Err(Error::Config {
            message: "Trip destination cannot be empty".to_string(),
        });
    }

    if initial_cost < 0.0 || !initial_cost.is_finite() {
        return Err(Error::InvalidAmount {
            amount: initial_cost,
        });
    }

    let mut trip_model: trip::ActiveModel = Trip::find_by_id(trip_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: trip_id,
        })?
        .into();

    trip_model.destination = Set(destination.trim().to_string());
    trip_model.description = Set(description);
    trip_model.departure_date = Set(departure_date);
    trip_model.return_date = Set(return_date);
    trip_model.status = Set(status);
    trip_model.initial_cost = Set(initial_cost);
    trip_model.notes = Set(notes);

    trip_model.update(db).await.map_err(Into::into)
}

/// Deletes a trip and everything that hangs off it.
///
/// One transaction removes the trip's mirror set from the general ledger
/// (including orphaned mirrors whose entries are already gone), its scoped
/// ledger entries, and the trip row itself.
pub async fn delete_trip(db: &DatabaseConnection, trip_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let trip_model = Trip::find_by_id(trip_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: trip_id,
        })?;

    let removed_mirrors = mirror::cascade_trip_mirrors(&txn, trip_model.id).await?;

    let removed_entries = TripEntry::delete_many()
        .filter(trip_entry_entity::Column::TripId.eq(trip_model.id))
        .exec(&txn)
        .await?
        .rows_affected;

    trip_model.delete(&txn).await?;

    txn.commit().await?;

    info!(
        trip_id,
        removed_mirrors, removed_entries, "deleted trip with cascade"
    );
    Ok(())
}

/// Retrieves a trip by id.
pub async fn get_trip_by_id(db: &DatabaseConnection, trip_id: i64) -> Result<Option<trip::Model>> {
    Trip::find_by_id(trip_id).one(db).await.map_err(Into::into)
}

/// Retrieves all trips, most recent departure first.
pub async fn get_all_trips(db: &DatabaseConnection) -> Result<Vec<trip::Model>> {
    Trip::find()
        .order_by_desc(trip::Column::DepartureDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves trips in the given status, most recent departure first.
pub async fn get_trips_by_status(
    db: &DatabaseConnection,
    status: TripStatus,
) -> Result<Vec<trip::Model>> {
    Trip::find()
        .filter(trip::Column::Status.eq(status))
        .order_by_desc(trip::Column::DepartureDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves trips that have not yet departed, next departure first.
pub async fn get_upcoming_trips(db: &DatabaseConnection) -> Result<Vec<trip::Model>> {
    Trip::find()
        .filter(trip::Column::DepartureDate.gte(chrono::Utc::now()))
        .order_by_asc(trip::Column::DepartureDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves trips that have already returned, most recent first.
pub async fn get_past_trips(db: &DatabaseConnection) -> Result<Vec<trip::Model>> {
    Trip::find()
        .filter(trip::Column::ReturnDate.lt(chrono::Utc::now()))
        .order_by_desc(trip::Column::ReturnDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves trips departing inside the given window, earliest first.
pub async fn get_trips_between(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<trip::Model>> {
    Trip::find()
        .filter(trip::Column::DepartureDate.between(from, to))
        .order_by_asc(trip::Column::DepartureDate)
        .all(db)
        .await
        .map_err(Into::into)
}
