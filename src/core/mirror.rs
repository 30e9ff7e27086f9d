//! Mirror correlation and synchronization between the trip ledgers and the
//! general ledger.
//!
//! Every trip ledger entry is mirrored by exactly one general-ledger entry.
//! The correlation is carried in typed columns on the general-ledger row
//! (`source_trip_id`, `source_trip_entry_id`), so mirror lookups are indexed
//! filters rather than free-text scans, and the mirror of a given trip entry
//! is unambiguous. The functions here run on the caller's open transaction:
//! a scoped-ledger mutation and its mirror write commit or roll back together.

use crate::{
    core::budget,
    entities::{BudgetEntry, budget_entry, trip, trip_entry},
    errors::Result,
};
use sea_orm::{ConnectionTrait, Set, prelude::*};
use tracing::{debug, info};

/// Whether a general-ledger entry mirrors a trip ledger entry.
///
/// Sale-posted entries carry a `source_sale_id` but are *not* mirrors; they
/// stay editable in the general ledger.
#[must_use]
pub fn is_mirror(entry: &budget_entry::Model) -> bool {
    entry.source_trip_id.is_some() || entry.source_trip_entry_id.is_some()
}

/// Whether a general-ledger entry is the mirror of the given trip ledger entry.
#[must_use]
pub fn matches(entry: &budget_entry::Model, trip_entry_id: i64) -> bool {
    entry.source_trip_entry_id == Some(trip_entry_id)
}

/// Whether a general-ledger entry belongs to the given trip's mirror set.
#[must_use]
pub fn references_trip(entry: &budget_entry::Model, trip_id: i64) -> bool {
    entry.source_trip_id == Some(trip_id)
}

/// Builds the mirror's description: it names the trip so the general ledger
/// stays readable on its own.
fn mirror_description(trip: &trip::Model, entry: &trip_entry::Model) -> String {
    format!("Trip - {} - {}", trip.destination, entry.description)
}

/// Builds the mirror's human-readable note.
fn mirror_note(trip: &trip::Model, entry: &trip_entry::Model) -> String {
    format!(
        "Mirrors trip ledger entry #{} of trip #{} ({})",
        entry.id, trip.id, trip.destination
    )
}

/// Writes the general-ledger mirror for a trip ledger entry.
///
/// The mirror copies the entry's kind, amount, and owner, and records the
/// correlation columns pointing back at the trip and the entry.
pub(crate) async fn mirror_create<C>(
    conn: &C,
    entry: &trip_entry::Model,
    trip: &trip::Model,
) -> Result<budget_entry::Model>
where
    C: ConnectionTrait,
{
    let mirror = budget_entry::ActiveModel {
        description: Set(mirror_description(trip, entry)),
        amount: Set(entry.amount),
        kind: Set(entry.kind),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(entry.owner_id),
        notes: Set(Some(mirror_note(trip, entry))),
        source_trip_id: Set(Some(trip.id)),
        source_trip_entry_id: Set(Some(entry.id)),
        source_sale_id: Set(None),
        ..Default::default()
    };

    let created = mirror.insert(conn).await?;
    info!(
        trip_id = trip.id,
        trip_entry_id = entry.id,
        mirror_id = created.id,
        "created general-ledger mirror"
    );
    Ok(created)
}

/// Removes the general-ledger mirror of a trip ledger entry.
///
/// Silently no-ops when no mirror exists: an entry whose mirror was already
/// reclaimed must still be updatable and deletable.
pub(crate) async fn mirror_remove<C>(conn: &C, trip_entry_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = BudgetEntry::find()
        .filter(budget_entry::Column::SourceTripEntryId.eq(trip_entry_id))
        .one(conn)
        .await?;

    match existing {
        Some(entry) => {
            budget::force_delete_mirror(conn, entry.id).await?;
            info!(
                trip_entry_id,
                mirror_id = entry.id,
                "removed general-ledger mirror"
            );
        }
        None => {
            debug!(trip_entry_id, "no general-ledger mirror to remove");
        }
    }
    Ok(())
}

/// Removes every general-ledger entry in a trip's mirror set.
///
/// Runs at trip deletion and matches by trip id alone, so it also reclaims a
/// mirror whose owning entry is already gone. Returns the number of entries
/// removed.
pub(crate) async fn cascade_trip_mirrors<C>(conn: &C, trip_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mirrors = BudgetEntry::find()
        .filter(budget_entry::Column::SourceTripId.eq(trip_id))
        .all(conn)
        .await?;

    let mut removed = 0u64;
    for entry in mirrors {
        budget::force_delete_mirror(conn, entry.id).await?;
        removed += 1;
    }

    info!(trip_id, removed, "cascaded trip mirrors out of the general ledger");
    Ok(removed)
}
