//! Trip-scoped ledger business logic.
//!
//! Every mutation here drives three things inside one database transaction:
//! the scoped entry itself, the owning trip's cached `total_cost` (for
//! expense-kind entries), and the entry's mirror in the general ledger. The
//! transaction is the only thing keeping them consistent; there is no
//! in-process locking on top of it.

use crate::{
    core::{member, mirror, trip},
    entities::{EntryKind, Trip, TripEntry, trip_entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Creates a trip ledger entry.
///
/// The trip and the owner must exist. Expense-kind entries add their amount to
/// the trip's cached total cost; every entry gets a general-ledger mirror. The
/// entry, the cache update, and the mirror commit atomically.
pub async fn create_entry(
    db: &DatabaseConnection,
    trip_id: i64,
    description: String,
    amount: f64,
    kind: EntryKind,
    owner_id: i64,
    notes: Option<String>,
) -> Result<trip_entry::Model> {
    validate_entry_input(&description, amount)?;

    let txn = db.begin().await?;

    let trip_model = Trip::find_by_id(trip_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: trip_id,
        })?;

    let entry = create_entry_within(
        &txn,
        &trip_model,
        description,
        amount,
        kind,
        owner_id,
        notes,
    )
    .await?;

    txn.commit().await?;
    Ok(entry)
}

/// Creates a trip ledger entry on an already-open transaction.
///
/// Used by [`create_entry`] and by trip creation, which books the initial
/// cost through this same path so the mirror and the cache are populated in
/// the trip's own transaction.
pub(crate) async fn create_entry_within<C>(
    conn: &C,
    trip_model: &crate::entities::trip::Model,
    description: String,
    amount: f64,
    kind: EntryKind,
    owner_id: i64,
    notes: Option<String>,
) -> Result<trip_entry::Model>
where
    C: ConnectionTrait,
{
    member::require_member(conn, owner_id).await?;

    let entry = trip_entry::ActiveModel {
        trip_id: Set(trip_model.id),
        description: Set(description.trim().to_string()),
        amount: Set(amount),
        kind: Set(kind),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(owner_id),
        notes: Set(notes),
        ..Default::default()
    };
    let entry = entry.insert(conn).await?;

    if kind == EntryKind::Expense {
        trip::adjust_total_cost(conn, trip_model.id, amount).await?;
    }

    mirror::mirror_create(conn, &entry, trip_model).await?;

    info!(
        trip_id = trip_model.id,
        trip_entry_id = entry.id,
        amount,
        kind = %kind,
        "created trip ledger entry"
    );
    Ok(entry)
}

/// Updates a trip ledger entry.
///
/// In one transaction: the old amount leaves the trip's total cost (if the old
/// kind was expense), the old mirror is removed, the patch is applied, the new
/// amount enters the total cost (if the new kind is expense), and a fresh
/// mirror is written. Mirrors are replaced rather than edited in place, also
/// when the kind flips between income and expense.
pub async fn update_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    description: String,
    amount: f64,
    kind: EntryKind,
    notes: Option<String>,
) -> Result<trip_entry::Model> {
    validate_entry_input(&description, amount)?;

    let txn = db.begin().await?;

    let existing = TripEntry::find_by_id(entry_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip entry",
            id: entry_id,
        })?;

    let trip_model = Trip::find_by_id(existing.trip_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip",
            id: existing.trip_id,
        })?;

    if existing.kind == EntryKind::Expense {
        trip::adjust_total_cost(&txn, trip_model.id, -existing.amount).await?;
    }

    mirror::mirror_remove(&txn, existing.id).await?;

    let mut entry: trip_entry::ActiveModel = existing.into();
    entry.description = Set(description.trim().to_string());
    entry.amount = Set(amount);
    entry.kind = Set(kind);
    entry.notes = Set(notes);
    let updated = entry.update(&txn).await?;

    if updated.kind == EntryKind::Expense {
        trip::adjust_total_cost(&txn, trip_model.id, updated.amount).await?;
    }

    mirror::mirror_create(&txn, &updated, &trip_model).await?;

    txn.commit().await?;

    info!(
        trip_id = trip_model.id,
        trip_entry_id = updated.id,
        "updated trip ledger entry"
    );
    Ok(updated)
}

/// Deletes a trip ledger entry, reversing its total-cost contribution and
/// removing its mirror in the same transaction.
pub async fn delete_entry(db: &DatabaseConnection, entry_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = TripEntry::find_by_id(entry_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "trip entry",
            id: entry_id,
        })?;

    if existing.kind == EntryKind::Expense {
        trip::adjust_total_cost(&txn, existing.trip_id, -existing.amount).await?;
    }

    mirror::mirror_remove(&txn, existing.id).await?;

    let trip_id = existing.trip_id;
    existing.delete(&txn).await?;

    txn.commit().await?;

    info!(trip_id, trip_entry_id = entry_id, "deleted trip ledger entry");
    Ok(())
}

/// Retrieves all ledger entries of a trip, newest first.
pub async fn get_entries_for_trip(
    db: &DatabaseConnection,
    trip_id: i64,
) -> Result<Vec<trip_entry::Model>> {
    TripEntry::find()
        .filter(trip_entry::Column::TripId.eq(trip_id))
        .order_by_desc(trip_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a trip's ledger entries of one kind, newest first.
pub async fn get_entries_for_trip_by_kind(
    db: &DatabaseConnection,
    trip_id: i64,
    kind: EntryKind,
) -> Result<Vec<trip_entry::Model>> {
    TripEntry::find()
        .filter(trip_entry::Column::TripId.eq(trip_id))
        .filter(trip_entry::Column::Kind.eq(kind))
        .order_by_desc(trip_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a trip ledger entry by id.
pub async fn get_entry_by_id(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Option<trip_entry::Model>> {
    TripEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// A trip's balance: income minus expenses over its own ledger.
pub async fn get_balance(db: &DatabaseConnection, trip_id: i64) -> Result<f64> {
    let income = sum_for_trip(db, trip_id, EntryKind::Income).await?;
    let expenses = sum_for_trip(db, trip_id, EntryKind::Expense).await?;
    Ok(income - expenses)
}

async fn sum_for_trip(db: &DatabaseConnection, trip_id: i64, kind: EntryKind) -> Result<f64> {
    let total: Option<Option<f64>> = TripEntry::find()
        .select_only()
        .column_as(trip_entry::Column::Amount.sum(), "total")
        .filter(trip_entry::Column::TripId.eq(trip_id))
        .filter(trip_entry::Column::Kind.eq(kind))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

fn validate_entry_input(description: &str, amount: f64) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::Config {
            message: "Entry description cannot be empty".to_string(),
        });
    }

    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::budget;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    async fn total_cost_of(db: &DatabaseConnection, trip_id: i64) -> f64 {
        Trip::find_by_id(trip_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .total_cost
    }

    #[tokio::test]
    async fn test_create_entry_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_entry(
            &db,
            1,
            String::new(),
            10.0,
            EntryKind::Expense,
            1,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = create_entry(
            &db,
            1,
            "Bus rental".to_string(),
            -10.0,
            EntryKind::Expense,
            1,
            None,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -10.0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_entry_unknown_trip() -> Result<()> {
        let (db, member) = setup_with_member().await?;

        let result = create_entry(
            &db,
            999,
            "Bus rental".to_string(),
            100.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "trip", id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_updates_total_cost_and_mirror() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;

        let entry = create_entry(
            &db,
            trip.id,
            "Bus rental".to_string(),
            250.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await?;

        assert_eq!(total_cost_of(&db, trip.id).await, 250.0);

        // Exactly one mirror, equal amount and kind
        let mirrors: Vec<_> = budget::get_all_entries(&db)
            .await?
            .into_iter()
            .filter(|e| crate::core::mirror::matches(e, entry.id))
            .collect();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].amount, 250.0);
        assert_eq!(mirrors[0].kind, EntryKind::Expense);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_income_leaves_total_cost_alone() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;

        create_entry(
            &db,
            trip.id,
            "Fan contribution".to_string(),
            80.0,
            EntryKind::Income,
            member.id,
            None,
        )
        .await?;

        assert_eq!(total_cost_of(&db, trip.id).await, 0.0);

        // Income entries still get a mirror
        assert_eq!(budget::get_all_entries(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_entry_amount_keeps_aggregate_consistent() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;
        let entry = create_entry(
            &db,
            trip.id,
            "Bus rental".to_string(),
            250.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await?;

        let updated = update_entry(
            &db,
            entry.id,
            "Bus rental (negotiated)".to_string(),
            200.0,
            EntryKind::Expense,
            None,
        )
        .await?;
        assert_eq!(updated.amount, 200.0);
        assert_eq!(total_cost_of(&db, trip.id).await, 200.0);

        // The old mirror is gone; exactly one mirror tracks the new state
        let mirrors: Vec<_> = budget::get_all_entries(&db)
            .await?
            .into_iter()
            .filter(|e| crate::core::mirror::matches(e, entry.id))
            .collect();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].amount, 200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_entry_kind_flip_adjusts_both_sides() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;
        let entry = create_entry(
            &db,
            trip.id,
            "Deposit".to_string(),
            120.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await?;
        assert_eq!(total_cost_of(&db, trip.id).await, 120.0);

        // Expense -> income: contribution leaves the cache, mirror flips kind
        let updated = update_entry(
            &db,
            entry.id,
            "Deposit refunded".to_string(),
            120.0,
            EntryKind::Income,
            None,
        )
        .await?;
        assert_eq!(updated.kind, EntryKind::Income);
        assert_eq!(total_cost_of(&db, trip.id).await, 0.0);

        let mirrors: Vec<_> = budget::get_all_entries(&db)
            .await?
            .into_iter()
            .filter(|e| crate::core::mirror::matches(e, entry.id))
            .collect();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].kind, EntryKind::Income);

        // Income -> expense: contribution comes back
        update_entry(
            &db,
            entry.id,
            "Deposit after all".to_string(),
            120.0,
            EntryKind::Expense,
            None,
        )
        .await?;
        assert_eq!(total_cost_of(&db, trip.id).await, 120.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entry_reverses_cache_and_mirror() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;
        let entry = create_entry(
            &db,
            trip.id,
            "Bus rental".to_string(),
            250.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await?;

        delete_entry(&db, entry.id).await?;

        assert_eq!(total_cost_of(&db, trip.id).await, 0.0);
        assert!(get_entry_by_id(&db, entry.id).await?.is_none());
        assert!(budget::get_all_entries(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entry_whose_mirror_is_gone_still_succeeds() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;
        let entry = create_entry(
            &db,
            trip.id,
            "Bus rental".to_string(),
            250.0,
            EntryKind::Expense,
            member.id,
            None,
        )
        .await?;

        // Reclaim the mirror out-of-band, as the trip-deletion cascade would.
        crate::core::mirror::mirror_remove(&db, entry.id).await?;

        // The scoped delete must not fail on the missing mirror.
        delete_entry(&db, entry.id).await?;
        assert_eq!(total_cost_of(&db, trip.id).await, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_consistency_over_sequence() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;

        let expected = |entries: &[(f64, EntryKind)]| -> f64 {
            entries
                .iter()
                .filter(|(_, k)| *k == EntryKind::Expense)
                .map(|(a, _)| a)
                .sum()
        };

        let e1 = create_entry(&db, trip.id, "Fuel".to_string(), 90.0, EntryKind::Expense, member.id, None).await?;
        let _e2 = create_entry(&db, trip.id, "Tickets".to_string(), 45.0, EntryKind::Income, member.id, None).await?;
        let e3 = create_entry(&db, trip.id, "Meals".to_string(), 60.0, EntryKind::Expense, member.id, None).await?;
        assert_eq!(
            total_cost_of(&db, trip.id).await,
            expected(&[(90.0, EntryKind::Expense), (45.0, EntryKind::Income), (60.0, EntryKind::Expense)])
        );

        update_entry(&db, e1.id, "Fuel".to_string(), 100.0, EntryKind::Expense, None).await?;
        assert_eq!(total_cost_of(&db, trip.id).await, 160.0);

        delete_entry(&db, e3.id).await?;
        assert_eq!(total_cost_of(&db, trip.id).await, 100.0);

        // The cache agrees with the recomputed sum at the end
        let entries = get_entries_for_trip(&db, trip.id).await?;
        let recomputed: f64 = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Expense)
            .map(|e| e.amount)
            .sum();
        assert_eq!(total_cost_of(&db, trip.id).await, recomputed);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_balance_for_trip() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;

        create_entry(&db, trip.id, "Sponsor".to_string(), 300.0, EntryKind::Income, member.id, None).await?;
        create_entry(&db, trip.id, "Bus".to_string(), 250.0, EntryKind::Expense, member.id, None).await?;

        assert_eq!(get_balance(&db, trip.id).await?, 50.0);

        // A trip without entries balances to zero
        let other = create_test_trip(&db, member.id, "Lakeside").await?;
        assert_eq!(get_balance(&db, other.id).await?, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_entries_scoped_per_trip() -> Result<()> {
        let (db, member, trip) = setup_with_trip().await?;
        let other = create_test_trip(&db, member.id, "Lakeside").await?;

        create_entry(&db, trip.id, "Fuel".to_string(), 90.0, EntryKind::Expense, member.id, None).await?;
        create_entry(&db, other.id, "Fuel".to_string(), 70.0, EntryKind::Expense, member.id, None).await?;

        let first = get_entries_for_trip(&db, trip.id).await?;
        let second = get_entries_for_trip(&db, other.id).await?;
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].amount, 90.0);
        assert_eq!(second[0].amount, 70.0);

        let expenses = get_entries_for_trip_by_kind(&db, trip.id, EntryKind::Expense).await?;
        assert_eq!(expenses.len(), 1);
        let income = get_entries_for_trip_by_kind(&db, trip.id, EntryKind::Income).await?;
        assert!(income.is_empty());

        Ok(())
    }
}
