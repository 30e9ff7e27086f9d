//! General ledger business logic - the club-wide budget.
//!
//! Entries that mirror a trip ledger entry are protected here: updating or
//! deleting them directly fails with a distinct error telling the caller to
//! edit the trip ledger instead. The only path that removes a mirror is the
//! synchronization layer, which goes through [`force_delete_mirror`] and its
//! inverse check.

use crate::{
    core::{member, mirror},
    entities::{BudgetEntry, EntryKind, budget_entry},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// Creates a fresh general-ledger entry.
///
/// Fresh entries carry no correlation columns and are freely editable later.
/// The amount must be positive and finite; the owner must exist.
pub async fn create_entry(
    db: &DatabaseConnection,
    description: String,
    amount: f64,
    kind: EntryKind,
    owner_id: i64,
    notes: Option<String>,
) -> Result<budget_entry::Model> {
    if description.trim().is_empty() {
        return Err(Error::Config {
            message: "Entry description cannot be empty".to_string(),
        });
    }

    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    member::require_member(db, owner_id).await?;

    let entry = budget_entry::ActiveModel {
        description: Set(description.trim().to_string()),
        amount: Set(amount),
        kind: Set(kind),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(owner_id),
        notes: Set(notes),
        source_trip_id: Set(None),
        source_trip_entry_id: Set(None),
        source_sale_id: Set(None),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Retrieves all general-ledger entries, newest first.
pub async fn get_all_entries(db: &DatabaseConnection) -> Result<Vec<budget_entry::Model>> {
    BudgetEntry::find()
        .order_by_desc(budget_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a general-ledger entry by id.
pub async fn get_entry_by_id(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Option<budget_entry::Model>> {
    BudgetEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves general-ledger entries of one kind, newest first.
pub async fn get_entries_by_kind(
    db: &DatabaseConnection,
    kind: EntryKind,
) -> Result<Vec<budget_entry::Model>> {
    BudgetEntry::find()
        .filter(budget_entry::Column::Kind.eq(kind))
        .order_by_desc(budget_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves general-ledger entries recorded in the given time window, newest
/// first.
pub async fn get_entries_between(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<budget_entry::Model>> {
    BudgetEntry::find()
        .filter(budget_entry::Column::Timestamp.between(from, to))
        .order_by_desc(budget_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a general-ledger entry's description, amount, kind, and notes.
///
/// Fails with `MirrorProtected` when the entry mirrors a trip ledger entry;
/// those are edited through the owning trip only.
pub async fn update_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    description: String,
    amount: f64,
    kind: EntryKind,
    notes: Option<String>,
) -> Result<budget_entry::Model> {
    if description.trim().is_empty() {
        return Err(Error::Config {
            message: "Entry description cannot be empty".to_string(),
        });
    }

    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    let existing = BudgetEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "budget entry",
            id: entry_id,
        })?;

    if mirror::is_mirror(&existing) {
        return Err(Error::MirrorProtected { id: entry_id });
    }

    let mut entry: budget_entry::ActiveModel = existing.into();
    entry.description = Set(description.trim().to_string());
    entry.amount = Set(amount);
    entry.kind = Set(kind);
    entry.notes = Set(notes);

    entry.update(db).await.map_err(Into::into)
}

/// Deletes a general-ledger entry, with the same mirror protection as
/// [`update_entry`].
pub async fn delete_entry(db: &DatabaseConnection, entry_id: i64) -> Result<()> {
    let existing = BudgetEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "budget entry",
            id: entry_id,
        })?;

    if mirror::is_mirror(&existing) {
        return Err(Error::MirrorProtected { id: entry_id });
    }

    existing.delete(db).await?;
    Ok(())
}

/// Deletes a mirror entry on behalf of the synchronization layer.
///
/// The check is the inverse of the public protection: an entry that is *not*
/// a trip mirror fails with `NotAMirror`, which keeps a buggy sync path from
/// force-deleting organic bookkeeping.
pub(crate) async fn force_delete_mirror<C>(conn: &C, entry_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = BudgetEntry::find_by_id(entry_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "budget entry",
            id: entry_id,
        })?;

    if !mirror::is_mirror(&existing) {
        return Err(Error::NotAMirror { id: entry_id });
    }

    existing.delete(conn).await?;
    Ok(())
}

/// Sums the amounts of all entries of one kind.
pub async fn sum_by_kind(db: &DatabaseConnection, kind: EntryKind) -> Result<f64> {
    let total: Option<Option<f64>> = BudgetEntry::find()
        .select_only()
        .column_as(budget_entry::Column::Amount.sum(), "total")
        .filter(budget_entry::Column::Kind.eq(kind))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

/// Sums the amounts of entries of one kind inside a time window.
pub async fn sum_by_kind_between(
    db: &DatabaseConnection,
    kind: EntryKind,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<f64> {
    let total: Option<Option<f64>> = BudgetEntry::find()
        .select_only()
        .column_as(budget_entry::Column::Amount.sum(), "total")
        .filter(budget_entry::Column::Kind.eq(kind))
        .filter(budget_entry::Column::Timestamp.between(from, to))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

/// The club's current balance: total income minus total expenses.
pub async fn current_balance(db: &DatabaseConnection) -> Result<f64> {
    let income = sum_by_kind(db, EntryKind::Income).await?;
    let expenses = sum_by_kind(db, EntryKind::Expense).await?;
    Ok(income - expenses)
}

/// The club's balance over a time window.
pub async fn balance_between(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<f64> {
    let income = sum_by_kind_between(db, EntryKind::Income, from, to).await?;
    let expenses = sum_by_kind_between(db, EntryKind::Expense, from, to).await?;
    Ok(income - expenses)
}
