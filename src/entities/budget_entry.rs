//! Budget entry entity - The club-wide general ledger.
//!
//! Each entry records one money movement for the club as a whole. Entries that
//! mirror a trip ledger entry carry the `source_trip_id` and
//! `source_trip_entry_id` correlation columns and are protected from direct
//! edits; entries posted by a sale carry `source_sale_id` but stay editable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::kinds::EntryKind;

/// General-ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable description of the movement
    pub description: String,
    /// Positive amount in club currency; direction comes from `kind`
    pub amount: f64,
    /// Whether this entry is income or an expense
    pub kind: EntryKind,
    /// When the entry was recorded
    pub timestamp: DateTimeUtc,
    /// Member who recorded the entry
    pub owner_id: i64,
    /// Free-text notes
    pub notes: Option<String>,
    /// Trip this entry mirrors, if it is a trip mirror
    pub source_trip_id: Option<i64>,
    /// Trip ledger entry this entry mirrors, if it is a trip mirror
    pub source_trip_entry_id: Option<i64>,
    /// Sale that posted this entry, if it came from the point-of-sale
    pub source_sale_id: Option<i64>,
}

/// Defines relationships between budget entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A mirror entry points back at its trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::SourceTripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
