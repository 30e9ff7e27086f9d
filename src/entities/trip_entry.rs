//! Trip entry entity - The per-trip scoped ledger.
//!
//! Every trip entry has exactly one mirror in the general ledger; the mirror is
//! created, replaced, and removed by the trip entry's own lifecycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::kinds::EntryKind;

/// Trip-scoped ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip this entry belongs to
    pub trip_id: i64,
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
}

/// Defines relationships between trip entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one trip
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
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
