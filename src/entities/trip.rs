//! Trip entity - A club trip with its own scoped ledger.
//!
//! `total_cost` caches the sum of the trip's expense-kind ledger entries and is
//! only ever adjusted inside the same transaction as the entry mutation that
//! changes it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::kinds::TripStatus;

/// Trip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Where the trip goes
    pub destination: String,
    /// What the trip is for
    pub description: String,
    /// Departure date and time
    pub departure_date: DateTimeUtc,
    /// Return date and time
    pub return_date: DateTimeUtc,
    /// Lifecycle status
    pub status: TripStatus,
    /// Cost registered when the trip was created
    pub initial_cost: f64,
    /// Cached sum of the trip's expense entries
    pub total_cost: f64,
    /// Member who created the trip
    pub owner_id: i64,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between trips and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One trip owns many scoped ledger entries
    #[sea_orm(has_many = "super::trip_entry::Entity")]
    TripEntries,
}

impl Related<super::trip_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
