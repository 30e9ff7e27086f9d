//! Closed enums shared by the ledger entities.
//!
//! Ledger kind and trip status are stored as short uppercase strings but only
//! ever handled as these types; display labels are mapped explicitly here
//! rather than by matching on raw strings elsewhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry, in either the general or a trip ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryKind {
    /// Money coming into the club (or trip).
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Money leaving the club (or trip).
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Lifecycle status of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TripStatus {
    /// Scheduled but not yet departed.
    #[sea_orm(string_value = "PLANNED")]
    Planned,
    /// Currently underway.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Returned and settled.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Called off; kept for bookkeeping history.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Planned => "Planned",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}
