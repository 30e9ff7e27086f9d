//! Member entity - A club member who can own ledger entries and ring up sales.
//!
//! Account management (profiles, permissions, sessions) lives outside this
//! crate; the core only needs members to exist so owner and seller lookups can
//! fail loudly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Club member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the member
    pub name: String,
}

/// Defines relationships between members and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
