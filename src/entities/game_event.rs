//! Game event entity - A match or tournament the club attends.
//!
//! Only the fields the point-of-sale needs; event management itself lives
//! outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Game event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the event (e.g. opponent or tournament)
    pub name: String,
    /// Where the event takes place
    pub location: Option<String>,
    /// When the event starts
    pub starts_at: DateTimeUtc,
}

/// Defines relationships between game events and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event hosts many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
