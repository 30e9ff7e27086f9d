//! Sale entity - One point-of-sale transaction.
//!
//! A sale owns its items and is immutable after creation; `total_amount` is the
//! sum of the item subtotals computed at sale time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who rang up the sale
    pub seller_id: i64,
    /// Game event the sale happened at
    pub event_id: i64,
    /// Sum of item subtotals, derived at creation
    pub total_amount: f64,
    /// When the sale was made
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between sales and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One sale owns many items
    #[sea_orm(has_many = "super::sale_item::Entity")]
    SaleItems,
    /// Each sale belongs to one game event
    #[sea_orm(
        belongs_to = "super::game_event::Entity",
        from = "Column::EventId",
        to = "super::game_event::Column::Id"
    )]
    GameEvent,
}

impl Related<super::sale_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::game_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
