//! Sale item entity - One line of a sale.
//!
//! `unit_price` is a snapshot of the product price at sale time, not a live
//! link; later catalog price changes do not rewrite history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale line-item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sale this item belongs to
    pub sale_id: i64,
    /// Product that was sold
    pub product_id: i64,
    /// Units sold, always positive
    pub quantity: i32,
    /// Price per unit at sale time
    pub unit_price: f64,
}

/// Defines relationships between sale items and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one sale
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::SaleId",
        to = "super::sale::Column::Id"
    )]
    Sale,
    /// Each item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
