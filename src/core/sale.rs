//! Point-of-sale business logic.
//!
//! A sale is one atomic transaction: every line decrements its product's stock
//! through the stock ledger, the sale and its items are persisted, and one
//! income entry is posted to the general ledger. If any line runs out of
//! stock, the transaction rolls back and nothing happened: no decrement, no
//! sale, no posting. Posted entries reference the sale but are not mirrors;
//! the general ledger does not protect them from later edits.

use crate::{
    core::{event, member, stock},
    entities::{
        EntryKind, Sale, SaleItem, budget_entry, sale, sale_item,
    },
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One line of a sale request: a product and how many units of it.
#[derive(Debug, Clone, Copy)]
pub struct SaleLine {
    /// Product being sold.
    pub product_id: i64,
    /// Units requested, must be positive.
    pub quantity: i32,
}

/// Creates a sale at a game event.
///
/// The seller and the event must exist. Unit prices are snapshotted from the
/// catalog at sale time; the derived total is posted to the general ledger as
/// income in the same transaction.
pub async fn create_sale(
    db: &DatabaseConnection,
    event_id: i64,
    lines: &[SaleLine],
    seller_id: i64,
) -> Result<sale::Model> {
    if lines.is_empty() {
        return Err(Error::Config {
            message: "A sale needs at least one line".to_string(),
        });
    }

    let txn = db.begin().await?;

    member::require_member(&txn, seller_id).await?;
    let game_event = event::require_event(&txn, event_id).await?;

    // Decrement stock line by line, snapshotting each unit price. Any
    // insufficiency aborts the transaction and undoes prior decrements.
    let mut total_amount = 0.0;
    let mut priced_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let product = stock::reserve_and_decrement(&txn, line.product_id, line.quantity).await?;
        total_amount += product.price * f64::from(line.quantity);
        priced_lines.push((*line, product.price));
    }

    let sale_model = sale::ActiveModel {
        seller_id: Set(seller_id),
        event_id: Set(event_id),
        total_amount: Set(total_amount),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let sale_model = sale_model.insert(&txn).await?;

    for (line, unit_price) in priced_lines {
        let item = sale_item::ActiveModel {
            sale_id: Set(sale_model.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(unit_price),
            ..Default::default()
        };
        item.insert(&txn).await?;
    }

    // Post the takings to the general ledger. The posting shares the sale's
    // transaction, so it commits or rolls back with the sale.
    let posting = budget_entry::ActiveModel {
        description: Set(format!(
            "Sale - {} - {} item(s)",
            game_event.name,
            lines.len()
        )),
        amount: Set(total_amount),
        kind: Set(EntryKind::Income),
        timestamp: Set(chrono::Utc::now()),
        owner_id: Set(seller_id),
        notes: Set(Some(format!(
            "Sale #{} at {}",
            sale_model.id, game_event.name
        ))),
        source_trip_id: Set(None),
        source_trip_entry_id: Set(None),
        source_sale_id: Set(Some(sale_model.id)),
        ..Default::default()
    };
    posting.insert(&txn).await?;

    txn.commit().await?;

    info!(
        sale_id = sale_model.id,
        event_id,
        seller_id,
        total_amount,
        "created sale and posted income"
    );
    Ok(sale_model)
}

/// Retrieves a sale by id.
pub async fn get_sale_by_id(db: &DatabaseConnection, sale_id: i64) -> Result<Option<sale::Model>> {
    Sale::find_by_id(sale_id).one(db).await.map_err(Into::into)
}

/// Retrieves a sale together with its line items.
pub async fn get_sale_with_items(
    db: &DatabaseConnection,
    sale_id: i64,
) -> Result<(sale::Model, Vec<sale_item::Model>)> {
    let mut found = Sale::find_by_id(sale_id)
        .find_with_related(SaleItem)
        .all(db)
        .await?;

    match found.pop() {
        Some(pair) => Ok(pair),
        None => Err(Error::NotFound {
            entity: "sale",
            id: sale_id,
        }),
    }
}

/// Retrieves all sales, newest first.
pub async fn get_all_sales(db: &DatabaseConnection) -> Result<Vec<sale::Model>> {
    Sale::find()
        .order_by_desc(sale::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the sales made at one game event, newest first.
pub async fn get_sales_by_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::EventId.eq(event_id))
        .order_by_desc(sale::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the sales rung up by one seller, newest first.
pub async fn get_sales_by_seller(
    db: &DatabaseConnection,
    seller_id: i64,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::SellerId.eq(seller_id))
        .order_by_desc(sale::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Total revenue taken at one game event.
pub async fn get_revenue_by_event(db: &DatabaseConnection, event_id: i64) -> Result<f64> {
    let total: Option<Option<f64>> = Sale::find()
        .select_only()
        .column_as(sale::Column::TotalAmount.sum(), "total")
        .filter(sale::Column::EventId.eq(event_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

/// Number of sales made at one game event.
pub async fn get_sales_count_by_event(db: &DatabaseConnection, event_id: i64) -> Result<u64> {
    Sale::find()
        .filter(sale::Column::EventId.eq(event_id))
        .count(db)
        .await
        .map_err(Into::into)
}
