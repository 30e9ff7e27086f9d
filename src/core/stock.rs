//! Stock ledger and product catalog business logic.
//!
//! Product stock is bounded below by zero. Decrements go through a guarded
//! atomic column update (`stock = stock - ? WHERE stock >= ?`) so concurrent
//! sales cannot race each other below zero, and they are generic over the
//! connection so a sale can compose several decrements into one transaction:
//! if a later line fails, every earlier decrement rolls back with it.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active (non-deleted) products, ordered alphabetically by name.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the products that currently have stock to sell.
pub async fn get_available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(product::Column::Stock.gt(0))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves products at or below the given stock threshold, for restocking
/// decisions.
pub async fn get_low_stock_products(
    db: &DatabaseConnection,
    threshold: i32,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(product::Column::Stock.lte(threshold))
        .order_by_asc(product::Column::Stock)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id, including soft-deleted ones.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves an active product by id, failing with `NotFound` when absent or
/// soft-deleted.
pub(crate) async fn require_product<C>(conn: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(conn)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Creates a new catalog product, performing input validation.
///
/// The name must be non-empty, the price non-negative and finite, and the
/// initial stock non-negative.
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
    price: f64,
    stock: i32,
) -> Result<product::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if price < 0.0 || !price.is_finite() {
        return Err(Error::InvalidAmount { amount: price });
    }

    if stock < 0 {
        return Err(Error::InvalidAmount {
            amount: f64::from(stock),
        });
    }

    let now = chrono::Utc::now();

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        price: Set(price),
        stock: Set(stock),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Updates a product's name, description, and price.
///
/// Stock is deliberately absent here: it moves only through
/// [`reserve_and_decrement`] and [`restock`].
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    new_name: String,
    new_description: Option<String>,
    new_price: f64,
) -> Result<product::Model> {
    if new_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if new_price < 0.0 || !new_price.is_finite() {
        return Err(Error::InvalidAmount { amount: new_price });
    }

    let mut product: product::ActiveModel = require_product(db, product_id).await?.into();

    product.name = Set(new_name.trim().to_string());
    product.description = Set(new_description);
    product.price = Set(new_price);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Soft deletes a product, preserving sale history that references it.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = require_product(db, product_id).await?.into();

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Checks whether a product has at least `quantity` units in stock.
pub async fn has_stock(db: &DatabaseConnection, product_id: i64, quantity: i32) -> Result<bool> {
    let product = require_product(db, product_id).await?;
    Ok(product.stock >= quantity)
}

/// Atomically reserves `quantity` units of a product by decrementing its stock.
///
/// Fails with `InsufficientStock` when the product has fewer units than
/// requested, leaving stock untouched. The decrement is a single guarded
/// `UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?`, so a
/// concurrent decrement that drains the stock first turns this call into the
/// same error instead of a negative stock level.
///
/// Generic over the connection: callers that decrement several products in one
/// sale pass their open transaction, and a failure on any line rolls back all
/// prior decrements of that sale.
pub async fn reserve_and_decrement<C>(
    conn: &C,
    product_id: i64,
    quantity: i32,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidAmount {
            amount: f64::from(quantity),
        });
    }

    let product = Product::find_by_id(product_id)
        .one(conn)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?;

    if product.stock < quantity {
        return Err(Error::InsufficientStock {
            product_id,
            requested: quantity,
            available: product.stock,
        });
    }

    let update = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(conn)
        .await?;

    // A concurrent sale can drain the stock between the read above and the
    // guarded update; rows_affected == 0 means the guard saved us.
    if update.rows_affected == 0 {
        return Err(Error::InsufficientStock {
            product_id,
            requested: quantity,
            available: product.stock,
        });
    }

    Product::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

/// Adjusts a product's stock by `delta` units (positive to restock, negative
/// to correct), refusing adjustments that would take stock negative.
pub async fn restock(
    db: &DatabaseConnection,
    product_id: i64,
    delta: i32,
) -> Result<product::Model> {
    let product = require_product(db, product_id).await?;

    if product.stock + delta < 0 {
        return Err(Error::InsufficientStock {
            product_id,
            requested: -delta,
            available: product.stock,
        });
    }

    let update = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(delta),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Stock.gte(-delta))
        .exec(db)
        .await?;

    if update.rows_affected == 0 {
        return Err(Error::InsufficientStock {
            product_id,
            requested: -delta,
            available: product.stock,
        });
    }

    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}
