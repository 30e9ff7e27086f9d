//! Unified error type for the crate.
//!
//! Every fallible operation returns [`Result`]. Variants carry enough context
//! for the interface layer to map them onto user-facing responses without
//! string parsing.

use thiserror::Error;

/// All errors the bookkeeping core can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced row does not exist (or is soft-deleted).
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "trip", "product").
        entity: &'static str,
        /// The id that failed to resolve.
        id: i64,
    },

    /// Direct edit or delete of a general-ledger entry that mirrors a trip
    /// ledger entry. These entries are managed exclusively through the trip
    /// ledger.
    #[error(
        "budget entry {id} mirrors a trip ledger entry and cannot be edited here; \
         edit it through the owning trip instead"
    )]
    MirrorProtected {
        /// Id of the protected general-ledger entry.
        id: i64,
    },

    /// Force-deletion was attempted on an entry that is not a trip mirror.
    #[error("budget entry {id} is not a trip mirror; refusing to force-delete it")]
    NotAMirror {
        /// Id of the entry that failed the mirror check.
        id: i64,
    },

    /// A sale line requested more units than the product has in stock.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product whose stock ran short.
        product_id: i64,
        /// Units the sale line asked for.
        requested: i32,
        /// Units actually available.
        available: i32,
    },

    /// A monetary amount or quantity failed validation (non-positive, NaN,
    /// infinite).
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value.
        amount: f64,
    },

    /// Configuration error (missing/invalid config file or variable).
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// Database error from SeaORM.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config file reading).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
