//! Core business logic - framework-agnostic ledger, trip, stock, and sale
//! operations.
//!
//! Every public operation here takes a `&DatabaseConnection`, runs inside a
//! single database transaction where it mutates more than one row, and returns
//! the crate-wide `Result`. The interface layer on top of this crate is a thin
//! translation of these functions.

/// General ledger (club-wide budget) operations
pub mod budget;
/// Game event collaborator lookups
pub mod event;
/// Club member collaborator lookups
pub mod member;
/// Mirror correlation and synchronization between the two ledgers
pub mod mirror;
/// Point-of-sale operations
pub mod sale;
/// Product catalog and stock ledger operations
pub mod stock;
/// Trip lifecycle operations
pub mod trip;
/// Trip-scoped ledger operations
pub mod trip_entry;
