//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget_entry;
pub mod game_event;
pub mod kinds;
pub mod member;
pub mod product;
pub mod sale;
pub mod sale_item;
pub mod trip;
pub mod trip_entry;

pub use kinds::{EntryKind, TripStatus};

// Re-export specific types to avoid conflicts
pub use budget_entry::{Column as BudgetEntryColumn, Entity as BudgetEntry, Model as BudgetEntryModel};
pub use game_event::{Column as GameEventColumn, Entity as GameEvent, Model as GameEventModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use sale_item::{Column as SaleItemColumn, Entity as SaleItem, Model as SaleItemModel};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
pub use trip_entry::{Column as TripEntryColumn, Entity as TripEntry, Model as TripEntryModel};
