//! SQLite storage bootstrap for the contact store.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Contacts are never read or written before migrations succeed.
//! - Failures surface as `StoreError::Sqlite` or
//!   `StoreError::UnsupportedSchemaVersion`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
