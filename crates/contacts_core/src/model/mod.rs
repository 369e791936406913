//! Contact domain model.
//!
//! # Responsibility
//! - Define validated field values (`Name`, `Phone`, `Birthday`).
//! - Compose them into `Record` and the owning `AddressBook`.
//!
//! # Invariants
//! - Field values exist only through their validating constructors.
//! - `AddressBook` exclusively owns its records; records own their fields.

pub mod address_book;
pub mod field;
pub mod record;
