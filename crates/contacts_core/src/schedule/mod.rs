//! Date scheduling over contact birthdays.
//!
//! # Responsibility
//! - Project birthdays onto the next occurrence relative to a given day.
//! - Move weekend congratulations to the following Monday.
//!
//! # Invariants
//! - No wall-clock reads; callers pass `today` explicitly.

pub mod birthdays;
