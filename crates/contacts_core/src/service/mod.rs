//! Core use-case services.
//!
//! # Responsibility
//! - Turn user commands into address book operations.
//! - Keep the CLI decoupled from storage and validation details.

pub mod assistant;
