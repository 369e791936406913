//! Core domain logic for the contacts assistant.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address_book::AddressBook;
pub use model::field::{Birthday, Field, FieldError, FieldKind, Name, Phone};
pub use model::record::Record;
pub use repo::{
    open_repository, ContactRepository, JsonContactRepository, SqliteContactRepository,
    StoreError, StoreKind, StoreResult,
};
pub use schedule::birthdays::UpcomingBirthday;
pub use service::assistant::{Assistant, Command, CommandError, Reply, ReplyKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
