//! Persistence adapters for the address book.
//!
//! # Responsibility
//! - Define the load/save contract used at session start and shutdown.
//! - Provide JSON file and SQLite implementations.
//!
//! # Invariants
//! - `save` replaces persisted state entirely, in key order.
//! - Read paths validate persisted values and reject invalid data
//!   instead of masking it.
//! - A missing store loads as an empty book.

use crate::model::address_book::AddressBook;
use crate::model::field::{Birthday, FieldError, Name, Phone};
use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod json_repo;
pub mod sqlite_repo;

pub use json_repo::JsonContactRepository;
pub use sqlite_repo::SqliteContactRepository;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure. Aborts startup or shutdown.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Sqlite(rusqlite::Error),
    /// The database was written by a newer schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Persisted values that fail validation or collide after canonicalization.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "contact store `{}` I/O failed: {source}", path.display())
            }
            Self::Json(err) => write!(f, "contact store is not valid JSON: {err}"),
            Self::Sqlite(err) => write!(f, "contact database failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "contact database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Repository interface for whole-book persistence.
pub trait ContactRepository {
    fn load(&self) -> StoreResult<AddressBook>;
    fn save(&self, book: &AddressBook) -> StoreResult<()>;
}

impl<R: ContactRepository + ?Sized> ContactRepository for Box<R> {
    fn load(&self) -> StoreResult<AddressBook> {
        (**self).load()
    }

    fn save(&self, book: &AddressBook) -> StoreResult<()> {
        (**self).save(book)
    }
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Sqlite,
}

impl StoreKind {
    /// Infers the backend from the file extension; unknown extensions use JSON.
    pub fn infer(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Json,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Opens the repository for `path`, inferring the backend when `kind` is `None`.
pub fn open_repository(
    path: impl Into<PathBuf>,
    kind: Option<StoreKind>,
) -> StoreResult<Box<dyn ContactRepository>> {
    let path = path.into();
    let kind = kind.unwrap_or_else(|| StoreKind::infer(&path));
    Ok(match kind {
        StoreKind::Json => Box::new(JsonContactRepository::new(path)),
        StoreKind::Sqlite => Box::new(SqliteContactRepository::open(&path)?),
    })
}

/// Rebuilds one record from persisted strings, validating every field.
pub(crate) fn decode_record<'a>(
    raw_name: &str,
    raw_phones: impl IntoIterator<Item = &'a str>,
    raw_birthday: Option<&str>,
) -> StoreResult<Record> {
    let name = Name::parse(raw_name).map_err(|err| invalid_field(raw_name, err))?;
    let mut record = Record::new(name);
    for raw_phone in raw_phones {
        let phone = Phone::parse(raw_phone).map_err(|err| invalid_field(raw_name, err))?;
        record.push_phone(phone);
    }
    if let Some(raw_birthday) = raw_birthday {
        let birthday =
            Birthday::parse(raw_birthday).map_err(|err| invalid_field(raw_name, err))?;
        record.replace_birthday(Some(birthday));
    }
    Ok(record)
}

/// Adds a loaded record, failing when its canonical name is already taken.
///
/// Persisted keys such as `bob` and `Bob` canonicalize to the same name;
/// keeping either one would drop the other on the next save.
pub(crate) fn insert_loaded(
    book: &mut AddressBook,
    raw_name: &str,
    record: Record,
) -> StoreResult<()> {
    if book.contains(record.name().as_str()) {
        return Err(StoreError::InvalidData(format!(
            "contact `{raw_name}` duplicates `{}` after canonicalization",
            record.name()
        )));
    }
    book.add_record(record);
    Ok(())
}

fn invalid_field(contact: &str, err: FieldError) -> StoreError {
    StoreError::InvalidData(format!("contact `{contact}`: {err}"))
}
