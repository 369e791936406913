//! JSON file contact repository.
//!
//! # Responsibility
//! - Read and write the address book as one JSON object keyed by name.
//! - Accept legacy files that map a name to a single phone string.
//!
//! # Invariants
//! - Keys are written in lexicographic order with 4-space indentation.
//! - Saves go through a sibling temp file and a rename, so a failed write
//!   never truncates the previous file.

use super::{decode_record, insert_loaded, ContactRepository, StoreError, StoreResult};
use crate::model::address_book::AddressBook;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// On-disk shape of one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredContact {
    Full {
        phones: Vec<String>,
        #[serde(default)]
        birthday: Option<String>,
    },
    /// `"name": "0123456789"` files written before records carried
    /// multiple phones and birthdays.
    Legacy(String),
}

pub struct JsonContactRepository {
    path: PathBuf,
}

impl JsonContactRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl ContactRepository for JsonContactRepository {
    fn load(&self) -> StoreResult<AddressBook> {
        let started_at = Instant::now();
        if !self.path.exists() {
            info!("event=store_load module=repo status=ok backend=json contacts=0 existing=false");
            return Ok(AddressBook::new());
        }

        let result = fs::read_to_string(&self.path)
            .map_err(|err| self.io_error(err))
            .and_then(|text| parse_book(&text));

        match &result {
            Ok(book) => info!(
                "event=store_load module=repo status=ok backend=json contacts={} duration_ms={}",
                book.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_load module=repo status=error backend=json error={err}"
            ),
        }
        result
    }

    fn save(&self, book: &AddressBook) -> StoreResult<()> {
        let started_at = Instant::now();
        let text = render_book(book)?;
        let temp_path = self.temp_path();

        let result = fs::write(&temp_path, text)
            .and_then(|()| fs::rename(&temp_path, &self.path))
            .map_err(|err| self.io_error(err));

        match &result {
            Ok(()) => info!(
                "event=store_save module=repo status=ok backend=json contacts={} duration_ms={}",
                book.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                error!("event=store_save module=repo status=error backend=json error={err}");
            }
        }
        result
    }
}

fn parse_book(text: &str) -> StoreResult<AddressBook> {
    let stored: BTreeMap<String, StoredContact> = serde_json::from_str(text)?;
    let mut book = AddressBook::new();
    for (name, contact) in &stored {
        let record = match contact {
            StoredContact::Full { phones, birthday } => decode_record(
                name,
                phones.iter().map(String::as_str),
                birthday.as_deref(),
            )?,
            StoredContact::Legacy(phone) => decode_record(name, [phone.as_str()], None)?,
        };
        insert_loaded(&mut book, name, record)?;
    }
    Ok(book)
}

fn render_book(book: &AddressBook) -> StoreResult<String> {
    let stored: BTreeMap<&str, StoredContact> = book
        .iter()
        .map(|record| {
            let contact = StoredContact::Full {
                phones: record.phones().iter().map(ToString::to_string).collect(),
                birthday: record.birthday().map(ToString::to_string),
            };
            (record.name().as_str(), contact)
        })
        .collect();

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    stored.serialize(&mut serializer)?;
    buffer.push(b'\n');

    String::from_utf8(buffer)
        .map_err(|err| StoreError::InvalidData(format!("rendered JSON is not UTF-8: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{parse_book, render_book};
    use crate::model::address_book::AddressBook;
    use crate::model::field::Name;
    use crate::model::record::Record;
    use crate::repo::StoreError;

    #[test]
    fn render_sorts_keys_and_uses_four_space_indent() {
        let mut book = AddressBook::new();
        let mut zed = Record::new(Name::parse("zed").unwrap());
        zed.add_phone("1111111111").unwrap();
        book.add_record(zed);
        let mut amy = Record::new(Name::parse("amy").unwrap());
        amy.add_phone("2222222222").unwrap();
        amy.set_birthday("03.04.1995").unwrap();
        book.add_record(amy);

        let text = render_book(&book).unwrap();
        let amy_at = text.find("\"Amy\"").unwrap();
        let zed_at = text.find("\"Zed\"").unwrap();
        assert!(amy_at < zed_at);
        assert!(text.contains("\n    \"Amy\": {\n        \"phones\""));
        assert!(text.contains("\"birthday\": \"03.04.1995\""));
        assert!(text.contains("\"birthday\": null"));
    }

    #[test]
    fn parse_accepts_legacy_single_phone_values() {
        let book = parse_book(r#"{"bob": "0123456789", "Eve": {"phones": []}}"#).unwrap();
        let bob = book.find("Bob").unwrap();
        assert_eq!(bob.phones()[0].as_str(), "0123456789");
        assert!(book.find("Eve").unwrap().phones().is_empty());
    }

    #[test]
    fn parse_rejects_invalid_persisted_phone() {
        let err = parse_book(r#"{"Bob": "12-34"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn parse_rejects_keys_equal_after_canonicalization() {
        let err = parse_book(r#"{"bob": "0123456789", "Bob": "1111111111"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(message) if message.contains("Bob")));
    }

    #[test]
    fn parse_rejects_corrupt_json() {
        let err = parse_book("{\"Bob\": ").unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn empty_book_renders_empty_object() {
        assert_eq!(render_book(&AddressBook::new()).unwrap(), "{}\n");
    }
}
