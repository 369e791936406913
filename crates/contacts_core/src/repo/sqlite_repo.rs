//! SQLite contact repository.
//!
//! # Invariants
//! - `save` replaces every row inside a single transaction.
//! - Phone order is kept through `contact_phones.position`.
//! - Loaded rows go through field validation before entering the book.

use super::{decode_record, insert_loaded, ContactRepository, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::address_book::AddressBook;
use log::info;
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::path::Path;

pub struct SqliteContactRepository {
    // `save` needs `&mut Connection` for a transaction while the trait takes `&self`.
    conn: RefCell<Connection>,
}

impl SqliteContactRepository {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl ContactRepository for SqliteContactRepository {
    fn load(&self) -> StoreResult<AddressBook> {
        let conn = self.conn.borrow();
        let mut contact_stmt =
            conn.prepare("SELECT name, birthday FROM contacts ORDER BY name ASC;")?;
        let mut phone_stmt = conn.prepare(
            "SELECT phone FROM contact_phones WHERE contact_name = ?1 ORDER BY position ASC;",
        )?;

        let contacts = contact_stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut book = AddressBook::new();
        for (name, birthday) in contacts {
            let phones = phone_stmt
                .query_map([name.as_str()], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            let record = decode_record(
                &name,
                phones.iter().map(String::as_str),
                birthday.as_deref(),
            )?;
            insert_loaded(&mut book, &name, record)?;
        }

        info!(
            "event=store_load module=repo status=ok backend=sqlite contacts={}",
            book.len()
        );
        Ok(book)
    }

    fn save(&self, book: &AddressBook) -> StoreResult<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM contact_phones;", [])?;
        tx.execute("DELETE FROM contacts;", [])?;

        {
            let mut insert_contact =
                tx.prepare("INSERT INTO contacts (name, birthday) VALUES (?1, ?2);")?;
            let mut insert_phone = tx.prepare(
                "INSERT INTO contact_phones (contact_name, position, phone) VALUES (?1, ?2, ?3);",
            )?;

            for record in book.sorted_records() {
                let name = record.name().as_str();
                insert_contact.execute(params![
                    name,
                    record.birthday().map(ToString::to_string)
                ])?;
                for (position, phone) in record.phones().iter().enumerate() {
                    insert_phone.execute(params![name, position as i64, phone.as_str()])?;
                }
            }
        }
        tx.commit()?;

        info!(
            "event=store_save module=repo status=ok backend=sqlite contacts={}",
            book.len()
        );
        Ok(())
    }
}
