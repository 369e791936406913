//! Address book: canonical contact name to record.
//!
//! # Invariants
//! - Keys are canonical `Name` strings and unique.
//! - Re-adding a name overwrites the record in place (position is kept).
//! - Iteration follows insertion order.

use crate::model::record::Record;
use crate::schedule::birthdays::{self, UpcomingBirthday};
use chrono::NaiveDate;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    records: IndexMap<String, Record>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` under its canonical name, replacing any previous one.
    pub fn add_record(&mut self, record: Record) {
        self.records
            .insert(record.name().as_str().to_string(), record);
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.get_mut(name)
    }

    /// Removes `name` if present. Returns whether a record was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.records.shift_remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Returns records ordered by key, as written by persistence adapters.
    pub fn sorted_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        records
    }

    /// Lists contacts to congratulate within the next 7 days from `today`.
    ///
    /// Output order follows the book's iteration order.
    pub fn upcoming_birthdays(&self, today: NaiveDate) -> Vec<UpcomingBirthday> {
        let entries = self.records.values().filter_map(|record| {
            record
                .birthday()
                .map(|birthday| (record.name().as_str(), birthday))
        });
        birthdays::upcoming_birthdays(entries, today)
    }
}

#[cfg(test)]
mod tests {
    use super::AddressBook;
    use crate::model::field::Name;
    use crate::model::record::Record;
    use chrono::NaiveDate;

    fn record(name: &str, phone: &str) -> Record {
        let mut record = Record::new(Name::parse(name).unwrap());
        record.add_phone(phone).unwrap();
        record
    }

    #[test]
    fn add_record_overwrites_same_name() {
        let mut book = AddressBook::new();
        book.add_record(record("john", "1111111111"));
        book.add_record(record("anna", "3333333333"));
        book.add_record(record("John", "2222222222"));

        assert_eq!(book.len(), 2);
        let john = book.find("John").unwrap();
        assert_eq!(john.phones()[0].as_str(), "2222222222");
        let order: Vec<_> = book.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(order, vec!["John", "Anna"]);
    }

    #[test]
    fn find_uses_canonical_key() {
        let mut book = AddressBook::new();
        book.add_record(record("john", "1111111111"));
        assert!(book.find("John").is_some());
        assert!(book.find("john").is_none());
    }

    #[test]
    fn delete_is_noop_for_missing_name() {
        let mut book = AddressBook::new();
        book.add_record(record("john", "1111111111"));

        assert!(!book.delete("Jane"));
        assert_eq!(book.len(), 1);
        assert!(book.delete("John"));
        assert!(book.is_empty());
    }

    #[test]
    fn sorted_records_orders_by_name() {
        let mut book = AddressBook::new();
        book.add_record(record("zed", "1111111111"));
        book.add_record(record("amy", "2222222222"));
        let names: Vec<_> = book
            .sorted_records()
            .into_iter()
            .map(|r| r.name().as_str())
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[test]
    fn upcoming_birthdays_skips_records_without_birthday() {
        let mut book = AddressBook::new();
        let mut john = record("john", "1111111111");
        john.set_birthday("12.06.1990").unwrap();
        book.add_record(john);
        book.add_record(record("jane", "2222222222"));

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let upcoming = book.upcoming_birthdays(today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "John");
        assert_eq!(upcoming[0].congratulation_date, "12.06.2024");
    }
}
