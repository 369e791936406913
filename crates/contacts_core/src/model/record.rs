//! Contact record: one name, ordered phones, optional birthday.
//!
//! # Invariants
//! - `name` is fixed at construction.
//! - Phones keep insertion order; duplicates are allowed.
//! - A failed validation never mutates the record.

use crate::model::field::{Birthday, FieldError, Name, Phone};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: Name,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
}

impl Record {
    /// Creates a record with no phones and no birthday.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            birthday: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    /// Validates and appends a phone. Does not check for existing values.
    pub fn add_phone(&mut self, raw: &str) -> Result<(), FieldError> {
        let phone = Phone::parse(raw)?;
        self.phones.push(phone);
        Ok(())
    }

    /// Appends an already validated phone.
    pub fn push_phone(&mut self, phone: Phone) {
        self.phones.push(phone);
    }

    /// Removes the first phone equal to `raw`.
    ///
    /// Returns `false` and leaves the list untouched when nothing matches.
    pub fn delete_phone(&mut self, raw: &str) -> bool {
        match self.position_of(raw) {
            Some(index) => {
                self.phones.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the first phone equal to `old` with a validated `new`.
    ///
    /// `new` is validated before the lookup, so an invalid replacement is
    /// reported even when `old` is not stored.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<bool, FieldError> {
        let replacement = Phone::parse(new)?;
        match self.position_of(old) {
            Some(index) => {
                self.phones[index] = replacement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn find_phone(&self, raw: &str) -> Option<&Phone> {
        self.phones.iter().find(|phone| phone.as_str() == raw)
    }

    /// Validates and stores the birthday, replacing any previous value.
    pub fn set_birthday(&mut self, raw: &str) -> Result<(), FieldError> {
        self.birthday = Some(Birthday::parse(raw)?);
        Ok(())
    }

    pub fn replace_birthday(&mut self, birthday: Option<Birthday>) {
        self.birthday = birthday;
    }

    /// Drops every stored phone.
    pub fn clear_phones(&mut self) {
        self.phones.clear();
    }

    fn position_of(&self, raw: &str) -> Option<usize> {
        self.phones.iter().position(|phone| phone.as_str() == raw)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let phones = self
            .phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Contact name: {}, phones: {}", self.name, phones)
    }
}
