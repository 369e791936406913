//! Validated contact field values.
//!
//! # Responsibility
//! - Turn raw user/persisted strings into typed `Name`, `Phone`, `Birthday`.
//! - Report validation failures as `FieldError`.
//!
//! # Invariants
//! - `Name` is non-empty, Unicode letters only, first character upper-cased.
//! - `Phone` is exactly 10 ASCII digits.
//! - `Birthday` is a real calendar date written as `DD.MM.YYYY`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Textual date format accepted and produced for birthdays.
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}+$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));
static BIRTHDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])\.(0[1-9]|1[0-2])\.([0-9]{4})$")
        .expect("valid birthday regex")
});

/// Validation failure for a single field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    EmptyName,
    InvalidName(String),
    InvalidPhone(String),
    /// Input does not match `DD.MM.YYYY`.
    InvalidBirthdayFormat(String),
    /// Input matches the pattern but is not a calendar date (e.g. `30.02.2024`).
    InvalidBirthdayDate(String),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidName(value) => {
                write!(f, "name must contain only letters, got `{value}`")
            }
            Self::InvalidPhone(value) => {
                write!(f, "phone number must be exactly 10 digits, got `{value}`")
            }
            Self::InvalidBirthdayFormat(value) => {
                write!(f, "invalid date format `{value}`, use DD.MM.YYYY")
            }
            Self::InvalidBirthdayDate(value) => write!(f, "`{value}` is not a calendar date"),
        }
    }
}

impl Error for FieldError {}

/// Contact name in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Validates `raw` and upper-cases its first character.
    ///
    /// Letters are Unicode general category `L*`; letter numbers such as `Ⅻ`
    /// and combining marks are rejected. Only the first character changes
    /// case; `mcDonald` becomes `McDonald`.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let mut chars = raw.chars();
        let first = chars.next().ok_or(FieldError::EmptyName)?;
        if !NAME_RE.is_match(raw) {
            return Err(FieldError::InvalidName(raw.to_string()));
        }

        let mut canonical: String = first.to_uppercase().collect();
        canonical.push_str(chars.as_str());
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ten-digit phone number, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        if !PHONE_RE.is_match(raw) {
            return Err(FieldError::InvalidPhone(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Birth date parsed from `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parses a strict `DD.MM.YYYY` string.
    ///
    /// # Errors
    /// - `InvalidBirthdayFormat` when the pattern does not match.
    /// - `InvalidBirthdayDate` when day/month/year do not form a real date,
    ///   including Feb 29 outside leap years.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let captures = BIRTHDAY_RE
            .captures(raw)
            .ok_or_else(|| FieldError::InvalidBirthdayFormat(raw.to_string()))?;

        let number = |index: usize| -> Result<u32, FieldError> {
            captures[index]
                .parse::<u32>()
                .map_err(|_| FieldError::InvalidBirthdayFormat(raw.to_string()))
        };
        let day = number(1)?;
        let month = number(2)?;
        let year = number(3)? as i32;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| FieldError::InvalidBirthdayDate(raw.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl From<NaiveDate> for Birthday {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

/// Kind selector for `Field::parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    Birthday,
}

/// One validated field value, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Name(Name),
    Phone(Phone),
    Birthday(Birthday),
}

impl Field {
    /// Validates `raw` as the requested kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, FieldError> {
        match kind {
            FieldKind::Name => Name::parse(raw).map(Self::Name),
            FieldKind::Phone => Phone::parse(raw).map(Self::Phone),
            FieldKind::Birthday => Birthday::parse(raw).map(Self::Birthday),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Name(_) => FieldKind::Name,
            Self::Phone(_) => FieldKind::Phone,
            Self::Birthday(_) => FieldKind::Birthday,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(value) => value.fmt(f),
            Self::Phone(value) => value.fmt(f),
            Self::Birthday(value) => value.fmt(f),
        }
    }
}
