//! Command dispatch over the address book.
//!
//! # Responsibility
//! - Parse one input line into a command and its arguments.
//! - Run the command against the owned `AddressBook`.
//! - Turn command errors into a single user-facing warning line.
//!
//! # Invariants
//! - Command errors never end the session; only exit commands do.
//! - Persistence happens only in `start` (load) and `save`.
//! - Contact names and phone numbers are never logged.

use crate::model::address_book::AddressBook;
use crate::model::field::{FieldError, Name, Phone};
use crate::model::record::Record;
use crate::repo::{ContactRepository, StoreResult};
use chrono::NaiveDate;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const GREETING: &str = "How can I help you?";
const INVALID_COMMAND: &str = "Invalid command.";

const HELP_TEXT: &str = "Available commands:
'hello' - Greets you, sir
'add' - Adds new record to your phonebook. Usage: 'add [name] [phone]'
'change' - Changes existing record or adds new record (if none). Usage: 'change [name] [phone]'
'show' - Shows existing record from your phonebook. Usage: 'show [name]'
'delete' - Deletes existing record from your phonebook. Usage: 'delete [name]'
'all' - Shows your phonebook
'add-phone' - Adds one more phone to a record. Usage: 'add-phone [name] [phone]'
'edit-phone' - Replaces a phone of a record. Usage: 'edit-phone [name] [old phone] [new phone]'
'remove-phone' - Removes a phone from a record. Usage: 'remove-phone [name] [phone]'
'find-phone' - Looks a phone up in a record. Usage: 'find-phone [name] [phone]'
'add-birthday' - Sets the birthday of a record. Usage: 'add-birthday [name] [DD.MM.YYYY]'
'show-birthday' - Shows the birthday of a record. Usage: 'show-birthday [name]'
'birthdays' - Shows whom to congratulate during the next 7 days
'close', 'exit' or 'quit' - Saves the phonebook and exits this program :(
'help' - Shows this text";

/// Supported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hello,
    Add,
    Change,
    Delete,
    Show,
    All,
    AddPhone,
    EditPhone,
    RemovePhone,
    FindPhone,
    AddBirthday,
    ShowBirthday,
    Birthdays,
    Help,
    Exit,
}

impl Command {
    /// Resolves a lower-cased command word.
    pub fn parse(word: &str) -> Option<Self> {
        let command = match word {
            "hello" => Self::Hello,
            "add" => Self::Add,
            "change" => Self::Change,
            "delete" => Self::Delete,
            "show" => Self::Show,
            "all" => Self::All,
            "add-phone" => Self::AddPhone,
            "edit-phone" => Self::EditPhone,
            "remove-phone" => Self::RemovePhone,
            "find-phone" => Self::FindPhone,
            "add-birthday" => Self::AddBirthday,
            "show-birthday" => Self::ShowBirthday,
            "birthdays" => Self::Birthdays,
            "help" => Self::Help,
            "close" | "exit" | "quit" => Self::Exit,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
            Self::Show => "show",
            Self::All => "all",
            Self::AddPhone => "add-phone",
            Self::EditPhone => "edit-phone",
            Self::RemovePhone => "remove-phone",
            Self::FindPhone => "find-phone",
            Self::AddBirthday => "add-birthday",
            Self::ShowBirthday => "show-birthday",
            Self::Birthdays => "birthdays",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Number of positional arguments; commands without arguments ignore extras.
    pub fn arity(self) -> usize {
        match self {
            Self::Delete | Self::Show | Self::ShowBirthday => 1,
            Self::Add
            | Self::Change
            | Self::AddPhone
            | Self::RemovePhone
            | Self::FindPhone
            | Self::AddBirthday => 2,
            Self::EditPhone => 3,
            Self::Hello | Self::All | Self::Birthdays | Self::Help | Self::Exit => 0,
        }
    }
}

/// Per-command warning lines, one per error kind.
struct CommandMessages {
    command: &'static str,
    usage: &'static str,
    not_found: &'static str,
}

const COMMAND_MESSAGES: &[CommandMessages] = &[
    CommandMessages {
        command: "add",
        usage: "To add a record please use: add [name] [phone]",
        not_found: "Contact is not found in the phonebook. Can't add",
    },
    CommandMessages {
        command: "change",
        usage: "To change a record please use: change [name] [new phone]",
        not_found: "Contact is not found in the phonebook. Can't change",
    },
    CommandMessages {
        command: "delete",
        usage: "To delete a record please use: delete [name]",
        not_found: "Contact is not found in the phonebook. Can't delete",
    },
    CommandMessages {
        command: "show",
        usage: "To show a record please use: show [name]",
        not_found: "Contact is not found in the phonebook. Can't show",
    },
    CommandMessages {
        command: "add-phone",
        usage: "To add a phone please use: add-phone [name] [phone]",
        not_found: "Contact is not found in the phonebook. Can't add a phone",
    },
    CommandMessages {
        command: "edit-phone",
        usage: "To edit a phone please use: edit-phone [name] [old phone] [new phone]",
        not_found: "Contact or phone is not found in the phonebook. Can't edit",
    },
    CommandMessages {
        command: "remove-phone",
        usage: "To remove a phone please use: remove-phone [name] [phone]",
        not_found: "Contact or phone is not found in the phonebook. Can't remove",
    },
    CommandMessages {
        command: "find-phone",
        usage: "To find a phone please use: find-phone [name] [phone]",
        not_found: "Contact or phone is not found in the phonebook",
    },
    CommandMessages {
        command: "add-birthday",
        usage: "To set a birthday please use: add-birthday [name] [DD.MM.YYYY]",
        not_found: "Contact is not found in the phonebook. Can't set a birthday",
    },
    CommandMessages {
        command: "show-birthday",
        usage: "To show a birthday please use: show-birthday [name]",
        not_found: "Contact or birthday is not found in the phonebook",
    },
];

fn messages_for(command: Command) -> Option<&'static CommandMessages> {
    COMMAND_MESSAGES
        .iter()
        .find(|messages| messages.command == command.name())
}

/// Recoverable command failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Malformed name, phone or date.
    Validation(FieldError),
    /// Lookup on a missing contact, phone or birthday.
    NotFound,
    /// Wrong number of arguments.
    Arity { expected: usize, actual: usize },
    UnknownCommand(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound => write!(f, "not found"),
            Self::Arity { expected, actual } => {
                write!(f, "expected {expected} argument(s), got {actual}")
            }
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for CommandError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

impl CommandError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound => "not_found",
            Self::Arity { .. } => "arity",
            Self::UnknownCommand(_) => "unknown_command",
        }
    }
}

/// Renders the warning line shown for `err` raised by `command`.
pub fn warning_message(command: Option<Command>, err: &CommandError) -> String {
    let messages = command.and_then(messages_for);
    match (err, messages) {
        (CommandError::Validation(detail), Some(messages)) => {
            format!("{}. {}", capitalize_first(&detail.to_string()), messages.usage)
        }
        (CommandError::Arity { .. }, Some(messages)) => messages.usage.to_string(),
        (CommandError::NotFound, Some(messages)) => messages.not_found.to_string(),
        (CommandError::UnknownCommand(_), _) | (_, None) => INVALID_COMMAND.to_string(),
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Presentation hint for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Added,
    Changed,
    Deleted,
    Info,
    Warn,
}

/// Outcome of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub lines: Vec<String>,
    /// Set when the session should save and stop.
    pub exit: bool,
}

impl Reply {
    fn new(kind: ReplyKind, line: impl Into<String>) -> Self {
        Self {
            kind,
            lines: vec![line.into()],
            exit: false,
        }
    }

    fn many(kind: ReplyKind, lines: Vec<String>) -> Self {
        Self {
            kind,
            lines,
            exit: false,
        }
    }

    fn exit() -> Self {
        Self {
            kind: ReplyKind::Info,
            lines: Vec::new(),
            exit: true,
        }
    }

    fn empty() -> Self {
        Self::many(ReplyKind::Info, Vec::new())
    }
}

/// Splits a line into a lower-cased command word and its arguments.
///
/// Returns `None` for blank input.
pub fn parse_input(line: &str) -> Option<(String, Vec<&str>)> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.collect()))
}

/// Interactive session state: the repository and the book loaded from it.
pub struct Assistant<R: ContactRepository> {
    repo: R,
    book: AddressBook,
}

impl<R: ContactRepository> Assistant<R> {
    /// Loads the book from `repo`.
    pub fn start(repo: R) -> StoreResult<Self> {
        let book = repo.load()?;
        Ok(Self { repo, book })
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    /// Writes the current book back to the repository.
    pub fn save(&self) -> StoreResult<()> {
        self.repo.save(&self.book)
    }

    /// Runs one input line and returns what to show the user.
    ///
    /// `today` drives the `birthdays` command.
    pub fn handle_line(&mut self, line: &str, today: NaiveDate) -> Reply {
        let Some((word, args)) = parse_input(line) else {
            return Reply::empty();
        };

        let command = Command::parse(&word);
        let result = match command {
            Some(command) => self.execute(command, &args, today),
            None => Err(CommandError::UnknownCommand(word)),
        };

        match result {
            Ok(reply) => {
                debug!(
                    "event=command module=service status=ok command={}",
                    command.map_or("unknown", Command::name)
                );
                reply
            }
            Err(err) => {
                warn!(
                    "event=command module=service status=error command={} error_kind={}",
                    command.map_or("unknown", Command::name),
                    err.kind()
                );
                Reply::new(ReplyKind::Warn, warning_message(command, &err))
            }
        }
    }

    /// Runs a parsed command.
    pub fn execute(
        &mut self,
        command: Command,
        args: &[&str],
        today: NaiveDate,
    ) -> Result<Reply, CommandError> {
        let expected = command.arity();
        if expected > 0 && args.len() != expected {
            return Err(CommandError::Arity {
                expected,
                actual: args.len(),
            });
        }

        match command {
            Command::Hello => Ok(Reply::new(ReplyKind::Info, GREETING)),
            Command::Help => Ok(Reply::new(ReplyKind::Info, HELP_TEXT)),
            Command::Exit => Ok(Reply::exit()),
            Command::Add => self.add_contact(args[0], args[1]),
            Command::Change => self.change_contact(args[0], args[1]),
            Command::Delete => Ok(self.delete_contact(args[0])),
            Command::Show => self.show_contact(args[0]),
            Command::All => Ok(self.show_all()),
            Command::AddPhone => self.add_phone(args[0], args[1]),
            Command::EditPhone => self.edit_phone(args[0], args[1], args[2]),
            Command::RemovePhone => self.remove_phone(args[0], args[1]),
            Command::FindPhone => self.find_phone(args[0], args[1]),
            Command::AddBirthday => self.add_birthday(args[0], args[1]),
            Command::ShowBirthday => self.show_birthday(args[0]),
            Command::Birthdays => Ok(self.upcoming(today)),
        }
    }

    fn add_contact(&mut self, raw_name: &str, raw_phone: &str) -> Result<Reply, CommandError> {
        let mut record = Record::new(Name::parse(raw_name)?);
        record.add_phone(raw_phone)?;
        let line = format!("Contact {} added.", record.name());
        self.book.add_record(record);
        Ok(Reply::new(ReplyKind::Added, line))
    }

    fn change_contact(&mut self, raw_name: &str, raw_phone: &str) -> Result<Reply, CommandError> {
        let name = Name::parse(raw_name)?;
        let phone = Phone::parse(raw_phone)?;
        let line = format!("Contact {name} changed.");

        match self.book.find_mut(name.as_str()) {
            Some(record) => {
                record.clear_phones();
                record.push_phone(phone);
            }
            None => {
                let mut record = Record::new(name);
                record.push_phone(phone);
                self.book.add_record(record);
            }
        }
        Ok(Reply::new(ReplyKind::Changed, line))
    }

    fn delete_contact(&mut self, raw_name: &str) -> Reply {
        let key = lookup_key(raw_name);
        if self.book.delete(&key) {
            Reply::new(ReplyKind::Deleted, format!("Contact {key} deleted."))
        } else {
            Reply::new(
                ReplyKind::Info,
                format!("Contact {key} is not in the phonebook. Nothing to delete."),
            )
        }
    }

    fn show_contact(&self, raw_name: &str) -> Result<Reply, CommandError> {
        let record = self.record(raw_name)?;
        Ok(Reply::new(ReplyKind::Info, render_record(record)))
    }

    fn show_all(&self) -> Reply {
        if self.book.is_empty() {
            return Reply::new(ReplyKind::Info, "The phonebook is empty.");
        }

        let mut lines = vec!["Your existing contacts, sir:".to_string()];
        lines.extend(
            self.book
                .iter()
                .enumerate()
                .map(|(index, record)| format!("{}. {}", index + 1, render_record(record))),
        );
        Reply::many(ReplyKind::Info, lines)
    }

    fn add_phone(&mut self, raw_name: &str, raw_phone: &str) -> Result<Reply, CommandError> {
        let record = self.record_mut(raw_name)?;
        record.add_phone(raw_phone)?;
        Ok(Reply::new(
            ReplyKind::Added,
            format!("Phone added to contact {}.", record.name()),
        ))
    }

    fn edit_phone(
        &mut self,
        raw_name: &str,
        old: &str,
        new: &str,
    ) -> Result<Reply, CommandError> {
        let record = self.record_mut(raw_name)?;
        if !record.edit_phone(old, new)? {
            return Err(CommandError::NotFound);
        }
        Ok(Reply::new(
            ReplyKind::Changed,
            format!("Phone of contact {} changed.", record.name()),
        ))
    }

    fn remove_phone(&mut self, raw_name: &str, raw_phone: &str) -> Result<Reply, CommandError> {
        let record = self.record_mut(raw_name)?;
        if !record.delete_phone(raw_phone) {
            return Err(CommandError::NotFound);
        }
        Ok(Reply::new(
            ReplyKind::Deleted,
            format!("Phone removed from contact {}.", record.name()),
        ))
    }

    fn find_phone(&self, raw_name: &str, raw_phone: &str) -> Result<Reply, CommandError> {
        let record = self.record(raw_name)?;
        let phone = record.find_phone(raw_phone).ok_or(CommandError::NotFound)?;
        Ok(Reply::new(
            ReplyKind::Info,
            format!("{}: {phone}", record.name()),
        ))
    }

    fn add_birthday(&mut self, raw_name: &str, raw_date: &str) -> Result<Reply, CommandError> {
        let record = self.record_mut(raw_name)?;
        record.set_birthday(raw_date)?;
        Ok(Reply::new(
            ReplyKind::Added,
            format!("Birthday added to contact {}.", record.name()),
        ))
    }

    fn show_birthday(&self, raw_name: &str) -> Result<Reply, CommandError> {
        let record = self.record(raw_name)?;
        let birthday = record.birthday().ok_or(CommandError::NotFound)?;
        Ok(Reply::new(
            ReplyKind::Info,
            format!("{}: {birthday}", record.name()),
        ))
    }

    fn upcoming(&self, today: NaiveDate) -> Reply {
        let upcoming = self.book.upcoming_birthdays(today);
        if upcoming.is_empty() {
            return Reply::new(ReplyKind::Info, "No birthdays in the next 7 days.");
        }
        let lines = upcoming
            .into_iter()
            .map(|entry| format!("{}: {}", entry.name, entry.congratulation_date))
            .collect();
        Reply::many(ReplyKind::Info, lines)
    }

    fn record(&self, raw_name: &str) -> Result<&Record, CommandError> {
        self.book
            .find(&lookup_key(raw_name))
            .ok_or(CommandError::NotFound)
    }

    fn record_mut(&mut self, raw_name: &str) -> Result<&mut Record, CommandError> {
        self.book
            .find_mut(&lookup_key(raw_name))
            .ok_or(CommandError::NotFound)
    }
}

/// Canonical book key for a user-typed name; invalid names are used verbatim
/// and simply never match.
fn lookup_key(raw_name: &str) -> String {
    Name::parse(raw_name)
        .map(|name| name.as_str().to_string())
        .unwrap_or_else(|_| raw_name.to_string())
}

fn render_record(record: &Record) -> String {
    match record.birthday() {
        Some(birthday) => format!("{record}, birthday: {birthday}"),
        None => record.to_string(),
    }
}
