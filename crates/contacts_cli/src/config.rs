//! Command-line and environment configuration.
//!
//! Every setting can come from a flag or a `CONTACTS_*` variable; flags win.

use clap::Parser;
use contacts_core::StoreKind;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Interactive contact book with birthday reminders.
#[derive(Debug, Clone, Parser)]
#[command(name = "contacts", version, about)]
pub struct CliConfig {
    /// Contact store file (`.json`, or `.db`/`.sqlite` for SQLite)
    #[arg(long, env = "CONTACTS_BOOK", default_value = "contacts.json")]
    pub book: PathBuf,

    /// Storage backend; inferred from the file extension when omitted
    #[arg(long, env = "CONTACTS_STORE", value_parser = parse_store_kind)]
    pub store: Option<StoreKind>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "CONTACTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, env = "CONTACTS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print replies without colors
    #[arg(long, env = "CONTACTS_NO_COLOR")]
    pub no_color: bool,
}

impl CliConfig {
    pub fn log_level(&self) -> &str {
        match self.log_level.as_deref() {
            Some(level) => level,
            None => contacts_core::default_log_level(),
        }
    }

    /// Absolute log directory: the configured one, else the platform data dir.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| std::env::temp_dir().join(dir)),
            None => ProjectDirs::from("", "", "contacts")
                .map(|dirs| dirs.data_local_dir().join("logs"))
                .unwrap_or_else(|| std::env::temp_dir().join("contacts-logs")),
        }
    }
}

fn parse_store_kind(value: &str) -> Result<StoreKind, String> {
    StoreKind::parse(value).ok_or_else(|| format!("unknown store `{value}`; expected json|sqlite"))
}
