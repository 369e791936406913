//! Interactive contacts assistant.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the contact store.
//! - Run the read-eval-print loop over stdin/stdout.
//! - Save the book when the user exits or input ends.

mod config;
mod palette;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use config::CliConfig;
use contacts_core::{open_repository, Assistant, ContactRepository, ReplyKind};
use log::info;
use palette::Palette;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "Enter a command: ";

fn main() -> Result<()> {
    let config = CliConfig::parse();

    let log_dir = config.log_dir();
    if let Err(err) = contacts_core::init_logging(config.log_level(), &log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let repo = open_repository(&config.book, config.store)
        .with_context(|| format!("failed to open contact store `{}`", config.book.display()))?;
    let assistant = Assistant::start(repo)
        .with_context(|| format!("failed to load contacts from `{}`", config.book.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(
        assistant,
        stdin.lock(),
        stdout.lock(),
        Palette::new(!config.no_color),
        || Local::now().date_naive(),
    )
}

/// Runs the session until an exit command or end of input, then saves.
fn run_session<R, I, O, T>(
    mut assistant: Assistant<R>,
    input: I,
    mut output: O,
    palette: Palette,
    today: T,
) -> Result<()>
where
    R: ContactRepository,
    I: BufRead,
    O: Write,
    T: Fn() -> NaiveDate,
{
    info!(
        "event=session_start module=cli status=ok contacts={}",
        assistant.book().len()
    );

    if !assistant.book().is_empty() {
        let reply = assistant.handle_line("all", today());
        for line in &reply.lines {
            writeln!(output, "{}", palette.paint(reply.kind, line))?;
        }
    }
    writeln!(output, "Welcome to the assistant bot!")?;
    writeln!(output, "Please use 'help' command for more information")?;
    writeln!(output)?;

    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line.context("failed to read command")?;

        let reply = assistant.handle_line(&line, today());
        for text in &reply.lines {
            writeln!(output, "{}", palette.paint(reply.kind, text))?;
        }
        if reply.exit {
            break;
        }
    }

    assistant.save().context("failed to save contacts")?;
    info!(
        "event=session_end module=cli status=ok contacts={}",
        assistant.book().len()
    );
    writeln!(
        output,
        "{}",
        palette.paint(ReplyKind::Info, "Phonebook is saved. Good bye!")
    )?;
    Ok(())
}
