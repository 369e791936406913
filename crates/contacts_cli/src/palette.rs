//! Reply coloring.

use colored::{Color, Colorize};
use contacts_core::ReplyKind;

/// Colors per reply kind, built from config and handed to the session loop.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
    added: Color,
    changed: Color,
    deleted: Color,
    info: Color,
    warn: Color,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            added: Color::Green,
            changed: Color::Blue,
            deleted: Color::Red,
            info: Color::White,
            warn: Color::Yellow,
        }
    }

    pub fn paint(&self, kind: ReplyKind, line: &str) -> String {
        if !self.enabled {
            return line.to_string();
        }
        let color = match kind {
            ReplyKind::Added => self.added,
            ReplyKind::Changed => self.changed,
            ReplyKind::Deleted => self.deleted,
            ReplyKind::Info => self.info,
            ReplyKind::Warn => self.warn,
        };
        line.color(color).to_string()
    }
}
