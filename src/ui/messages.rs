//! Terminal messages shown to the user. Diagnostics go through `log`.

use std::fmt::Display;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Info,
    Success,
    Warning,
    Error,
    Running,
}

impl Tone {
    fn colour(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[34m",
            Tone::Success | Tone::Running => "\x1b[32m",
            Tone::Warning => "\x1b[33m",
            Tone::Error => "\x1b[31m",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Tone::Info => "ℹ️",
            Tone::Success => "✅",
            Tone::Warning => "⚠️",
            Tone::Error => "❌",
            Tone::Running => "⏱️",
        }
    }
}

fn line(tone: Tone, msg: &dyn Display) -> String {
    format!("{}{}{} {RESET}{msg}", tone.colour(), BOLD, tone.icon())
}

pub fn info<T: Display>(msg: T) {
    println!("{}", line(Tone::Info, &msg));
}

pub fn success<T: Display>(msg: T) {
    println!("{}", line(Tone::Success, &msg));
}

pub fn warning<T: Display>(msg: T) {
    println!("{}", line(Tone::Warning, &msg));
}

/// Written to stderr.
pub fn error<T: Display>(msg: T) {
    eprintln!("{}", line(Tone::Error, &msg));
}

/// The time box currently being tracked.
pub fn running<T: Display>(msg: T) {
    println!("{}", line(Tone::Running, &msg));
}

/// Title above a table, e.g. `── Session 3 ──`.
pub fn header<T: Display>(msg: T) {
    println!("{}{BOLD}── {msg} ──{RESET}", Tone::Info.colour());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_follows_the_icon() {
        let out = line(Tone::Running, &"Code for 5m");
        assert!(out.starts_with("\x1b[32m"));
        assert!(out.contains("⏱️"));
        assert!(out.ends_with(" \x1b[0mCode for 5m"));
    }
}
