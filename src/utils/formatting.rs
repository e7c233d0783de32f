//! Formatting utilities used for CLI outputs.

use crate::utils::colors::{RESET, fg_hex};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn italic(s: &str) -> String {
    format!("\x1b[3m{}\x1b[0m", s)
}

/// A coloured block followed by the label, e.g. `■ Code`.
pub fn swatch(colour: &str, label: &str) -> String {
    let fg = fg_hex(colour);
    if fg.is_empty() {
        format!("■ {label}")
    } else {
        format!("{fg}■{RESET} {label}")
    }
}

/// Visible width of a string, ignoring ANSI escape sequences.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(s));
    format!("{s}{}", " ".repeat(pad))
}
