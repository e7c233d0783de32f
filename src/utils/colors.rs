/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";

/// Truecolor foreground escape for a `#RRGGBB` colour; empty when the
/// value is not a valid hex colour.
pub fn fg_hex(colour: &str) -> String {
    match hex_to_rgb(colour) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        None => String::new(),
    }
}

pub fn hex_to_rgb(colour: &str) -> Option<(u8, u8, u8)> {
    let hex = colour.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn dim(value: &str) -> String {
    format!("{GREY}{value}{RESET}")
}

/// Green for the running item, plain otherwise.
pub fn colorize_running(value: &str, running: bool) -> String {
    if running {
        format!("{GREEN}{value}{RESET}")
    } else {
        value.to_string()
    }
}
