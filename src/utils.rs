//! Terminal styling helpers shared by the printers.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Color only on an interactive stdout and when `NO_COLOR` is unset.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn header(name: &str, color: bool) -> String {
    let text = format!("<<< {} >>>", name);
    if color {
        text.bold().to_string()
    } else {
        text
    }
}

pub fn error_prefix(color: bool) -> String {
    if color {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn warning_prefix(color: bool) -> String {
    if color {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    }
}
