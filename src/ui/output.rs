//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Command results are JSON documents printed to stdout. Diagnostics go to
//! stderr. Quiet mode suppresses everything except errors.

use std::fmt::Display;

use serde::Serialize;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over debug.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Render a value as JSON text.
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Print a value as JSON (respects quiet mode).
pub fn print_json<T: Serialize + ?Sized>(
    value: &T,
    pretty: bool,
    verbosity: Verbosity,
) -> serde_json::Result<()> {
    if verbosity != Verbosity::Quiet {
        println!("{}", render_json(value, pretty)?);
    }
    Ok(())
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}
