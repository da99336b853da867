//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! All command output goes through this module so that `--quiet` and the
//! configured JSON style apply uniformly.

pub mod output;
