//! rlab - A command-line client for the GitLab API
//!
//! Every subcommand describes its flags as a plain declaration struct. A
//! binder registers those flags on the command, and after parsing copies the
//! supplied values into the options struct of the matching API call. Along
//! the way it applies named value transforms (access level names to codes,
//! ISO dates) and enforces required flags.
//!
//! # Architecture
//!
//! - [`flags`] - Flag declarations, registration, transforms and binding
//! - [`api`] - The API seam: options structs, request construction, mock and preview
//! - [`core`] - Domain types and configuration
//! - [`cli`] - Command tree and dispatch
//! - [`ui`] - Output formatting

pub mod api;
pub mod cli;
pub mod core;
pub mod flags;
pub mod ui;
