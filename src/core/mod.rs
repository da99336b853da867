//! core
//!
//! Core domain types and configuration for rlab.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Identifier
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
