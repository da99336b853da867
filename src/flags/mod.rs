//! flags
//!
//! Declarative flag binding for subcommands.
//!
//! # Overview
//!
//! Every subcommand declares two independent structs:
//!
//! - a **flag declaration** ([`flag_declaration!`](crate::flag_declaration)):
//!   what the user can type, one `Option<_>` field per flag with its name,
//!   shorthand, kind, required-ness, help text and optional transform;
//! - an **options struct** ([`bind_target!`](crate::bind_target)): what the
//!   API call consumes.
//!
//! A [`FlagMapper`] ties the two together:
//!
//! 1. at command construction it extracts and validates the descriptors,
//!    resolves transforms and destination fields, and registers one clap
//!    flag per descriptor ([`FlagMapper::register`]);
//! 2. at invocation it parses clap's matches into a fresh declaration value
//!    ([`FlagMapper::parse`]) and binds it into a fresh options value
//!    ([`FlagMapper::bind`]).
//!
//! # Modules
//!
//! - [`descriptor`] - Flag metadata and its validation
//! - [`value`] - Kind markers and value conversions
//! - [`declaration`] - Declaration trait, descriptor tables, parsing
//! - [`registry`] - Registration on clap commands
//! - [`transform`] - Named value transforms
//! - [`mapper`] - Destination slots and the binder
//! - [`error`] - Error type

pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod transform;
pub mod value;

pub use clap::ArgMatches;
pub use declaration::{extract, Declaration, Field, FlagDeclaration};
pub use descriptor::{flag, FlagDescriptor, FlagKind, FlagSpec};
pub use error::FlagError;
pub use mapper::{BindTarget, FlagMapper, Slot};
pub use registry::{check_inherited, register};
pub use transform::{TransformError, TransformFn, TransformRegistry, ACCESS_LEVEL, ISO_DATE};
pub use value::{FlagValue, FromFlagValue};
