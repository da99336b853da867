//! flags::error
//!
//! Error types for flag declaration, registration and binding.
//!
//! # Categories
//!
//! - **Programming errors** (`MalformedDeclaration`, `DuplicateFlagRegistration`,
//!   `TypeMismatch`, `Matches`): the declaration tables disagree with each other
//!   or with the command they are registered on. These surface while the
//!   command tree is being built, before any user input is looked at.
//! - **User errors** (`MissingRequiredFlag`, `TransformFailed`): the invocation
//!   itself is wrong. Binding stops at the first one and no options value is
//!   produced.

use thiserror::Error;

use super::transform::TransformError;

/// Errors from the flag binder.
#[derive(Debug, Error)]
pub enum FlagError {
    /// The flag declaration metadata is inconsistent.
    #[error("malformed flag declaration '{declaration}': {reason}")]
    MalformedDeclaration {
        /// Type name of the offending declaration
        declaration: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A flag with the same long name or shorthand already exists on the command.
    #[error("flag '{name}' is already registered on command '{command}'")]
    DuplicateFlagRegistration {
        /// Name of the command being extended
        command: String,
        /// Name (or `-x` shorthand) that collided
        name: String,
    },

    /// A required flag was not supplied.
    #[error("required flag '--{name}' was not provided")]
    MissingRequiredFlag {
        /// Canonical flag name
        name: &'static str,
    },

    /// A transform rejected the supplied value.
    #[error("invalid value for '--{name}'")]
    TransformFailed {
        /// Canonical flag name
        name: &'static str,
        /// Underlying transform failure
        #[source]
        cause: TransformError,
    },

    /// The (possibly transformed) value does not fit the destination field.
    #[error("flag '--{name}' produced a {found} value but its destination expects {expected}")]
    TypeMismatch {
        /// Canonical flag name
        name: &'static str,
        /// Destination field type
        expected: &'static str,
        /// Kind of value that was produced
        found: &'static str,
    },

    /// Parsed matches do not carry a flag the declaration expects.
    #[error("flag lookup failed: {0}")]
    Matches(#[from] clap::parser::MatchesError),
}

impl FlagError {
    /// Shorthand for building a [`FlagError::MalformedDeclaration`].
    pub(crate) fn malformed(declaration: &'static str, reason: impl Into<String>) -> Self {
        FlagError::MalformedDeclaration {
            declaration,
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the user's input rather than by the
    /// declaration tables.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FlagError::MissingRequiredFlag { .. } | FlagError::TransformFailed { .. }
        )
    }
}
