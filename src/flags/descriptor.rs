//! flags::descriptor
//!
//! Per-field flag metadata.
//!
//! A [`FlagDescriptor`] is derived once per declaration field from a
//! [`FlagSpec`] (written next to the field with [`flag`]) plus the field's
//! identifier and value kind. Descriptors are immutable once extracted.
//!
//! # Example
//!
//! ```
//! use rlab::flags::{flag, ACCESS_LEVEL};
//!
//! let spec = flag("group_access")
//!     .short('a')
//!     .required()
//!     .transform(ACCESS_LEVEL)
//!     .help("The permissions level to grant the group");
//! assert!(spec.is_required());
//! ```

use std::collections::HashSet;
use std::fmt;

use super::error::FlagError;

/// Primitive shape of a flag's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Text,
    Integer,
    Boolean,
    TextList,
    /// File path or raw payload
    Binary,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagKind::Text => write!(f, "text"),
            FlagKind::Integer => write!(f, "integer"),
            FlagKind::Boolean => write!(f, "boolean"),
            FlagKind::TextList => write!(f, "text-list"),
            FlagKind::Binary => write!(f, "binary"),
        }
    }
}

/// Metadata describing one flag of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDescriptor {
    /// Canonical long flag name
    pub name: &'static str,
    /// Optional single-character alias
    pub shorthand: Option<char>,
    /// Value shape
    pub kind: FlagKind,
    /// Whether binding fails when the flag is absent
    pub required: bool,
    /// Help text
    pub description: &'static str,
    /// Name of a registered transform applied before assignment
    pub transform: Option<&'static str>,
    /// Identifier of the declaration field, matched against destination fields
    pub source_field: &'static str,
}

/// Start a flag specification with its canonical name.
pub const fn flag(name: &'static str) -> FlagSpec {
    FlagSpec {
        name,
        shorthand: None,
        required: false,
        description: "",
        transform: None,
    }
}

/// Builder for the declared attributes of a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    name: &'static str,
    shorthand: Option<char>,
    required: bool,
    description: &'static str,
    transform: Option<&'static str>,
}

impl FlagSpec {
    /// Single-character alias (`-x`).
    pub const fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Binding fails with `MissingRequiredFlag` when the flag is absent.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Apply the named transform before assignment.
    pub const fn transform(mut self, name: &'static str) -> Self {
        self.transform = Some(name);
        self
    }

    pub const fn help(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Complete the descriptor with the field's identity and kind.
    pub const fn describe(self, source_field: &'static str, kind: FlagKind) -> FlagDescriptor {
        FlagDescriptor {
            name: self.name,
            shorthand: self.shorthand,
            kind,
            required: self.required,
            description: self.description,
            transform: self.transform,
            source_field,
        }
    }
}

/// Check the descriptors of one declaration for well-formedness.
///
/// Names must be present, usable as long flags and unique; shorthands must be
/// alphanumeric and unique.
pub fn validate(declaration: &'static str, descriptors: &[FlagDescriptor]) -> Result<(), FlagError> {
    let mut names = HashSet::new();
    let mut shorts = HashSet::new();

    for descriptor in descriptors {
        let name = descriptor.name;
        if name.is_empty() {
            return Err(FlagError::malformed(
                declaration,
                format!("field '{}' has no canonical flag name", descriptor.source_field),
            ));
        }
        if name.starts_with('-') || name.chars().any(|c| c.is_whitespace() || c == '=') {
            return Err(FlagError::malformed(
                declaration,
                format!("'{}' is not a valid long flag name", name),
            ));
        }
        if !names.insert(name) {
            return Err(FlagError::malformed(
                declaration,
                format!("duplicate flag name '{}'", name),
            ));
        }

        if let Some(short) = descriptor.shorthand {
            if !short.is_ascii_alphanumeric() {
                return Err(FlagError::malformed(
                    declaration,
                    format!("shorthand '{}' of '{}' is not alphanumeric", short, name),
                ));
            }
            if !shorts.insert(short) {
                return Err(FlagError::malformed(
                    declaration,
                    format!("duplicate shorthand '-{}' on '{}'", short, name),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(name: &'static str, source: &'static str) -> FlagDescriptor {
        flag(name).describe(source, FlagKind::Text)
    }

    #[test]
    fn builder_records_everything() {
        let d = flag("expires_at")
            .short('e')
            .transform("iso_date")
            .help("Share expiration date")
            .describe("expires_at", FlagKind::Text);

        assert_eq!(d.name, "expires_at");
        assert_eq!(d.shorthand, Some('e'));
        assert!(!d.required);
        assert_eq!(d.transform, Some("iso_date"));
        assert_eq!(d.description, "Share expiration date");
        assert_eq!(d.source_field, "expires_at");
    }

    #[test]
    fn well_formed_passes() {
        let descriptors = [
            flag("id").short('i').required().describe("id", FlagKind::Text),
            flag("group_id").short('g').describe("group_id", FlagKind::Integer),
        ];
        assert!(validate("ShareFlags", &descriptors).is_ok());
    }

    #[test]
    fn empty_name_rejected() {
        let err = validate("Flags", &[text("", "id")]).unwrap_err();
        assert!(err.to_string().contains("no canonical flag name"));
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = validate("Flags", &[text("id", "id"), text("id", "other")]).unwrap_err();
        assert!(matches!(err, FlagError::MalformedDeclaration { .. }));
        assert!(err.to_string().contains("duplicate flag name 'id'"));
    }

    #[test]
    fn duplicate_shorthand_rejected() {
        let descriptors = [
            flag("id").short('i').describe("id", FlagKind::Text),
            flag("include").short('i').describe("include", FlagKind::Boolean),
        ];
        let err = validate("Flags", &descriptors).unwrap_err();
        assert!(err.to_string().contains("duplicate shorthand '-i'"));
    }

    #[test]
    fn dashed_name_rejected() {
        assert!(validate("Flags", &[text("--id", "id")]).is_err());
        assert!(validate("Flags", &[text("group id", "id")]).is_err());
    }
}
