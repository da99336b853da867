//! flags::transform
//!
//! Named value transforms applied between parsing and assignment.
//!
//! # Registry
//!
//! A [`TransformRegistry`] maps names to plain function pointers. The
//! process-wide registry returned by [`TransformRegistry::global`] holds the
//! built-ins and is never mutated after it is first touched. Callers that need
//! extra transforms build their own registry with
//! [`TransformRegistry::with_builtins`] + [`TransformRegistry::register`] and
//! hand it to [`FlagMapper::with_transforms`](super::FlagMapper::with_transforms).
//!
//! Mappers resolve transform names when they are constructed, so an unknown
//! name is reported before any user input is bound.
//!
//! # Built-ins
//!
//! | Name | Input | Output |
//! |------|-------|--------|
//! | [`ACCESS_LEVEL`] | text, e.g. `developer` | integer access level code |
//! | [`ISO_DATE`] | text, `YYYY-MM-DD` | date |

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use thiserror::Error;

use super::error::FlagError;
use super::value::FlagValue;

/// Name of the access-level transform.
pub const ACCESS_LEVEL: &str = "access_level";

/// Name of the ISO-8601 calendar date transform.
pub const ISO_DATE: &str = "iso_date";

/// A pure conversion from a raw parsed value to a domain value.
pub type TransformFn = fn(FlagValue) -> Result<FlagValue, TransformError>;

/// Errors raised by transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("unknown access level '{0}' (expected guest, reporter, developer, maintainer or owner)")]
    UnknownAccessLevel(String),

    #[error("'{value}' is not an ISO 8601 date (expected YYYY-MM-DD)")]
    InvalidDateFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("transform '{transform}' cannot be applied to a {found} value")]
    UnsupportedValue {
        transform: &'static str,
        found: &'static str,
    },
}

/// Project and group membership levels and their numeric codes.
const ACCESS_LEVELS: [(&str, i64); 5] = [
    ("guest", 10),
    ("reporter", 20),
    ("developer", 30),
    ("maintainer", 40),
    ("owner", 50),
];

static GLOBAL: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::with_builtins);

/// Lookup table from transform name to function.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    entries: HashMap<&'static str, TransformFn>,
}

impl TransformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in transforms.
    pub fn with_builtins() -> Self {
        let mut entries: HashMap<&'static str, TransformFn> = HashMap::new();
        entries.insert(ACCESS_LEVEL, access_level);
        entries.insert(ISO_DATE, iso_date);
        Self { entries }
    }

    /// The process-wide registry of built-ins.
    pub fn global() -> &'static TransformRegistry {
        &GLOBAL
    }

    /// Register a transform under a new name.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDeclaration` if the name is empty or already taken.
    pub fn register(&mut self, name: &'static str, transform: TransformFn) -> Result<(), FlagError> {
        if name.is_empty() {
            return Err(FlagError::malformed(
                "TransformRegistry",
                "transform name cannot be empty",
            ));
        }
        if self.entries.contains_key(name) {
            return Err(FlagError::malformed(
                "TransformRegistry",
                format!("transform '{}' is already registered", name),
            ));
        }
        self.entries.insert(name, transform);
        Ok(())
    }

    /// Look up a transform by name.
    pub fn get(&self, name: &str) -> Option<TransformFn> {
        self.entries.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Map an access level name (any letter case) to its numeric code.
pub fn access_level(value: FlagValue) -> Result<FlagValue, TransformError> {
    let name = match value {
        FlagValue::Text(name) => name,
        other => {
            return Err(TransformError::UnsupportedValue {
                transform: ACCESS_LEVEL,
                found: other.label(),
            })
        }
    };

    ACCESS_LEVELS
        .iter()
        .find(|(level, _)| level.eq_ignore_ascii_case(&name))
        .map(|(_, code)| FlagValue::Integer(*code))
        .ok_or(TransformError::UnknownAccessLevel(name))
}

/// Parse `YYYY-MM-DD` into a calendar date.
pub fn iso_date(value: FlagValue) -> Result<FlagValue, TransformError> {
    let text = match value {
        FlagValue::Text(text) => text,
        other => {
            return Err(TransformError::UnsupportedValue {
                transform: ISO_DATE,
                found: other.label(),
            })
        }
    };

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map(FlagValue::Date)
        .map_err(|source| TransformError::InvalidDateFormat {
            value: text,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FlagValue {
        FlagValue::Text(s.to_string())
    }

    #[test]
    fn access_levels_map_to_codes() {
        let expected = [
            ("guest", 10),
            ("reporter", 20),
            ("developer", 30),
            ("maintainer", 40),
            ("owner", 50),
        ];
        for (name, code) in expected {
            assert_eq!(access_level(text(name)).unwrap(), FlagValue::Integer(code));
            assert_eq!(
                access_level(text(&name.to_uppercase())).unwrap(),
                FlagValue::Integer(code)
            );
        }
        assert_eq!(
            access_level(text("Developer")).unwrap(),
            FlagValue::Integer(30)
        );
    }

    #[test]
    fn unknown_access_level() {
        let err = access_level(text("admin")).unwrap_err();
        assert!(matches!(err, TransformError::UnknownAccessLevel(ref s) if s == "admin"));
        assert!(access_level(text("")).is_err());
        assert!(access_level(text(" developer")).is_err());
    }

    #[test]
    fn access_level_rejects_non_text() {
        let err = access_level(FlagValue::Integer(30)).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnsupportedValue {
                found: "integer",
                ..
            }
        ));
    }

    #[test]
    fn iso_date_parses() {
        let date = NaiveDate::from_ymd_opt(2016, 9, 26).unwrap();
        assert_eq!(iso_date(text("2016-09-26")).unwrap(), FlagValue::Date(date));
    }

    #[test]
    fn iso_date_rejects_garbage() {
        for bad in ["26.09.2016", "2016-13-01", "tomorrow", ""] {
            let err = iso_date(text(bad)).unwrap_err();
            assert!(matches!(err, TransformError::InvalidDateFormat { .. }), "{bad}");
        }
    }

    #[test]
    fn global_has_builtins() {
        let registry = TransformRegistry::global();
        assert!(registry.get(ACCESS_LEVEL).is_some());
        assert!(registry.get(ISO_DATE).is_some());
        assert!(registry.get("str2AccessLevel").is_none());
        assert_eq!(registry.names(), vec![ACCESS_LEVEL, ISO_DATE]);
    }

    #[test]
    fn register_rejects_duplicates() {
        fn upper(value: FlagValue) -> Result<FlagValue, TransformError> {
            match value {
                FlagValue::Text(s) => Ok(FlagValue::Text(s.to_uppercase())),
                other => Err(TransformError::UnsupportedValue {
                    transform: "upper",
                    found: other.label(),
                }),
            }
        }

        let mut registry = TransformRegistry::with_builtins();
        registry.register("upper", upper).unwrap();
        assert!(registry.register("upper", upper).is_err());
        assert!(registry.register(ACCESS_LEVEL, upper).is_err());
        assert!(registry.register("", upper).is_err());

        let f = registry.get("upper").unwrap();
        assert_eq!(f(text("abc")).unwrap(), text("ABC"));
    }
}
