//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Identifier`] - A resource reference given either as numeric ID or as a
//!   path-like name (`namespace/project`, a username)
//!
//! # Examples
//!
//! ```
//! use rlab::core::types::Identifier;
//!
//! assert_eq!(Identifier::parse("42"), Identifier::Numeric(42));
//! assert_eq!(
//!     Identifier::parse("group/project"),
//!     Identifier::Path("group/project".to_string())
//! );
//! assert_eq!(Identifier::parse("group/project").url_segment(), "group%2Fproject");
//! ```

use std::borrow::Cow;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A resource reference: numeric ID or path-like name.
///
/// Serializes as a JSON number or string respectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric resource ID
    Numeric(i64),
    /// Path-like name, e.g. `namespace/project` or a username
    Path(String),
}

impl Identifier {
    /// Decide how a user-supplied identifier should be treated.
    ///
    /// Anything that parses as an integer is a numeric ID; everything else,
    /// including the empty string, is a path. Never fails.
    pub fn parse(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => Identifier::Numeric(id),
            Err(_) => Identifier::Path(value.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }

    /// The numeric ID, if this is one.
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Identifier::Numeric(id) => Some(*id),
            Identifier::Path(_) => None,
        }
    }

    /// Form usable as a single URL path segment.
    ///
    /// Paths are percent-encoded so `group/project` stays one segment.
    pub fn url_segment(&self) -> Cow<'_, str> {
        match self {
            Identifier::Numeric(id) => Cow::Owned(id.to_string()),
            Identifier::Path(path) => urlencoding::encode(path),
        }
    }
}

impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Identifier::parse(s))
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Identifier::Numeric(id)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Numeric(id) => write!(f, "{}", id),
            Identifier::Path(path) => write!(f, "{}", path),
        }
    }
}
