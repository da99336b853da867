//! flags::value
//!
//! Typed flag values and the conversions on both sides of the binder.
//!
//! # Design
//!
//! A declaration field is always `Option<T>`: "absent" and "zero" are
//! different things. The kind markers ([`Text`], [`Integer`], [`Boolean`],
//! [`TextList`], [`Binary`]) tie a [`FlagKind`] to the Rust type stored in the
//! declaration and know how to pull that type out of clap's matches.
//!
//! Between the two structs values travel as [`FlagValue`]. Destination fields
//! accept them through [`FromFlagValue`], which is where a declared kind (or a
//! transform's output) meets the destination's own field type.

use chrono::NaiveDate;
use clap::parser::MatchesError;
use clap::ArgMatches;

use super::descriptor::FlagKind;
use crate::core::types::Identifier;

/// A single present flag value in transit from declaration to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    TextList(Vec<String>),
    /// File path or raw payload, interpreted by the consumer
    Binary(String),
    /// Only produced by transforms
    Date(NaiveDate),
}

impl FlagValue {
    /// Short label of the value's shape, used in mismatch diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            FlagValue::Text(_) => "text",
            FlagValue::Integer(_) => "integer",
            FlagValue::Boolean(_) => "boolean",
            FlagValue::TextList(_) => "text-list",
            FlagValue::Binary(_) => "binary",
            FlagValue::Date(_) => "date",
        }
    }

    /// A placeholder value of the given kind, used to check that a
    /// destination field can hold what the flag will produce.
    pub fn sample(kind: FlagKind) -> Self {
        match kind {
            FlagKind::Text => FlagValue::Text(String::new()),
            FlagKind::Integer => FlagValue::Integer(0),
            FlagKind::Boolean => FlagValue::Boolean(false),
            FlagKind::TextList => FlagValue::TextList(Vec::new()),
            FlagKind::Binary => FlagValue::Binary(String::new()),
        }
    }
}

/// Ties a [`FlagKind`] to its Rust value type and its clap representation.
pub trait FlagType {
    /// The type held (inside `Option`) by declaration fields of this kind.
    type Value: Clone + std::fmt::Debug + PartialEq;

    /// The kind recorded in the field's descriptor.
    const KIND: FlagKind;

    /// Wrap a present value for transit.
    fn into_flag_value(value: Self::Value) -> FlagValue;

    /// Read the parsed value registered under `id`, `None` when absent.
    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<Self::Value>, MatchesError>;
}

/// Single string flag.
#[derive(Debug, Clone, Copy)]
pub struct Text;

/// Single integer flag.
#[derive(Debug, Clone, Copy)]
pub struct Integer;

/// Boolean flag: `--flag`, `--flag=true` or `--flag=false`.
#[derive(Debug, Clone, Copy)]
pub struct Boolean;

/// Repeatable, comma-separated list of strings.
#[derive(Debug, Clone, Copy)]
pub struct TextList;

/// String flag naming a file or carrying a raw payload.
#[derive(Debug, Clone, Copy)]
pub struct Binary;

impl FlagType for Text {
    type Value = String;
    const KIND: FlagKind = FlagKind::Text;

    fn into_flag_value(value: String) -> FlagValue {
        FlagValue::Text(value)
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<String>, MatchesError> {
        Ok(matches.try_get_one::<String>(id)?.cloned())
    }
}

impl FlagType for Integer {
    type Value = i64;
    const KIND: FlagKind = FlagKind::Integer;

    fn into_flag_value(value: i64) -> FlagValue {
        FlagValue::Integer(value)
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<i64>, MatchesError> {
        Ok(matches.try_get_one::<i64>(id)?.copied())
    }
}

impl FlagType for Boolean {
    type Value = bool;
    const KIND: FlagKind = FlagKind::Boolean;

    fn into_flag_value(value: bool) -> FlagValue {
        FlagValue::Boolean(value)
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<bool>, MatchesError> {
        Ok(matches.try_get_one::<bool>(id)?.copied())
    }
}

impl FlagType for TextList {
    type Value = Vec<String>;
    const KIND: FlagKind = FlagKind::TextList;

    fn into_flag_value(value: Vec<String>) -> FlagValue {
        FlagValue::TextList(value)
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<Vec<String>>, MatchesError> {
        Ok(matches
            .try_get_many::<String>(id)?
            .map(|values| values.cloned().collect()))
    }
}

impl FlagType for Binary {
    type Value = String;
    const KIND: FlagKind = FlagKind::Binary;

    fn into_flag_value(value: String) -> FlagValue {
        FlagValue::Binary(value)
    }

    fn from_matches(matches: &ArgMatches, id: &str) -> Result<Option<String>, MatchesError> {
        Ok(matches.try_get_one::<String>(id)?.cloned())
    }
}

/// Conversion from a transit value into a destination field type.
///
/// On mismatch the value is handed back so the caller can report its shape.
pub trait FromFlagValue: Sized {
    /// Human-readable name of the destination type.
    const EXPECTED: &'static str;

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue>;
}

impl FromFlagValue for String {
    const EXPECTED: &'static str = "text";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::Text(s) | FlagValue::Binary(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromFlagValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::Integer(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl FromFlagValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::Boolean(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromFlagValue for Vec<String> {
    const EXPECTED: &'static str = "text-list";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::TextList(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl FromFlagValue for NaiveDate {
    const EXPECTED: &'static str = "date";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::Date(date) => Ok(date),
            other => Err(other),
        }
    }
}

impl FromFlagValue for Identifier {
    const EXPECTED: &'static str = "integer-or-path identifier";

    fn from_flag_value(value: FlagValue) -> Result<Self, FlagValue> {
        match value {
            FlagValue::Text(s) => Ok(Identifier::parse(&s)),
            FlagValue::Integer(n) => Ok(Identifier::Numeric(n)),
            other => Err(other),
        }
    }
}

/// A value that did not fit its destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Store a transit value into an optional destination field.
///
/// Used by the slots generated with [`bind_target!`](crate::bind_target).
/// The field is left untouched on mismatch.
pub fn assign<T: FromFlagValue>(slot: &mut Option<T>, value: FlagValue) -> Result<(), Mismatch> {
    let value = T::from_flag_value(value).map_err(|rejected| Mismatch {
        expected: T::EXPECTED,
        found: rejected.label(),
    })?;
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_binary_both_fill_strings() {
        assert_eq!(
            String::from_flag_value(FlagValue::Text("a".into())),
            Ok("a".to_string())
        );
        assert_eq!(
            String::from_flag_value(FlagValue::Binary("avatar.png".into())),
            Ok("avatar.png".to_string())
        );
    }

    #[test]
    fn samples_carry_their_kind() {
        assert_eq!(FlagValue::sample(FlagKind::Integer).label(), "integer");
        assert_eq!(FlagValue::sample(FlagKind::TextList).label(), "text-list");
        assert_eq!(FlagValue::sample(FlagKind::Binary).label(), "binary");
        assert!(String::from_flag_value(FlagValue::sample(FlagKind::Binary)).is_ok());
    }

    #[test]
    fn mismatch_returns_the_value() {
        let err = i64::from_flag_value(FlagValue::Text("10".into())).unwrap_err();
        assert_eq!(err.label(), "text");
    }

    #[test]
    fn identifier_accepts_text_and_integer() {
        assert_eq!(
            Identifier::from_flag_value(FlagValue::Text("group/project".into())),
            Ok(Identifier::Path("group/project".to_string()))
        );
        assert_eq!(
            Identifier::from_flag_value(FlagValue::Text("42".into())),
            Ok(Identifier::Numeric(42))
        );
        assert_eq!(
            Identifier::from_flag_value(FlagValue::Integer(7)),
            Ok(Identifier::Numeric(7))
        );
    }

    #[test]
    fn assign_keeps_slot_untouched_on_mismatch() {
        let mut slot: Option<bool> = None;
        assert_eq!(
            assign(&mut slot, FlagValue::Integer(1)),
            Err(Mismatch {
                expected: "boolean",
                found: "integer"
            })
        );
        assert_eq!(slot, None);

        assign(&mut slot, FlagValue::Boolean(false)).unwrap();
        assert_eq!(slot, Some(false));
    }
}
