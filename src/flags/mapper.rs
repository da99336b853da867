//! flags::mapper
//!
//! Binding of a parsed flag declaration onto a destination options struct.
//!
//! # Design
//!
//! The declaration (what the user can type) and the destination (what the API
//! call needs) are independent types related only by field names. A
//! [`FlagMapper`] resolves that relationship once, when the command is
//! constructed:
//!
//! - every descriptor is matched against the destination's [`Slot`]s by
//!   field name, ignoring ASCII case;
//! - every declared transform name is resolved against a
//!   [`TransformRegistry`];
//! - a required flag without a destination slot, an unknown transform, or two
//!   destination fields whose names differ only in case, is a
//!   `MalformedDeclaration`;
//! - a flag without a transform whose kind cannot be stored in its matched
//!   field is a `TypeMismatch`.
//!
//! Optional flags without a destination slot are tolerated. They are listed by
//! [`FlagMapper::unmapped_flags`] and a warning is logged when a user actually
//! supplies one.
//!
//! # Binding
//!
//! [`FlagMapper::bind`] walks the descriptors in declaration order. An absent
//! required flag stops binding with `MissingRequiredFlag`; an absent optional
//! flag leaves the destination field at its default. Present values go through
//! their transform (if any) and are assigned into the matched slot. Binding
//! only reads the declaration, so binding the same value twice yields equal
//! results.
//!
//! # Example
//!
//! ```
//! use rlab::{bind_target, flag_declaration};
//! use rlab::flags::{flag, FlagMapper, ACCESS_LEVEL};
//!
//! flag_declaration! {
//!     pub struct MemberFlags {
//!         user_id: Integer = flag("user_id").required(),
//!         access_level: Text = flag("access_level").required().transform(ACCESS_LEVEL),
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! pub struct AddMemberOptions {
//!     pub user_id: Option<i64>,
//!     pub access_level: Option<i64>,
//! }
//! bind_target!(AddMemberOptions { user_id, access_level });
//!
//! let mapper = FlagMapper::<MemberFlags, AddMemberOptions>::new().unwrap();
//! let flags = MemberFlags {
//!     user_id: Some(7),
//!     access_level: Some("maintainer".to_string()),
//! };
//! let options = mapper.bind(&flags).unwrap();
//! assert_eq!(options.access_level, Some(40));
//! ```

use clap::{ArgMatches, Command};

use super::declaration::{Declaration, FlagDeclaration};
use super::descriptor::FlagDescriptor;
use super::error::FlagError;
use super::registry;
use super::transform::{TransformFn, TransformRegistry};
use super::value::{FlagValue, Mismatch};

/// Assigns a transit value into one destination field.
pub type AssignFn<O> = fn(&mut O, FlagValue) -> Result<(), Mismatch>;

/// One assignable field of a destination options struct.
pub struct Slot<O> {
    field: &'static str,
    assign: AssignFn<O>,
}

impl<O> Slot<O> {
    pub fn new(field: &'static str, assign: AssignFn<O>) -> Self {
        Self { field, assign }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl<O> Clone for Slot<O> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            assign: self.assign,
        }
    }
}

impl<O> std::fmt::Debug for Slot<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// A destination struct the binder can populate.
///
/// Usually implemented through [`bind_target!`](crate::bind_target).
pub trait BindTarget: Default + 'static {
    fn slots() -> Vec<Slot<Self>>;
}

/// Implement [`BindTarget`] for a struct of `Option<_>` fields.
///
/// Every listed field's inner type must implement
/// [`FromFlagValue`](crate::flags::FromFlagValue).
#[macro_export]
macro_rules! bind_target {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::flags::BindTarget for $ty {
            fn slots() -> ::std::vec::Vec<$crate::flags::Slot<Self>> {
                ::std::vec![
                    $(
                        $crate::flags::Slot::new(
                            ::std::stringify!($field),
                            |target: &mut Self, value: $crate::flags::FlagValue| {
                                $crate::flags::value::assign(&mut target.$field, value)
                            },
                        ),
                    )*
                ]
            }
        }
    };
}

/// Per-descriptor binding decisions, resolved at construction.
struct Route<O> {
    transform: Option<TransformFn>,
    slot: Option<Slot<O>>,
}

/// Binds flag declarations of type `F` onto options of type `O`.
pub struct FlagMapper<F, O> {
    declaration: Declaration<F>,
    routes: Vec<Route<O>>,
}

impl<F: FlagDeclaration, O: BindTarget> FlagMapper<F, O> {
    /// Build a mapper using the process-wide transform registry.
    ///
    /// # Errors
    ///
    /// `MalformedDeclaration` if the declaration is malformed, references an
    /// unknown transform, or declares a required flag with no destination
    /// field. `TypeMismatch` if an untransformed flag's kind does not fit its
    /// destination field.
    pub fn new() -> Result<Self, FlagError> {
        Self::with_transforms(TransformRegistry::global())
    }

    /// Build a mapper resolving transforms against `transforms`.
    ///
    /// # Errors
    ///
    /// See [`FlagMapper::new`].
    pub fn with_transforms(transforms: &TransformRegistry) -> Result<Self, FlagError> {
        let declaration = Declaration::<F>::new()?;
        let slots = O::slots();

        for (index, slot) in slots.iter().enumerate() {
            if let Some(other) = slots[..index]
                .iter()
                .find(|other| other.field.eq_ignore_ascii_case(slot.field))
            {
                return Err(FlagError::malformed(
                    F::declaration_name(),
                    format!(
                        "destination fields '{}' and '{}' differ only in case",
                        other.field, slot.field
                    ),
                ));
            }
        }

        let mut routes = Vec::with_capacity(declaration.len());
        for descriptor in declaration.descriptors() {
            let transform = match descriptor.transform {
                Some(name) => Some(transforms.get(name).ok_or_else(|| {
                    FlagError::malformed(
                        F::declaration_name(),
                        format!("flag '{}' references unknown transform '{}'", descriptor.name, name),
                    )
                })?),
                None => None,
            };

            let slot = slots
                .iter()
                .find(|slot| slot.field.eq_ignore_ascii_case(descriptor.source_field))
                .cloned();

            match &slot {
                None if descriptor.required => {
                    return Err(FlagError::malformed(
                        F::declaration_name(),
                        format!(
                            "required flag '{}' has no destination field '{}'",
                            descriptor.name, descriptor.source_field
                        ),
                    ));
                }
                // Transform outputs are only known once a value arrives.
                Some(slot) if transform.is_none() => {
                    let mut scratch = O::default();
                    (slot.assign)(&mut scratch, FlagValue::sample(descriptor.kind)).map_err(
                        |mismatch| FlagError::TypeMismatch {
                            name: descriptor.name,
                            expected: mismatch.expected,
                            found: mismatch.found,
                        },
                    )?;
                }
                _ => {}
            }

            routes.push(Route { transform, slot });
        }

        Ok(Self {
            declaration,
            routes,
        })
    }

    /// Register this mapper's flags on `command`.
    ///
    /// # Errors
    ///
    /// `DuplicateFlagRegistration` if any flag is already present.
    pub fn register(&self, command: Command) -> Result<Command, FlagError> {
        let descriptors: Vec<FlagDescriptor> = self.declaration.descriptors().copied().collect();
        registry::register(command, &descriptors)
    }

    /// Populate a fresh declaration from parsed matches.
    pub fn parse(&self, matches: &ArgMatches) -> Result<F, FlagError> {
        self.declaration.parse(matches)
    }

    /// Copy, transform and validate `flags` into a new options value.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredFlag` for the first required flag that is absent
    /// - `TransformFailed` if a transform rejects a value
    /// - `TypeMismatch` if a value does not fit its destination field
    pub fn bind(&self, flags: &F) -> Result<O, FlagError> {
        let mut options = O::default();

        for (field, route) in self.declaration.fields().iter().zip(&self.routes) {
            let descriptor = field.descriptor();

            let raw = match field.read(flags) {
                Some(value) => value,
                None if descriptor.required => {
                    return Err(FlagError::MissingRequiredFlag {
                        name: descriptor.name,
                    })
                }
                None => continue,
            };

            let value = match route.transform {
                Some(transform) => transform(raw).map_err(|cause| FlagError::TransformFailed {
                    name: descriptor.name,
                    cause,
                })?,
                None => raw,
            };

            let Some(slot) = &route.slot else {
                tracing::warn!(
                    flag = descriptor.name,
                    declaration = F::declaration_name(),
                    "flag was supplied but is not forwarded to the API call"
                );
                continue;
            };

            (slot.assign)(&mut options, value).map_err(|mismatch| FlagError::TypeMismatch {
                name: descriptor.name,
                expected: mismatch.expected,
                found: mismatch.found,
            })?;
        }

        tracing::debug!(declaration = F::declaration_name(), "bound flags");
        Ok(options)
    }

    /// Parse matches and bind the result in one step.
    pub fn bind_matches(&self, matches: &ArgMatches) -> Result<O, FlagError> {
        let flags = self.parse(matches)?;
        self.bind(&flags)
    }
}

impl<F, O> FlagMapper<F, O> {
    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FlagDescriptor> + '_ {
        self.declaration.descriptors()
    }

    /// Declared flags that have no destination field.
    pub fn unmapped_flags(&self) -> Vec<&'static str> {
        self.declaration
            .descriptors()
            .zip(&self.routes)
            .filter(|(_, route)| route.slot.is_none())
            .map(|(descriptor, _)| descriptor.name)
            .collect()
    }
}

impl<F, O> std::fmt::Debug for FlagMapper<F, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagMapper")
            .field("declaration", &self.declaration)
            .field("unmapped", &self.unmapped_flags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Identifier;
    use crate::flags::{flag, TransformError, ACCESS_LEVEL, ISO_DATE};
    use chrono::NaiveDate;

    crate::flag_declaration! {
        struct ShareFlags {
            id: Text = flag("id").short('i').required(),
            group_access: Text = flag("group_access").required().transform(ACCESS_LEVEL),
            expires_at: Text = flag("expires_at").transform(ISO_DATE),
            statistics: Boolean = flag("statistics"),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct ShareOptions {
        id: Option<Identifier>,
        group_access: Option<i64>,
        expires_at: Option<NaiveDate>,
        note: Option<String>,
    }

    impl Default for ShareOptions {
        fn default() -> Self {
            Self {
                id: None,
                group_access: None,
                expires_at: None,
                note: Some("kept".to_string()),
            }
        }
    }

    crate::bind_target!(ShareOptions {
        id,
        group_access,
        expires_at,
        note
    });

    #[allow(non_snake_case)]
    #[derive(Debug, Default)]
    struct UppercaseOptions {
        ID: Option<Identifier>,
        Group_Access: Option<i64>,
    }

    crate::bind_target!(UppercaseOptions { ID, Group_Access });

    #[derive(Debug, Default)]
    struct NoGroupAccess {
        id: Option<Identifier>,
    }

    crate::bind_target!(NoGroupAccess { id });

    #[derive(Debug, Default)]
    struct WrongType {
        id: Option<Identifier>,
        group_access: Option<String>,
    }

    crate::bind_target!(WrongType { id, group_access });

    #[derive(Debug, Default)]
    struct CountAsText {
        id: Option<Identifier>,
        group_access: Option<i64>,
        statistics: Option<String>,
    }

    crate::bind_target!(CountAsText {
        id,
        group_access,
        statistics
    });

    #[allow(non_snake_case)]
    #[derive(Debug, Default)]
    struct CaseCollision {
        id: Option<Identifier>,
        ID: Option<Identifier>,
        group_access: Option<i64>,
    }

    crate::bind_target!(CaseCollision {
        id,
        ID,
        group_access
    });

    crate::flag_declaration! {
        struct UnknownTransform {
            id: Text = flag("id").transform("str2AccessLevel"),
        }
    }

    fn populated() -> ShareFlags {
        ShareFlags {
            id: Some("10".to_string()),
            group_access: Some("Developer".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn binds_and_transforms() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let options = mapper.bind(&populated()).unwrap();

        assert_eq!(options.id, Some(Identifier::Numeric(10)));
        assert_eq!(options.group_access, Some(30));
        assert_eq!(options.expires_at, None);
    }

    #[test]
    fn absent_optional_keeps_destination_default() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let options = mapper.bind(&populated()).unwrap();
        assert_eq!(options.note, Some("kept".to_string()));
    }

    #[test]
    fn missing_required_stops_at_first() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let err = mapper.bind(&ShareFlags::default()).unwrap_err();
        assert!(matches!(err, FlagError::MissingRequiredFlag { name: "id" }));

        let flags = ShareFlags {
            id: Some("10".to_string()),
            ..Default::default()
        };
        let err = mapper.bind(&flags).unwrap_err();
        assert!(matches!(
            err,
            FlagError::MissingRequiredFlag {
                name: "group_access"
            }
        ));
    }

    #[test]
    fn transform_failure_aborts() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let flags = ShareFlags {
            expires_at: Some("26/09/2016".to_string()),
            ..populated()
        };
        let err = mapper.bind(&flags).unwrap_err();
        assert!(matches!(
            err,
            FlagError::TransformFailed {
                name: "expires_at",
                cause: TransformError::InvalidDateFormat { .. }
            }
        ));
    }

    #[test]
    fn date_transform_reaches_destination() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let flags = ShareFlags {
            expires_at: Some("2016-09-26".to_string()),
            ..populated()
        };
        let options = mapper.bind(&flags).unwrap();
        assert_eq!(options.expires_at, NaiveDate::from_ymd_opt(2016, 9, 26));
    }

    #[test]
    fn destination_names_match_ignoring_case() {
        let mapper = FlagMapper::<ShareFlags, UppercaseOptions>::new().unwrap();
        let options = mapper.bind(&populated()).unwrap();
        assert_eq!(options.ID, Some(Identifier::Numeric(10)));
        assert_eq!(options.Group_Access, Some(30));
    }

    #[test]
    fn unmapped_optional_flags_are_inert() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        assert_eq!(mapper.unmapped_flags(), vec!["statistics"]);

        let flags = ShareFlags {
            statistics: Some(true),
            ..populated()
        };
        let options = mapper.bind(&flags).unwrap();
        assert_eq!(options, mapper.bind(&populated()).unwrap());
    }

    #[test]
    fn required_flag_without_destination_is_malformed() {
        let err = FlagMapper::<ShareFlags, NoGroupAccess>::new().unwrap_err();
        assert!(matches!(err, FlagError::MalformedDeclaration { .. }));
        assert!(err.to_string().contains("group_access"));
    }

    #[test]
    fn unknown_transform_is_malformed() {
        let err = FlagMapper::<UnknownTransform, NoGroupAccess>::new().unwrap_err();
        assert!(err.to_string().contains("str2AccessLevel"));
    }

    #[test]
    fn custom_registry_supplies_transforms() {
        fn level_from_code(value: FlagValue) -> Result<FlagValue, TransformError> {
            match value {
                FlagValue::Text(s) => s
                    .parse::<i64>()
                    .map(FlagValue::Integer)
                    .map_err(|_| TransformError::UnknownAccessLevel(s)),
                other => Err(TransformError::UnsupportedValue {
                    transform: "str2AccessLevel",
                    found: other.label(),
                }),
            }
        }

        let mut registry = TransformRegistry::with_builtins();
        registry
            .register("str2AccessLevel", level_from_code)
            .unwrap();
        let mapper = FlagMapper::<UnknownTransform, NoGroupAccess>::with_transforms(&registry);
        assert!(mapper.is_ok());
    }

    #[test]
    fn type_mismatch_is_reported() {
        let mapper = FlagMapper::<ShareFlags, WrongType>::new().unwrap();
        let err = mapper.bind(&populated()).unwrap_err();
        assert!(matches!(
            err,
            FlagError::TypeMismatch {
                name: "group_access",
                expected: "text",
                found: "integer"
            }
        ));
    }

    #[test]
    fn untransformed_kind_mismatch_fails_construction() {
        let err = FlagMapper::<ShareFlags, CountAsText>::new().unwrap_err();
        assert!(matches!(
            err,
            FlagError::TypeMismatch {
                name: "statistics",
                expected: "text",
                found: "boolean"
            }
        ));
    }

    #[test]
    fn destination_fields_differing_in_case_are_malformed() {
        let err = FlagMapper::<ShareFlags, CaseCollision>::new().unwrap_err();
        assert!(matches!(err, FlagError::MalformedDeclaration { .. }));
        assert!(err.to_string().contains("'id' and 'ID'"));
    }

    #[test]
    fn binding_is_repeatable() {
        let mapper = FlagMapper::<ShareFlags, ShareOptions>::new().unwrap();
        let flags = ShareFlags {
            expires_at: Some("2030-01-01".to_string()),
            statistics: Some(false),
            ..populated()
        };
        assert_eq!(mapper.bind(&flags).unwrap(), mapper.bind(&flags).unwrap());
    }
}
