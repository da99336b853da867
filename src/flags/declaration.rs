//! flags::declaration
//!
//! Flag declaration structs and their descriptor tables.
//!
//! # Design
//!
//! A flag declaration is a plain struct of `Option<_>` fields, one per flag.
//! Instead of inspecting the struct at runtime, each declaration provides an
//! explicit table of [`Field`]s: the field's descriptor plus two typed
//! accessors, one reading a present value out of the struct and one loading
//! the struct field from clap's matches. [`flag_declaration!`] writes the
//! struct and the table together so they cannot drift apart.
//!
//! [`Declaration`] is the validated, ordered form of that table. It is built
//! once when a command is constructed and then used to parse each invocation
//! into a fresh, exclusively-owned declaration value.
//!
//! # Example
//!
//! ```
//! use rlab::flag_declaration;
//! use rlab::flags::{flag, Declaration, FlagKind, ACCESS_LEVEL};
//!
//! flag_declaration! {
//!     /// Flags of `project share`.
//!     pub struct ShareFlags {
//!         id: Text = flag("id").short('i').required().help("Project ID or path"),
//!         group_access: Text = flag("group_access")
//!             .required()
//!             .transform(ACCESS_LEVEL)
//!             .help("Access level to grant"),
//!     }
//! }
//!
//! let declaration = Declaration::<ShareFlags>::new().unwrap();
//! let kinds: Vec<FlagKind> = declaration.descriptors().map(|d| d.kind).collect();
//! assert_eq!(kinds, vec![FlagKind::Text, FlagKind::Text]);
//! ```

use clap::parser::MatchesError;
use clap::ArgMatches;

use super::descriptor::{self, FlagDescriptor, FlagKind, FlagSpec};
use super::error::FlagError;
use super::value::FlagValue;

/// Reads a present field value out of a declaration.
pub type ReadFn<F> = fn(&F) -> Option<FlagValue>;

/// Loads a declaration field from parsed matches under the given flag id.
pub type LoadFn<F> = fn(&mut F, &ArgMatches, &str) -> Result<(), MatchesError>;

/// One entry of a declaration's descriptor table.
pub struct Field<F> {
    descriptor: FlagDescriptor,
    read: ReadFn<F>,
    load: LoadFn<F>,
}

impl<F> Field<F> {
    pub fn new(
        source_field: &'static str,
        spec: FlagSpec,
        kind: FlagKind,
        read: ReadFn<F>,
        load: LoadFn<F>,
    ) -> Self {
        Self {
            descriptor: spec.describe(source_field, kind),
            read,
            load,
        }
    }

    pub fn descriptor(&self) -> &FlagDescriptor {
        &self.descriptor
    }

    /// The field's value, `None` when absent.
    pub fn read(&self, flags: &F) -> Option<FlagValue> {
        (self.read)(flags)
    }

    fn load(&self, flags: &mut F, matches: &ArgMatches) -> Result<(), MatchesError> {
        (self.load)(flags, matches, self.descriptor.name)
    }
}

impl<F> Clone for Field<F> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            read: self.read,
            load: self.load,
        }
    }
}

impl<F> std::fmt::Debug for Field<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// A struct describing the flags one subcommand accepts.
///
/// Usually implemented through [`flag_declaration!`].
pub trait FlagDeclaration: Default + Sized + 'static {
    /// The field table, in declaration order.
    fn fields() -> Vec<Field<Self>>;

    /// Name used in diagnostics.
    fn declaration_name() -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("declaration")
    }
}

/// Validated descriptor table of a declaration type.
pub struct Declaration<F> {
    fields: Vec<Field<F>>,
}

impl<F: FlagDeclaration> Declaration<F> {
    /// Extract and validate the descriptor table of `F`.
    ///
    /// # Errors
    ///
    /// `MalformedDeclaration` if a field has no canonical name or two fields
    /// share a name or shorthand.
    pub fn new() -> Result<Self, FlagError> {
        let fields = F::fields();
        let descriptors: Vec<FlagDescriptor> = fields.iter().map(|f| f.descriptor).collect();
        descriptor::validate(F::declaration_name(), &descriptors)?;

        tracing::debug!(
            declaration = F::declaration_name(),
            flags = descriptors.len(),
            "extracted flag descriptors"
        );

        Ok(Self { fields })
    }

    /// Populate a fresh declaration from parsed matches.
    ///
    /// Every flag must have been registered on the command that produced
    /// `matches`.
    pub fn parse(&self, matches: &ArgMatches) -> Result<F, FlagError> {
        let mut flags = F::default();
        for field in &self.fields {
            field.load(&mut flags, matches)?;
        }
        Ok(flags)
    }
}

impl<F> Declaration<F> {
    pub fn fields(&self) -> &[Field<F>] {
        &self.fields
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FlagDescriptor> + '_ {
        self.fields.iter().map(Field::descriptor)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<F> std::fmt::Debug for Declaration<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.descriptors()).finish()
    }
}

/// Extract the ordered descriptors of a declaration type.
///
/// # Errors
///
/// See [`Declaration::new`].
pub fn extract<F: FlagDeclaration>() -> Result<Vec<FlagDescriptor>, FlagError> {
    Ok(Declaration::<F>::new()?.descriptors().copied().collect())
}

/// Define a flag declaration struct together with its descriptor table.
///
/// Each field is written as `name: Kind = spec`, where `Kind` is one of the
/// kind markers in [`crate::flags::value`] (`Text`, `Integer`, `Boolean`,
/// `TextList`, `Binary`) and `spec` is a [`FlagSpec`] expression. The
/// generated struct holds `Option<_>` of the kind's value type for every
/// field and derives `Debug`, `Clone`, `Default` and `PartialEq`.
#[macro_export]
macro_rules! flag_declaration {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $kind:ident = $spec:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: ::std::option::Option<
                    <$crate::flags::value::$kind as $crate::flags::value::FlagType>::Value
                >,
            )*
        }

        impl $crate::flags::FlagDeclaration for $name {
            fn fields() -> ::std::vec::Vec<$crate::flags::Field<Self>> {
                ::std::vec![
                    $(
                        $crate::flags::Field::new(
                            ::std::stringify!($field),
                            $spec,
                            <$crate::flags::value::$kind as $crate::flags::value::FlagType>::KIND,
                            |flags: &Self| {
                                flags.$field.clone().map(
                                    <$crate::flags::value::$kind as $crate::flags::value::FlagType>::into_flag_value,
                                )
                            },
                            |flags: &mut Self, matches: &$crate::flags::ArgMatches, id: &str| {
                                flags.$field =
                                    <$crate::flags::value::$kind as $crate::flags::value::FlagType>::from_matches(
                                        matches, id,
                                    )?;
                                ::std::result::Result::Ok(())
                            },
                        ),
                    )*
                ]
            }

            fn declaration_name() -> &'static str {
                ::std::stringify!($name)
            }
        }
    };
}
