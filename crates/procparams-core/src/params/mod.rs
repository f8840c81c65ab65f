//! Parameter groups.
//!
//! Each group is the settings record of one processing stage. Groups are
//! declared with [`param_group!`], which takes one table row per field
//!
//! ```text
//! /// doc
//! field_name: Type = default_expr => "PersistedKey",
//! ```
//!
//! and generates the struct, its `Default` baseline and its [`ParamGroup`]
//! implementation (field list for persistence, field-level diff and masked
//! overlay). Keeping all of that in one table means a field cannot be added
//! to the struct and forgotten in the file format or the merge.
//!
//! Method selectors are declared with [`profile_enum!`], which maps each
//! variant to its persisted name.

use crate::curve::CurveExpander;
use crate::edit_mask::{EditMask, FieldPath};
use crate::value::ProfileValue;

/// Behavior shared by every parameter group.
pub trait ParamGroup: Default + Clone + PartialEq {
    /// Persisted keys, in file order.
    const KEYS: &'static [&'static str];

    /// Every field with its key, in file order.
    fn fields(&self) -> Vec<(&'static str, &dyn ProfileValue)>;

    /// Mutable access to every field with its key, in file order.
    fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn ProfileValue)>;

    /// Push the path of every field that differs from `other`.
    fn diff_into(&self, other: &Self, section: &'static str, out: &mut Vec<FieldPath>);

    /// Copy the fields marked in `mask` onto `dest`.
    fn overlay_onto(&self, dest: &mut Self, section: &'static str, mask: &dyn EditMask);

    /// Restore the baseline values.
    fn set_defaults(&mut self) {
        *self = Self::default();
    }

    /// Hand every curve field to `expander`.
    fn expand_curves(&self, section: &'static str, expander: &mut dyn CurveExpander) {
        for (key, value) in self.fields() {
            if let Some(curve) = value.as_curve() {
                expander.expand(FieldPath::new(section, key), curve);
            }
        }
    }
}

// ============================================================================
// Declaration macros
// ============================================================================

macro_rules! param_group {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $default:expr => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        impl $crate::params::ParamGroup for $name {
            const KEYS: &'static [&'static str] = &[$($key),*];

            fn fields(&self) -> Vec<(&'static str, &dyn $crate::value::ProfileValue)> {
                vec![$(($key, &self.$field as &dyn $crate::value::ProfileValue)),*]
            }

            fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn $crate::value::ProfileValue)> {
                vec![$(($key, &mut self.$field as &mut dyn $crate::value::ProfileValue)),*]
            }

            fn diff_into(
                &self,
                other: &Self,
                section: &'static str,
                out: &mut Vec<$crate::edit_mask::FieldPath>,
            ) {
                $(
                    if self.$field != other.$field {
                        out.push($crate::edit_mask::FieldPath::new(section, $key));
                    }
                )*
            }

            fn overlay_onto(
                &self,
                dest: &mut Self,
                section: &'static str,
                mask: &dyn $crate::edit_mask::EditMask,
            ) {
                $(
                    if mask.is_edited($crate::edit_mask::FieldPath::new(section, $key)) {
                        dest.$field = self.$field.clone();
                    }
                )*
            }
        }
    };
}

macro_rules! profile_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Persisted name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::value::ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err($crate::value::ValueError::invalid(stringify!($name), s)),
                }
            }
        }

        impl $crate::value::ProfileValue for $name {
            fn encode(&self, _: &$crate::paths::PathContext<'_>) -> String {
                self.as_str().to_string()
            }

            fn decode(
                &mut self,
                raw: &str,
                _: &$crate::paths::PathContext<'_>,
            ) -> Result<(), $crate::value::ValueError> {
                *self = raw.parse()?;
                Ok(())
            }
        }
    };
}

pub mod color;
pub mod detail;
pub mod geometry;
pub mod raw;
pub mod tone;
pub mod white_balance;

pub use color::*;
pub use detail::*;
pub use geometry::*;
pub use raw::*;
pub use tone::*;
pub use white_balance::*;
