//! Per-field provenance ("was this field explicitly set?").
//!
//! Fields are identified by their on-disk address, a [`FieldPath`] made of
//! the section and key names. The persistence layer marks fields as they are
//! loaded and the partial-profile merge queries them; neither needs to know
//! how a mask stores its bits, only the [`EditMask`] capability.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Stable identifier of one leaf field: its section and key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldPath {
    pub section: &'static str,
    pub key: &'static str,
}

impl FieldPath {
    pub const fn new(section: &'static str, key: &'static str) -> Self {
        Self { section, key }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section, self.key)
    }
}

/// Capability to record and query which fields are present.
pub trait EditMask {
    /// Mark `field` as present (`true`) or absent (`false`).
    fn mark(&mut self, field: FieldPath, edited: bool);

    /// Whether `field` is marked present.
    fn is_edited(&self, field: FieldPath) -> bool;
}

/// Set-backed edit mask covering every [`FieldPath`] of a parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
    edited: BTreeSet<FieldPath>,
}

impl FieldMask {
    /// A mask with nothing marked.
    pub fn none() -> Self {
        Self::default()
    }

    /// A mask with every field of the parameter set marked.
    pub fn all() -> Self {
        let mut mask = Self::default();
        mask.set_all(true);
        mask
    }

    /// Mark exactly the given fields.
    pub fn from_changes<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldPath>,
    {
        Self {
            edited: fields.into_iter().collect(),
        }
    }

    /// Mark or clear every field of the parameter set.
    pub fn set_all(&mut self, edited: bool) {
        if edited {
            self.edited
                .extend(crate::param_set::ParameterSet::field_paths());
        } else {
            self.edited.clear();
        }
    }

    /// Clear the `[General]` fields (rank, color label, trash flag).
    pub fn clear_general(&mut self) {
        self.edited
            .retain(|field| field.section != crate::param_set::GENERAL_SECTION);
    }

    pub fn len(&self) -> usize {
        self.edited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edited.is_empty()
    }

    /// Marked fields in section/key order.
    pub fn iter(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.edited.iter().copied()
    }
}

impl EditMask for FieldMask {
    fn mark(&mut self, field: FieldPath, edited: bool) {
        if edited {
            self.edited.insert(field);
        } else {
            self.edited.remove(&field);
        }
    }

    fn is_edited(&self, field: FieldPath) -> bool {
        self.edited.contains(&field)
    }
}
