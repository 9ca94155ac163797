//! Stable per-row identifiers.
//!
//! Every row exposed to selection, locking and patching is addressed by a
//! string id derived from its data. Uniqueness within the dataset is the
//! caller's responsibility; lookups return the first match.

use crate::row::{Row, SharedRow};
use crate::value::Value;
use std::rc::Rc;

/// How a row id is derived.
#[derive(Clone)]
pub enum IdentitySource {
    /// Concatenate the display form of every field, in field order.
    AllFields,
    /// The display form of one named field.
    Field(String),
    /// A user function of (row, index).
    Func(Rc<dyn Fn(&Row, Option<usize>) -> Value>),
}

impl Default for IdentitySource {
    fn default() -> Self {
        IdentitySource::AllFields
    }
}

impl std::fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentitySource::AllFields => f.write_str("AllFields"),
            IdentitySource::Field(name) => f.debug_tuple("Field").field(name).finish(),
            IdentitySource::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Derive the id of `row`. Deterministic for a fixed source and row content.
pub fn row_id(row: &Row, source: &IdentitySource, index: Option<usize>) -> String {
    match source {
        IdentitySource::Field(name) => row.get(name).map(Value::display).unwrap_or_default(),
        IdentitySource::Func(f) => f(row, index).display(),
        IdentitySource::AllFields => {
            let mut id = String::new();
            for (_, value) in row.fields() {
                id.push_str(&value.display());
            }
            id
        }
    }
}

/// Linear scan for the first row whose id equals `id`. O(n) per call; bulk
/// mutations that look rows up one by one pay this per row.
pub fn find_by_id(
    rows: &[SharedRow],
    source: &IdentitySource,
    id: &str,
) -> Option<(SharedRow, usize)> {
    for (i, row) in rows.iter().enumerate() {
        if row_id(&row.borrow(), source, Some(i)) == id {
            return Some((row.clone(), i));
        }
    }
    None
}
