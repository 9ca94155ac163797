//! Rows and shared row handles.
//!
//! A [`Row`] is an open, insertion-ordered mapping from field name to
//! [`Value`]. Rows are owned by the caller and shared between views: the
//! frozen and scrollable sub-grids of a split grid both hold handles to the
//! same rows, so a field patch applied through one view is visible through
//! every other. [`SharedRow`] (`Rc<RefCell<Row>>`) carries that identity;
//! collection copies are always shallow ([`shallow_copy`]).

use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// An insertion-ordered field map. Field iteration order is the order fields
/// were first set, which is what identity concatenation relies on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Set a field, inserting it at the end if it does not exist yet.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy into `self` every field of `patch` that `self` also has. Fields
    /// unknown to `self` are ignored; this is the differential-update rule
    /// used by row patching.
    pub fn patch_existing(&mut self, patch: &Row) -> Vec<String> {
        let mut touched = Vec::new();
        for (name, value) in patch.fields() {
            if let Some((_, v)) = self.fields.iter_mut().find(|(n, _)| n == name) {
                *v = value.clone();
                touched.push(name.to_string());
            }
        }
        touched
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.set(name, value);
        }
        row
    }
}

/// A row handle shared between the canonical collection and every state-data
/// copy that references the row.
pub type SharedRow = Rc<RefCell<Row>>;

pub fn shared(row: Row) -> SharedRow {
    Rc::new(RefCell::new(row))
}

/// Shallow copy: a new collection whose elements are the same row handles.
pub fn shallow_copy(rows: &[SharedRow]) -> Vec<SharedRow> {
    rows.to_vec()
}
