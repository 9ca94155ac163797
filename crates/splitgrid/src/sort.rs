//! Row ordering.
//!
//! Sorting acts on a working copy supplied by the caller, never the caller's
//! original collection. Two quirks of long standing are kept on purpose:
//!
//! - the default comparator parses both values as floats and reports any
//!   unparseable pair as equal, so non-numeric values keep their relative
//!   input order rather than grouping together;
//! - descending order is the *reverse* of the ascending result, not an
//!   inverted comparator, so ties come out order-reversed relative to input.

use crate::column::Column;
use crate::row::SharedRow;
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascend,
    Descend,
}

/// A column's comparison rule.
#[derive(Clone)]
pub enum SortRule {
    /// Not sortable.
    None,
    /// The numeric default comparator.
    Default,
    /// A caller-supplied comparison of two field values.
    Custom(Rc<dyn Fn(&Value, &Value) -> Ordering>),
}

impl SortRule {
    pub fn is_sortable(&self) -> bool {
        !matches!(self, SortRule::None)
    }
}

impl std::fmt::Debug for SortRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortRule::None => f.write_str("None"),
            SortRule::Default => f.write_str("Default"),
            SortRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Float comparison with null as zero and unparseable pairs equal.
pub fn default_compare(a: &Value, b: &Value) -> Ordering {
    match (a.sort_key(), b.sort_key()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Reorder `rows` in place by the given column and direction. With no sort
/// column the input order is preserved as-is (insertion order, not any
/// canonical order).
pub fn sort_rows(rows: &mut [SharedRow], columns: &[Column], sort: Option<(usize, SortDirection)>) {
    let Some((column_index, direction)) = sort else {
        return;
    };
    let Some(column) = columns.get(column_index) else {
        return;
    };

    let name = column.name.clone();
    let rule = column.sorter.clone();
    rows.sort_by(|a, b| {
        let a = a.borrow();
        let b = b.borrow();
        let av = a.get(&name).cloned().unwrap_or(Value::Null);
        let bv = b.get(&name).cloned().unwrap_or(Value::Null);
        match &rule {
            SortRule::Custom(cmp) => cmp(&av, &bv),
            _ => default_compare(&av, &bv),
        }
    });
    if direction == SortDirection::Descend {
        rows.reverse();
    }
}
