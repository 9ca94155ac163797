//! The materialized presentation arena.
//!
//! Instead of querying a live widget tree at interaction time, each grid
//! maintains an arena of rendered rows plus an id-keyed slot map, so "find
//! the cell for row R, column C" is a map lookup and an index. Under virtual
//! rendering the arena holds only the window's rows and `offset_rows` records
//! where the block sits in the full dataset.

use std::collections::HashMap;

/// One rendered row: the row id, its rendered cell strings, and per-cell
/// "changed" marks used for transient update highlights.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowSurface {
    pub id: String,
    pub cells: Vec<String>,
    pub changed: Vec<bool>,
}

impl RowSurface {
    pub fn new(id: String, cells: Vec<String>) -> Self {
        let changed = vec![false; cells.len()];
        Self { id, cells, changed }
    }
}

#[derive(Debug, Default)]
pub struct Surface {
    rows: Vec<RowSurface>,
    by_id: HashMap<String, usize>,
    /// Index of the first materialized row within the full state data; the
    /// visual offset transform under virtual rendering.
    pub offset_rows: usize,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.by_id.clear();
        self.offset_rows = 0;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: RowSurface) {
        // Colliding ids: last pushed wins in the slot map. Id uniqueness is a
        // caller contract, not validated here.
        self.by_id.insert(row.id.clone(), self.rows.len());
        self.rows.push(row);
    }

    pub fn get(&self, slot: usize) -> Option<&RowSurface> {
        self.rows.get(slot)
    }

    pub fn rows(&self) -> &[RowSurface] {
        &self.rows
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn row_of(&self, id: &str) -> Option<&RowSurface> {
        self.slot_of(id).and_then(|slot| self.rows.get(slot))
    }

    /// Replace one cell's rendered text if it differs. Returns whether the
    /// text actually changed; `mark` additionally flags the cell for a
    /// transient highlight when it did.
    pub fn update_cell(&mut self, id: &str, col: usize, text: String, mark: bool) -> bool {
        let Some(slot) = self.slot_of(id) else {
            return false;
        };
        let row = &mut self.rows[slot];
        let Some(cell) = row.cells.get_mut(col) else {
            return false;
        };
        if *cell == text {
            return false;
        }
        *cell = text;
        if mark {
            if let Some(flag) = row.changed.get_mut(col) {
                *flag = true;
            }
        }
        true
    }

    /// Clear every transient "changed" mark; the embedding app calls this
    /// once its highlight interval elapses.
    pub fn clear_changed_marks(&mut self) {
        for row in &mut self.rows {
            for flag in &mut row.changed {
                *flag = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(ids: &[&str]) -> Surface {
        let mut s = Surface::new();
        for id in ids {
            s.push(RowSurface::new(
                id.to_string(),
                vec!["a".into(), "b".into()],
            ));
        }
        s
    }

    #[test]
    fn slot_lookup_by_id() {
        let s = surface_with(&["r1", "r2", "r3"]);
        assert_eq!(s.slot_of("r2"), Some(1));
        assert_eq!(s.slot_of("zz"), None);
    }

    #[test]
    fn update_cell_skips_identical_text() {
        let mut s = surface_with(&["r1"]);
        assert!(!s.update_cell("r1", 0, "a".into(), true));
        assert!(!s.get(0).unwrap().changed[0]);
        assert!(s.update_cell("r1", 0, "z".into(), true));
        assert!(s.get(0).unwrap().changed[0]);
        s.clear_changed_marks();
        assert!(!s.get(0).unwrap().changed[0]);
    }

    #[test]
    fn update_cell_out_of_range_is_noop() {
        let mut s = surface_with(&["r1"]);
        assert!(!s.update_cell("r1", 9, "z".into(), false));
        assert!(!s.update_cell("zz", 0, "z".into(), false));
    }
}
