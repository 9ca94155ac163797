//! The split grid: two synchronized sub-grids presenting one dataset.
//!
//! Frozen columns live in a left sub-grid that never scrolls horizontally;
//! the remaining columns live in a right sub-grid that does. Both hold
//! handles to the same rows in the same order, so every interaction on one
//! side is replayed on the other with identical indices and the two stay
//! mirror images by construction.
//!
//! Vertical scroll synchronizes from the active side (the one the pointer
//! entered last) to the other; the reverse direction is ignored, which is
//! what breaks the feedback loop between the two scroll sources.

use crate::column::{self, Column, Width};
use crate::error::ConfigError;
use crate::event::{GridCallbacks, GridEvent, Side};
use crate::grid::{GridOptions, SingleGrid};
use crate::identity::IdentitySource;
use crate::render::{GridStyles, render_grid};
use crate::row::{Row, SharedRow, shallow_copy};
use crate::sort::{SortDirection, sort_rows};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

impl Side {
    fn other(self) -> Side {
        match self {
            Side::Frozen => Side::Scrollable,
            Side::Scrollable => Side::Frozen,
        }
    }
}

#[derive(Debug)]
pub struct SplitGridOptions {
    pub name: String,
    /// Full column set; the `is_frozen` flag partitions it.
    pub columns: Vec<Column>,
    pub data: Vec<SharedRow>,
    pub identity: IdentitySource,
    pub cancel_active_row: bool,
    pub click_means_active: bool,
    pub dbl_click_means_lock: bool,
    pub flash_when_update: bool,
    pub virtual_render: bool,
    pub visible_rows_count: usize,
    pub row_height: u32,
    pub scroll_threshold: usize,
}

impl Default for SplitGridOptions {
    fn default() -> Self {
        let grid = GridOptions::default();
        Self {
            name: grid.name,
            columns: Vec::new(),
            data: Vec::new(),
            identity: IdentitySource::AllFields,
            cancel_active_row: grid.cancel_active_row,
            click_means_active: grid.click_means_active,
            dbl_click_means_lock: grid.dbl_click_means_lock,
            flash_when_update: grid.flash_when_update,
            virtual_render: grid.virtual_render,
            visible_rows_count: grid.visible_rows_count,
            row_height: grid.row_height,
            scroll_threshold: grid.scroll_threshold,
        }
    }
}

#[derive(Debug)]
pub struct SplitGrid {
    frozen: SingleGrid,
    scrollable: SingleGrid,
    /// Configuration as normalized at construction. Its `data` is drained
    /// into the canonical set; the full column list stays here and is what
    /// sorts the canonical data.
    options: SplitGridOptions,
    canonical: Vec<SharedRow>,
    frozen_count: usize,
    active_side: Side,
    /// Global (column, direction) currently sorting the dataset.
    sort: Option<(usize, SortDirection)>,
    /// The scrollable side is shifted left by this many cells.
    scroll_x: u16,
    /// Set while the scrollable side is horizontally scrolled; the frozen
    /// edge should cast a shadow to signal hidden columns.
    left_shadow: bool,
    pub callbacks: GridCallbacks,
}

impl SplitGrid {
    pub fn new(mut options: SplitGridOptions) -> Result<Self, ConfigError> {
        if options.columns.is_empty() {
            return Err(ConfigError::EmptyColumns);
        }
        for col in &options.columns {
            match col.width {
                None => {
                    return Err(ConfigError::MissingWidth {
                        column: col.name.clone(),
                    });
                }
                Some(Width::Percent(_)) => {
                    return Err(ConfigError::PercentWidthInFrozenMode {
                        column: col.name.clone(),
                    });
                }
                Some(Width::Cells(_)) => {}
            }
            if col.is_sequence && !col.is_frozen {
                return Err(ConfigError::SequenceNotFrozen {
                    column: col.name.clone(),
                });
            }
        }
        if !options.columns.iter().any(|c| c.is_frozen) {
            return Err(ConfigError::NoFrozenColumns);
        }

        let sort = column::normalize(&mut options.columns)?;
        // Canonical keeps the caller's insertion order; only the copies
        // handed to the sub-grids are sorted.
        let canonical = std::mem::take(&mut options.data);
        let mut ordered = shallow_copy(&canonical);
        sort_rows(&mut ordered, &options.columns, sort);

        let (frozen_cols, scroll_cols) = column::split(&options.columns);
        let frozen_count = frozen_cols.len();

        let sub_options = |columns: Vec<Column>, side: &str| GridOptions {
            name: format!("{}-{side}", options.name),
            columns,
            data: shallow_copy(&ordered),
            width: None,
            identity: options.identity.clone(),
            freeze_head: true,
            cancel_active_row: options.cancel_active_row,
            click_means_active: options.click_means_active,
            dbl_click_means_lock: options.dbl_click_means_lock,
            flash_when_update: options.flash_when_update,
            virtual_render: options.virtual_render,
            visible_rows_count: options.visible_rows_count,
            row_height: options.row_height,
            scroll_threshold: options.scroll_threshold,
            delegate_sort: true,
        };

        let frozen = SingleGrid::new(sub_options(frozen_cols, "frozen"))?;
        let scrollable = SingleGrid::new(sub_options(scroll_cols, "scrollable"))?;

        Ok(Self {
            frozen,
            scrollable,
            options,
            canonical,
            frozen_count,
            active_side: Side::Scrollable,
            sort,
            scroll_x: 0,
            left_shadow: false,
            callbacks: GridCallbacks::default(),
        })
    }

    /// Tear down and rebuild from a fresh configuration, keeping the
    /// installed callbacks.
    pub fn set_options(&mut self, options: SplitGridOptions) -> Result<(), ConfigError> {
        let rebuilt = SplitGrid::new(options)?;
        let callbacks = std::mem::take(&mut self.callbacks);
        self.teardown();
        *self = rebuilt;
        self.callbacks = callbacks;
        Ok(())
    }

    pub fn grid(&self, side: Side) -> &SingleGrid {
        match side {
            Side::Frozen => &self.frozen,
            Side::Scrollable => &self.scrollable,
        }
    }

    fn grid_mut(&mut self, side: Side) -> &mut SingleGrid {
        match side {
            Side::Frozen => &mut self.frozen,
            Side::Scrollable => &mut self.scrollable,
        }
    }

    /// Current configuration. `data` is empty here; the rows live in the
    /// canonical set and the sub-grid states.
    pub fn options(&self) -> &SplitGridOptions {
        &self.options
    }

    pub fn columns(&self) -> &[Column] {
        &self.options.columns
    }

    pub fn frozen_count(&self) -> usize {
        self.frozen_count
    }

    pub fn active_side(&self) -> Side {
        self.active_side
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    pub fn left_shadow(&self) -> bool {
        self.left_shadow
    }

    pub fn row_count(&self) -> usize {
        self.frozen.row_count()
    }

    /// Translate a sub-grid-local column index to the global one.
    fn global_col(&self, side: Side, local: usize) -> usize {
        column::global_index(self.frozen_count, side == Side::Frozen, local)
    }

    // ---- interactions ----

    /// The pointer entered `side`; scroll synchronization now flows from it.
    pub fn handle_enter(&mut self, side: Side) {
        self.active_side = side;
        if let Some(on_enter) = self.callbacks.on_enter.as_mut() {
            on_enter(side);
        }
    }

    /// Vertical scroll on `side`. Only the active side drives; the mirrored
    /// offset on the other side would otherwise echo back.
    pub fn handle_scroll(&mut self, side: Side, top: u32) {
        if side != self.active_side {
            return;
        }
        self.grid_mut(side).set_scroll_top(top);
        self.grid_mut(side.other()).set_scroll_top(top);
        if let Some(on_scroll) = self.callbacks.on_scroll.as_mut() {
            on_scroll(top);
        }
    }

    /// Horizontal scroll of the scrollable section.
    pub fn handle_horizontal_scroll(&mut self, left: u16) {
        self.scroll_x = left;
        self.left_shadow = left > 0;
    }

    /// A click at (presentation row, local column) on `side`. The identical
    /// transition is replayed on the other side, whose events are discarded.
    pub fn handle_click(&mut self, side: Side, row: usize, col: usize) {
        let events = self.grid_mut(side).handle_click(row, col);
        let _ = self.grid_mut(side.other()).handle_click(row, col);
        self.dispatch(side, events);
    }

    pub fn handle_dbl_click(&mut self, side: Side, row: usize, col: usize) {
        let events = self.grid_mut(side).handle_dbl_click(row, col);
        let _ = self.grid_mut(side.other()).handle_dbl_click(row, col);
        self.dispatch(side, events);
    }

    /// Hover lights the same row on both sides; only the entered cell gets a
    /// cell-level mark.
    pub fn handle_hover(&mut self, side: Side, row: usize, col: usize) {
        let events = self.grid_mut(side).handle_hover(row, col);
        self.grid_mut(side.other()).apply_hover(Some((row, col)));
        self.dispatch(side, events);
    }

    /// The pointer left the body of either side entirely.
    pub fn handle_body_leave(&mut self, side: Side) {
        let events = self.grid_mut(side).handle_body_leave();
        self.grid_mut(side.other()).apply_hover(None);
        self.dispatch(side, events);
    }

    /// A click on the sort indicator (`column` is the global index).
    pub fn handle_sort_click(&mut self, column: usize, direction: SortDirection) {
        let (side, local) = self.locate_column(column);
        let events = self.grid_mut(side).handle_sort_click(local, direction);
        self.dispatch(side, events);
    }

    /// A click on a header cell (`column` is the global index): cycles
    /// ascending, descending, none.
    pub fn handle_header_click(&mut self, column: usize) {
        let (side, local) = self.locate_column(column);
        let events = self.grid_mut(side).handle_header_click(local);
        self.dispatch(side, events);
    }

    fn locate_column(&self, global: usize) -> (Side, usize) {
        if global < self.frozen_count {
            (Side::Frozen, global)
        } else {
            (Side::Scrollable, global - self.frozen_count)
        }
    }

    /// Apply a sort decided on `side`: order a working copy of the
    /// canonical data, push it to both sub-grids, and turn off the other
    /// side's indicator. The canonical set itself keeps insertion order, so
    /// clearing the sort restores it.
    fn apply_sort(
        &mut self,
        side: Side,
        local: Option<usize>,
        direction: Option<SortDirection>,
    ) {
        self.sort = match (local, direction) {
            (Some(local), Some(direction)) => Some((self.global_col(side, local), direction)),
            _ => None,
        };
        self.grid_mut(side.other()).clear_sort_indicator();

        let mut ordered = shallow_copy(&self.canonical);
        sort_rows(&mut ordered, &self.options.columns, self.sort);
        self.frozen.update_state_data(shallow_copy(&ordered));
        self.scrollable.update_state_data(ordered);
    }

    /// Translate one side's events to global terms, apply split-grid effects
    /// and forward to the callbacks.
    fn dispatch(&mut self, side: Side, events: Vec<GridEvent>) {
        for event in events {
            match event {
                GridEvent::SortRequest { column, direction } => {
                    self.apply_sort(side, column, direction);
                    let sort = self.sort;
                    if let Some(on_sort) = self.callbacks.on_sort.as_mut() {
                        on_sort(sort.map(|(c, _)| c), sort.map(|(_, d)| d));
                    }
                }
                GridEvent::Click { row_id, col } => {
                    let col = col.map(|c| self.global_col(side, c));
                    if let Some(on_click) = self.callbacks.on_click.as_mut() {
                        on_click(row_id.as_deref(), col);
                    }
                }
                GridEvent::DblClick { row_id, col } => {
                    let col = col.map(|c| self.global_col(side, c));
                    if let Some(on_dbl_click) = self.callbacks.on_dbl_click.as_mut() {
                        on_dbl_click(row_id.as_deref(), col);
                    }
                }
                GridEvent::Hover { row, col } => {
                    let col = col.map(|c| self.global_col(side, c));
                    if let Some(on_hover) = self.callbacks.on_hover.as_mut() {
                        on_hover(row, col);
                    }
                }
                GridEvent::Scroll { top } => {
                    if let Some(on_scroll) = self.callbacks.on_scroll.as_mut() {
                        on_scroll(top);
                    }
                }
                GridEvent::Enter => {
                    if let Some(on_enter) = self.callbacks.on_enter.as_mut() {
                        on_enter(side);
                    }
                }
            }
        }
    }

    // ---- programmatic state ----

    pub fn set_active_row(&mut self, id: Option<&str>) {
        self.frozen.set_active_row(id);
        self.scrollable.set_active_row(id);
    }

    pub fn set_locked_row(&mut self, id: Option<&str>) {
        self.frozen.set_locked_row(id);
        self.scrollable.set_locked_row(id);
    }

    pub fn active_row(&self) -> Option<String> {
        self.frozen.state().active_row.clone()
    }

    pub fn locked_row(&self) -> Option<String> {
        self.frozen.state().locked_row.clone()
    }

    // ---- data mutation (fan-out) ----

    /// Patch one row by identity. Rows are shared handles, so the second
    /// fan-out call sees already-patched values and only refreshes its own
    /// cells.
    pub fn update_row(&mut self, patch: &Row) {
        self.frozen.update_row(patch);
        self.scrollable.update_row(patch);
    }

    pub fn replace_rows(&mut self, data: Vec<SharedRow>) {
        self.canonical = data;
        let mut ordered = shallow_copy(&self.canonical);
        sort_rows(&mut ordered, &self.options.columns, self.sort);
        self.frozen.replace_rows(shallow_copy(&ordered));
        self.scrollable.replace_rows(ordered);
    }

    pub fn append_rows(&mut self, rows: Vec<SharedRow>) {
        self.canonical.extend(rows.iter().cloned());
        self.frozen.append_rows(shallow_copy(&rows));
        self.scrollable.append_rows(rows);
    }

    pub fn prepend_rows(&mut self, rows: Vec<SharedRow>) {
        for (i, row) in rows.iter().enumerate() {
            self.canonical.insert(i, row.clone());
        }
        self.frozen.prepend_rows(shallow_copy(&rows));
        self.scrollable.prepend_rows(rows);
    }

    pub fn delete_rows(&mut self, ids: &[String]) {
        use crate::identity::find_by_id;
        for id in ids {
            if let Some((_, index)) = find_by_id(&self.canonical, &self.options.identity, id) {
                self.canonical.remove(index);
            }
        }
        self.frozen.delete_rows(ids);
        self.scrollable.delete_rows(ids);
    }

    /// Rebuild both sub-grids' surfaces from their current state.
    pub fn full_render(&mut self) {
        self.frozen.full_render();
        self.scrollable.full_render();
    }

    /// Clear every transient "changed" cell mark on both sides.
    pub fn clear_changed_marks(&mut self) {
        self.frozen.surface_mut().clear_changed_marks();
        self.scrollable.surface_mut().clear_changed_marks();
    }

    // ---- column resizing ----

    /// Start dragging the resize handle of the global column. Each side's
    /// last column has no handle, same as a standalone grid.
    pub fn begin_resize(&mut self, column: usize, x: i32) -> bool {
        let (side, local) = self.locate_column(column);
        self.grid_mut(side).begin_resize(local, x)
    }

    /// Pointer moved during a drag; only the side holding a session reacts.
    pub fn resize_move(&mut self, x: i32) {
        self.frozen.resize_move(x);
        self.scrollable.resize_move(x);
    }

    pub fn end_resize(&mut self) {
        self.frozen.end_resize();
        self.scrollable.end_resize();
    }

    /// Fit the global column to its widest rendered value.
    pub fn auto_fit_column(&mut self, column: usize) {
        let (side, local) = self.locate_column(column);
        self.grid_mut(side).auto_fit_column(local);
    }

    /// Release both sub-grids' resources.
    pub fn teardown(&mut self) {
        self.frozen.teardown();
        self.scrollable.teardown();
        self.canonical.clear();
    }

    // ---- drawing ----

    /// Draw both sections side by side: frozen columns at the left edge,
    /// scrollable columns (shifted by the horizontal scroll) to their right.
    pub fn render(&self, area: Rect, buf: &mut Buffer, styles: &GridStyles) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let frozen_w = self.frozen_width().min(area.width);
        let frozen_area = Rect::new(area.x, area.y, frozen_w, area.height);
        let scroll_area = Rect::new(
            area.x + frozen_w,
            area.y,
            area.width - frozen_w,
            area.height,
        );
        render_grid(&self.frozen, frozen_area, buf, 0, styles);
        render_grid(&self.scrollable, scroll_area, buf, self.scroll_x, styles);
    }

    /// Width of the frozen section: its column widths plus separators.
    pub fn frozen_width(&self) -> u16 {
        let widths = &self.frozen.state().col_widths;
        let cells: u32 = widths.iter().map(|&w| w as u32).sum();
        let seps = widths.len().saturating_sub(1) as u32;
        (cells + seps).min(u16::MAX as u32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::shared;
    use crate::value::Value;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("#", "seq").sequence().frozen().width(4),
            Column::new("Id", "id").frozen().width(8),
            Column::new("Score", "score").sortable().width(8),
            Column::new("Note", "note").width(12),
        ]
    }

    fn data(n: usize) -> Vec<SharedRow> {
        (0..n)
            .map(|i| {
                shared(
                    Row::new()
                        .with("id", format!("R{i}"))
                        .with("score", (n - i) as i64)
                        .with("note", format!("note-{i}")),
                )
            })
            .collect()
    }

    fn split(n: usize) -> SplitGrid {
        SplitGrid::new(SplitGridOptions {
            columns: columns(),
            data: data(n),
            identity: IdentitySource::Field("id".into()),
            click_means_active: true,
            dbl_click_means_lock: true,
            ..SplitGridOptions::default()
        })
        .unwrap()
    }

    fn ids(grid: &SingleGrid) -> Vec<String> {
        grid.state()
            .data
            .iter()
            .map(|r| r.borrow().get("id").unwrap().display())
            .collect()
    }

    #[test]
    fn validation_rejects_bad_configurations() {
        let no_frozen = SplitGridOptions {
            columns: vec![Column::new("A", "a").width(4)],
            ..SplitGridOptions::default()
        };
        assert_eq!(
            SplitGrid::new(no_frozen).unwrap_err(),
            ConfigError::NoFrozenColumns
        );

        let percent = SplitGridOptions {
            columns: vec![Column::new("A", "a").frozen().width_percent(50.0)],
            ..SplitGridOptions::default()
        };
        assert!(matches!(
            SplitGrid::new(percent).unwrap_err(),
            ConfigError::PercentWidthInFrozenMode { .. }
        ));

        let loose_sequence = SplitGridOptions {
            columns: vec![
                Column::new("A", "a").frozen().width(4),
                Column::new("#", "seq").sequence().width(4),
            ],
            ..SplitGridOptions::default()
        };
        assert!(matches!(
            SplitGrid::new(loose_sequence).unwrap_err(),
            ConfigError::SequenceNotFrozen { .. }
        ));

        let missing_width = SplitGridOptions {
            columns: vec![Column::new("A", "a").frozen()],
            ..SplitGridOptions::default()
        };
        assert!(matches!(
            SplitGrid::new(missing_width).unwrap_err(),
            ConfigError::MissingWidth { .. }
        ));
    }

    #[test]
    fn both_sides_share_rows_in_the_same_order() {
        let g = split(4);
        assert_eq!(ids(g.grid(Side::Frozen)), ids(g.grid(Side::Scrollable)));
        for (a, b) in g
            .grid(Side::Frozen)
            .state()
            .data
            .iter()
            .zip(&g.grid(Side::Scrollable).state().data)
        {
            assert!(std::rc::Rc::ptr_eq(a, b));
        }
    }

    #[test]
    fn scroll_syncs_only_from_the_active_side() {
        let mut g = split(50);
        g.handle_enter(Side::Scrollable);
        g.handle_scroll(Side::Scrollable, 12);
        assert_eq!(g.grid(Side::Frozen).state().scroll_top, 12);
        assert_eq!(g.grid(Side::Scrollable).state().scroll_top, 12);

        // The frozen side is not active; its scroll is ignored.
        g.handle_scroll(Side::Frozen, 30);
        assert_eq!(g.grid(Side::Frozen).state().scroll_top, 12);
        assert_eq!(g.grid(Side::Scrollable).state().scroll_top, 12);
    }

    #[test]
    fn sort_on_one_side_reorders_both_and_clears_the_other_indicator() {
        let mut g = split(3);
        // "score" is global column 2 (scrollable local 0), descending data.
        g.handle_header_click(2);
        assert_eq!(g.sort(), Some((2, SortDirection::Ascend)));
        assert_eq!(ids(g.grid(Side::Frozen)), ["R2", "R1", "R0"]);
        assert_eq!(ids(g.grid(Side::Scrollable)), ["R2", "R1", "R0"]);
        assert_eq!(g.grid(Side::Frozen).state().sort, None);
        assert_eq!(
            g.grid(Side::Scrollable).state().sort,
            Some((0, SortDirection::Ascend))
        );

        // Cycle to descending, then off.
        g.handle_header_click(2);
        assert_eq!(g.sort(), Some((2, SortDirection::Descend)));
        g.handle_header_click(2);
        assert_eq!(g.sort(), None);
    }

    #[test]
    fn clearing_sort_restores_insertion_order() {
        // Scores are deliberately non-monotonic so every step produces a
        // distinct order.
        let rows = [("R0", 2), ("R1", 3), ("R2", 1)]
            .into_iter()
            .map(|(id, score)| {
                shared(
                    Row::new()
                        .with("id", id)
                        .with("score", score as i64)
                        .with("note", ""),
                )
            })
            .collect();
        let mut g = SplitGrid::new(SplitGridOptions {
            columns: columns(),
            data: rows,
            identity: IdentitySource::Field("id".into()),
            ..SplitGridOptions::default()
        })
        .unwrap();

        g.handle_header_click(2);
        assert_eq!(g.sort(), Some((2, SortDirection::Ascend)));
        assert_eq!(ids(g.grid(Side::Frozen)), ["R2", "R0", "R1"]);

        g.handle_header_click(2);
        assert_eq!(g.sort(), Some((2, SortDirection::Descend)));
        assert_eq!(ids(g.grid(Side::Frozen)), ["R1", "R0", "R2"]);

        // Turning the sort off goes back to the order the rows came in.
        g.handle_header_click(2);
        assert_eq!(g.sort(), None);
        assert_eq!(ids(g.grid(Side::Frozen)), ["R0", "R1", "R2"]);
        assert_eq!(ids(g.grid(Side::Scrollable)), ["R0", "R1", "R2"]);
    }

    #[test]
    fn replaced_rows_keep_their_own_insertion_order() {
        let mut g = split(3);
        g.handle_header_click(2);
        g.replace_rows(vec![
            shared(Row::new().with("id", "B").with("score", 1).with("note", "")),
            shared(Row::new().with("id", "A").with("score", 2).with("note", "")),
        ]);
        // The active sort presents the replacement sorted...
        assert_eq!(ids(g.grid(Side::Frozen)), ["B", "A"]);
        // ...and clearing it yields the replacement's original order.
        g.handle_header_click(2);
        g.handle_header_click(2);
        assert_eq!(g.sort(), None);
        assert_eq!(ids(g.grid(Side::Frozen)), ["B", "A"]);

        g.replace_rows(vec![
            shared(Row::new().with("id", "Z").with("score", 9).with("note", "")),
            shared(Row::new().with("id", "Y").with("score", 8).with("note", "")),
        ]);
        g.handle_header_click(2);
        assert_eq!(ids(g.grid(Side::Frozen)), ["Y", "Z"]);
        g.handle_header_click(2);
        g.handle_header_click(2);
        assert_eq!(ids(g.grid(Side::Frozen)), ["Z", "Y"]);
    }

    #[test]
    fn options_are_retained_and_queryable() {
        let g = split(3);
        assert_eq!(g.options().columns.len(), 4);
        assert!(g.options().click_means_active);
        assert!(g.options().dbl_click_means_lock);
        // The rows were drained into the grid itself.
        assert!(g.options().data.is_empty());
        assert_eq!(g.row_count(), 3);
    }

    #[test]
    fn clicks_replay_on_the_sibling() {
        let mut g = split(5);
        g.handle_click(Side::Scrollable, 3, 0);
        assert_eq!(
            g.grid(Side::Frozen).state().active_row.as_deref(),
            Some("R3")
        );
        assert_eq!(
            g.grid(Side::Scrollable).state().active_row.as_deref(),
            Some("R3")
        );

        g.handle_dbl_click(Side::Frozen, 1, 1);
        assert_eq!(g.locked_row().as_deref(), Some("R1"));
        assert_eq!(ids(g.grid(Side::Frozen))[0], "R1");
        assert_eq!(ids(g.grid(Side::Scrollable))[0], "R1");
    }

    #[test]
    fn callbacks_receive_global_column_indices() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut g = split(3);
        g.callbacks.on_click = Some(Box::new(move |id, col| {
            sink.borrow_mut().push((id.map(str::to_string), col));
        }));

        g.handle_click(Side::Scrollable, 0, 1); // local col 1 -> global 3
        g.handle_click(Side::Frozen, 1, 1); // frozen side maps 1:1
        let seen = seen.borrow();
        assert_eq!(seen[0], (Some("R0".to_string()), Some(3)));
        assert_eq!(seen[1], (Some("R1".to_string()), Some(1)));
    }

    #[test]
    fn update_fans_out_to_both_surfaces() {
        let mut g = split(3);
        g.update_row(&Row::new().with("id", "R1").with("note", "patched"));

        let scrollable = g.grid(Side::Scrollable);
        let slot = scrollable.surface().slot_of("R1").unwrap();
        assert_eq!(scrollable.surface().get(slot).unwrap().cells[1], "patched");
        // The shared row carries the patch for the frozen side too.
        assert_eq!(
            g.grid(Side::Frozen).state().data[1].borrow().get("note"),
            Some(&Value::Str("patched".into()))
        );
    }

    #[test]
    fn append_and_delete_stay_consistent() {
        let mut g = split(3);
        g.append_rows(vec![shared(
            Row::new().with("id", "X").with("score", 0).with("note", "x"),
        )]);
        assert_eq!(g.row_count(), 4);
        assert_eq!(ids(g.grid(Side::Frozen)), ids(g.grid(Side::Scrollable)));

        g.set_active_row(Some("X"));
        g.delete_rows(&["X".to_string(), "missing".to_string()]);
        assert_eq!(g.row_count(), 3);
        assert_eq!(g.active_row(), None);
        assert_eq!(ids(g.grid(Side::Frozen)), ids(g.grid(Side::Scrollable)));
    }

    #[test]
    fn horizontal_scroll_raises_the_left_shadow() {
        let mut g = split(2);
        assert!(!g.left_shadow());
        g.handle_horizontal_scroll(7);
        assert!(g.left_shadow());
        g.handle_horizontal_scroll(0);
        assert!(!g.left_shadow());
    }

    #[test]
    fn two_column_split_sorts_both_sides() {
        let mut g = SplitGrid::new(SplitGridOptions {
            columns: vec![
                Column::new("Id", "id").frozen().width(10),
                Column::new("Val", "val")
                    .sortable()
                    .sort_directions(vec![SortDirection::Ascend])
                    .width(20),
            ],
            data: vec![
                shared(Row::new().with("id", "a").with("val", 3)),
                shared(Row::new().with("id", "b").with("val", 1)),
            ],
            identity: IdentitySource::Field("id".into()),
            ..SplitGridOptions::default()
        })
        .unwrap();

        assert_eq!(g.grid(Side::Frozen).columns().len(), 1);
        assert_eq!(g.grid(Side::Scrollable).columns()[0].name, "val");
        assert_eq!(ids(g.grid(Side::Frozen)), ["a", "b"]);

        g.handle_header_click(1);
        assert_eq!(g.sort(), Some((1, SortDirection::Ascend)));
        assert_eq!(ids(g.grid(Side::Frozen)), ["b", "a"]);
        assert_eq!(ids(g.grid(Side::Scrollable)), ["b", "a"]);
    }

    #[test]
    fn resize_routes_to_the_owning_side() {
        let mut g = SplitGrid::new(SplitGridOptions {
            columns: vec![
                Column::new("A", "a").frozen().resizable().width(8),
                Column::new("B", "b").frozen().width(8),
                Column::new("C", "c").resizable().width(8),
                Column::new("D", "d").width(8),
            ],
            data: data(1),
            ..SplitGridOptions::default()
        })
        .unwrap();

        // Global column 2 is the scrollable side's first column.
        assert!(g.begin_resize(2, 50));
        g.resize_move(56);
        assert_eq!(g.grid(Side::Scrollable).state().col_widths[0], 14);
        assert_eq!(g.grid(Side::Frozen).state().col_widths[0], 8);
        g.end_resize();
        assert!(!g.grid(Side::Scrollable).is_resizing());

        // Each side's last column has no handle.
        assert!(!g.begin_resize(1, 0));
        assert!(!g.begin_resize(3, 0));
    }

    #[test]
    fn end_to_end_interaction_scenario() {
        let mut g = split(30);

        // Sort by score ascending, activate a row, lock another.
        g.handle_header_click(2);
        g.handle_click(Side::Scrollable, 0, 0); // top row after sort: R29
        assert_eq!(g.active_row().as_deref(), Some("R29"));

        g.handle_dbl_click(Side::Frozen, 4, 0);
        let locked = g.locked_row().unwrap();
        assert_eq!(ids(g.grid(Side::Frozen))[0], locked);
        assert_eq!(ids(g.grid(Side::Scrollable))[0], locked);

        // A follow-up click elsewhere cancels the lock and moves activation.
        g.handle_click(Side::Frozen, 2, 0);
        assert_eq!(g.locked_row(), None);
        assert!(g.active_row().is_some());

        // Patch the active row; both sides observe it.
        let active = g.active_row().unwrap();
        g.update_row(&Row::new().with("id", active.clone()).with("note", "seen"));
        let frozen_ids = ids(g.grid(Side::Frozen));
        let index = frozen_ids.iter().position(|i| *i == active).unwrap();
        assert_eq!(
            g.grid(Side::Frozen).state().data[index].borrow().get("note"),
            Some(&Value::Str("seen".into()))
        );
        assert_eq!(ids(g.grid(Side::Frozen)), ids(g.grid(Side::Scrollable)));
    }
}
