//! A single grid: one table's data and visual state.
//!
//! The grid owns a canonical row collection (caller data), a state-data copy
//! (possibly sorted, possibly reordered by row locking) and a materialized
//! [`Surface`]. Interaction handlers mutate state first, re-render second,
//! and return typed [`GridEvent`]s for the owner to dispatch; the grid never
//! calls back into whoever embeds it.

use crate::column::{self, Column, Width};
use crate::error::ConfigError;
use crate::event::GridEvent;
use crate::identity::{IdentitySource, find_by_id, row_id};
use crate::row::{Row, SharedRow, shallow_copy};
use crate::sort::{SortDirection, sort_rows};
use crate::surface::{RowSurface, Surface};
use crate::value::Value;
use crate::width::auto_fit_width;

/// Fallback column width when neither the column nor the grid provide one.
const DEFAULT_COL_WIDTH: u16 = 10;
/// Fallback grid width used to resolve percentage columns.
const DEFAULT_GRID_WIDTH: u16 = 80;

#[derive(Debug)]
pub struct GridOptions {
    /// Distinguishes the two sub-grids of a split grid in diagnostics.
    pub name: String,
    pub columns: Vec<Column>,
    /// Initial canonical row collection.
    pub data: Vec<SharedRow>,
    /// Grid width in cells; percentage columns resolve against it.
    pub width: Option<u16>,
    pub identity: IdentitySource,
    /// Frozen-header presentation: two structures share one width table, so
    /// every column must carry an absolute width.
    pub freeze_head: bool,
    /// Clicking the active row again clears activation instead of no-op.
    pub cancel_active_row: bool,
    /// Clicks mutate the active-row state (callbacks fire either way).
    pub click_means_active: bool,
    /// Double-clicks mutate the locked-row state.
    pub dbl_click_means_lock: bool,
    /// Mark cells "changed" on incremental updates for transient highlight.
    pub flash_when_update: bool,
    /// Only materialize the visible window of rows.
    pub virtual_render: bool,
    pub visible_rows_count: usize,
    /// Row height in scroll units (terminal cells).
    pub row_height: u32,
    /// Scroll distance, in rows, that triggers a window recompute; also the
    /// look-ahead/behind padding of the window.
    pub scroll_threshold: usize,
    /// Defer all resorting to the owner: sort clicks only toggle the
    /// indicator and emit [`GridEvent::SortRequest`].
    pub delegate_sort: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            name: "table".to_string(),
            columns: Vec::new(),
            data: Vec::new(),
            width: None,
            identity: IdentitySource::AllFields,
            freeze_head: false,
            cancel_active_row: false,
            click_means_active: false,
            dbl_click_means_lock: false,
            flash_when_update: false,
            virtual_render: false,
            visible_rows_count: 20,
            row_height: 1,
            scroll_threshold: 5,
            delegate_sort: false,
        }
    }
}

/// The contiguous index range of rows materialized into the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

/// Compute the visible window for `scrolled` rows of scroll offset.
/// Start is clamped to `[0, len - visible]`, end to `[visible, len]`, with
/// `threshold` rows of look-ahead/behind on both ends.
pub fn compute_window(len: usize, visible: usize, threshold: usize, scrolled: usize) -> Window {
    let start = scrolled.saturating_sub(threshold);
    let start = start.min(len.saturating_sub(visible));

    let mut end = scrolled + visible + threshold;
    if end > len {
        end = len;
    } else if end < visible {
        end = visible;
    }

    Window { start, end }
}

/// An in-progress column drag. Its existence *is* the acquisition: creating
/// one starts tracking, dropping it (via [`SingleGrid::end_resize`], which
/// runs unconditionally) releases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeSession {
    pub column: usize,
    pub last_x: i32,
}

#[derive(Debug, Default)]
pub struct GridState {
    /// The working row collection: shallow copy of canonical data, possibly
    /// sorted, reordered in place by row locking.
    pub data: Vec<SharedRow>,
    /// Current width of each column; the single source of truth shared by
    /// every structure presenting this grid (header and body alike).
    pub col_widths: Vec<u16>,
    pub sort: Option<(usize, SortDirection)>,
    pub active_row: Option<String>,
    pub locked_row: Option<String>,
    /// Last hovered (presentation row index, cell index).
    pub hover: Option<(usize, usize)>,
    pub scroll_top: u32,
    pub window: Option<Window>,
    pub resize: Option<ResizeSession>,
    /// Scroll offset at the last virtual render; gates window recomputes.
    last_render_scroll: u32,
}

#[derive(Debug)]
pub struct SingleGrid {
    options: GridOptions,
    canonical: Vec<SharedRow>,
    state: GridState,
    surface: Surface,
}

impl SingleGrid {
    pub fn new(mut options: GridOptions) -> Result<Self, ConfigError> {
        if options.columns.is_empty() {
            return Err(ConfigError::EmptyColumns);
        }
        if options.freeze_head {
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
            }
        }
        let initial_sort = column::normalize(&mut options.columns)?;

        let total = options.width.unwrap_or(DEFAULT_GRID_WIDTH);
        let col_widths: Vec<u16> = options
            .columns
            .iter()
            .map(|c| c.resolve_width(total, DEFAULT_COL_WIDTH))
            .collect();

        let canonical = std::mem::take(&mut options.data);
        let mut grid = Self {
            state: GridState {
                col_widths,
                sort: initial_sort,
                ..GridState::default()
            },
            options,
            canonical,
            surface: Surface::new(),
        };
        grid.state.data = grid.build_state_data(&grid.canonical);
        grid.full_render();
        Ok(grid)
    }

    /// Tear down and rebuild from a fresh configuration. The surface is
    /// destroyed and rebuilt; this is the only operation that does so.
    pub fn set_options(&mut self, options: GridOptions) -> Result<(), ConfigError> {
        let rebuilt = SingleGrid::new(options)?;
        self.teardown();
        *self = rebuilt;
        Ok(())
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn columns(&self) -> &[Column] {
        &self.options.columns
    }

    pub fn row_count(&self) -> usize {
        self.state.data.len()
    }

    /// Release every held resource; the grid presents nothing afterwards.
    pub fn teardown(&mut self) {
        self.surface.clear();
        self.state = GridState {
            col_widths: std::mem::take(&mut self.state.col_widths),
            ..GridState::default()
        };
        self.canonical.clear();
    }

    /// Shallow-copy `data` and apply the current sort. With delegated
    /// sorting the owner supplies pre-sorted data, so the copy is kept
    /// as-is.
    fn build_state_data(&self, data: &[SharedRow]) -> Vec<SharedRow> {
        let mut copy = shallow_copy(data);
        if !self.options.delegate_sort {
            sort_rows(&mut copy, &self.options.columns, self.state.sort);
        }
        copy
    }

    fn materialize_row(&self, index: usize) -> Option<RowSurface> {
        let row = self.state.data.get(index)?;
        let row = row.borrow();
        let id = row_id(&row, &self.options.identity, Some(index));
        let cells = self
            .options
            .columns
            .iter()
            .enumerate()
            .map(|(j, col)| {
                let value = row.get(&col.name).cloned().unwrap_or(Value::Null);
                col.render_cell(&value, index, j, &row)
            })
            .collect();
        Some(RowSurface::new(id, cells))
    }

    /// Full render: rebuild one surface row per state-data item, in state
    /// order, and reset scroll to the top.
    pub fn full_render(&mut self) {
        self.state.scroll_top = 0;
        self.state.last_render_scroll = 0;
        if self.options.virtual_render {
            self.virtual_render();
            return;
        }
        self.surface.clear();
        self.state.window = None;
        for i in 0..self.state.data.len() {
            if let Some(row) = self.materialize_row(i) {
                self.surface.push(row);
            }
        }
    }

    /// Materialize only the visible window around the current scroll offset.
    fn virtual_render(&mut self) {
        self.state.last_render_scroll = self.state.scroll_top;
        let scrolled = (self.state.scroll_top / self.options.row_height.max(1)) as usize;
        let window = compute_window(
            self.state.data.len(),
            self.options.visible_rows_count,
            self.options.scroll_threshold,
            scrolled,
        );
        self.state.window = Some(window);

        self.surface.clear();
        self.surface.offset_rows = window.start;
        for i in window.start..window.end {
            match self.materialize_row(i) {
                Some(row) => self.surface.push(row),
                None => break,
            }
        }
    }

    /// Update the vertical scroll offset; recompute the virtual window only
    /// once the accumulated delta exceeds `scroll_threshold` rows.
    fn apply_scroll(&mut self, top: u32) {
        self.state.scroll_top = top;
        if self.options.virtual_render {
            let row_height = self.options.row_height.max(1);
            let diff = top.abs_diff(self.state.last_render_scroll) / row_height;
            if diff as usize > self.options.scroll_threshold {
                self.virtual_render();
            }
        }
    }

    pub fn handle_scroll(&mut self, top: u32) -> Vec<GridEvent> {
        self.apply_scroll(top);
        vec![GridEvent::Scroll { top }]
    }

    /// Scroll sync entry used by the coordinator: same offset, no event.
    pub fn set_scroll_top(&mut self, top: u32) {
        self.apply_scroll(top);
    }

    fn scroll_row_into_view(&mut self, index: usize) {
        let row_height = self.options.row_height.max(1);
        let need = row_height * index as u32;
        let visible_h = self.options.visible_rows_count as u32 * row_height;
        let top = self.state.scroll_top;
        // One row of margin on both ends counts as "not visible".
        if need < top + row_height || need > top + visible_h.saturating_sub(row_height) {
            self.apply_scroll(need);
        }
    }

    // ---- sorting ----

    /// A click on the sort indicator for (`column`, `direction`). Clicking
    /// the active pair clears sorting; anything else activates it.
    pub fn handle_sort_click(
        &mut self,
        column: usize,
        direction: SortDirection,
    ) -> Vec<GridEvent> {
        let Some(col) = self.options.columns.get(column) else {
            return Vec::new();
        };
        if !col.sorter.is_sortable() || !col.offers(direction) {
            return Vec::new();
        }

        if self.state.sort == Some((column, direction)) {
            self.state.sort = None;
        } else {
            self.state.sort = Some((column, direction));
        }

        if self.options.delegate_sort {
            return vec![GridEvent::SortRequest {
                column: self.state.sort.map(|(c, _)| c),
                direction: self.state.sort.map(|(_, d)| d),
            }];
        }
        self.state.data = self.build_state_data(&self.canonical);
        self.full_render();
        Vec::new()
    }

    /// A click on a sortable header cell cycles ascending, descending, none,
    /// restricted to the directions the column offers.
    pub fn handle_header_click(&mut self, column: usize) -> Vec<GridEvent> {
        let Some(col) = self.options.columns.get(column) else {
            return Vec::new();
        };
        if !col.sorter.is_sortable() {
            return Vec::new();
        }
        let has_up = col.offers(SortDirection::Ascend);
        let has_down = col.offers(SortDirection::Descend);
        let current = match self.state.sort {
            Some((c, d)) if c == column => Some(d),
            _ => None,
        };
        let next = match current {
            None => {
                if has_up {
                    SortDirection::Ascend
                } else {
                    SortDirection::Descend
                }
            }
            Some(SortDirection::Ascend) => {
                if has_down {
                    SortDirection::Descend
                } else {
                    // Re-clicking the only offered direction clears it.
                    SortDirection::Ascend
                }
            }
            Some(SortDirection::Descend) => SortDirection::Descend,
        };
        self.handle_sort_click(column, next)
    }

    /// Turn this grid's sort indicator off without resorting. The owner uses
    /// this on the sub-grid that did not originate a sort.
    pub fn clear_sort_indicator(&mut self) {
        self.state.sort = None;
    }

    /// Replace the state data wholesale (sorted here unless sorting is
    /// delegated) and re-render.
    pub fn update_state_data(&mut self, data: Vec<SharedRow>) {
        self.state.data = if self.options.delegate_sort {
            data
        } else {
            let mut copy = data;
            sort_rows(&mut copy, &self.options.columns, self.state.sort);
            copy
        };
        self.full_render();
    }

    // ---- activation / locking ----

    fn presentation_row_id(&self, row: usize) -> Option<(String, usize)> {
        let absolute = self.surface.offset_rows + row;
        let data_row = self.state.data.get(absolute)?;
        let id = row_id(&data_row.borrow(), &self.options.identity, Some(absolute));
        Some((id, absolute))
    }

    /// A click on presentation row `row`, cell `col`.
    pub fn handle_click(&mut self, row: usize, col: usize) -> Vec<GridEvent> {
        let Some((id, _)) = self.presentation_row_id(row) else {
            return Vec::new();
        };
        let is_active = self.state.active_row.as_deref() == Some(id.as_str());

        let mut events = Vec::new();
        if is_active && self.options.cancel_active_row {
            events.push(GridEvent::Click {
                row_id: None,
                col: None,
            });
        } else {
            events.push(GridEvent::Click {
                row_id: Some(id.clone()),
                col: Some(col),
            });
        }

        if is_active && !self.options.cancel_active_row {
            return events;
        }
        if !self.options.click_means_active {
            return events;
        }
        events.extend(self.apply_click(Some(&id), Some(col)));
        events
    }

    /// Activation state transition, also used to replay a sibling's click.
    /// `col` of `None` marks a programmatic call, which scrolls the row into
    /// view. Clicking the active or locked row, or passing `None`, clears
    /// activation. Any held lock is cancelled afterwards.
    pub fn apply_click(&mut self, id: Option<&str>, col: Option<usize>) -> Vec<GridEvent> {
        let same = id.is_some() && self.state.active_row.as_deref() == id;
        let locked = id.is_some() && self.state.locked_row.as_deref() == id;
        if same || locked || id.is_none() {
            self.state.active_row = None;
        } else if let Some(id) = id {
            self.state.active_row = Some(id.to_string());
            if col.is_none() {
                if let Some((_, index)) = find_by_id(&self.state.data, &self.options.identity, id) {
                    self.scroll_row_into_view(index);
                }
            }
        }

        if self.state.locked_row.is_some() {
            self.apply_lock(None);
            return vec![GridEvent::DblClick {
                row_id: None,
                col: None,
            }];
        }
        Vec::new()
    }

    /// A double-click on presentation row `row`, cell `col`.
    pub fn handle_dbl_click(&mut self, row: usize, col: usize) -> Vec<GridEvent> {
        let Some((id, _)) = self.presentation_row_id(row) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if self.state.locked_row.as_deref() != Some(id.as_str()) {
            events.push(GridEvent::DblClick {
                row_id: Some(id.clone()),
                col: Some(col),
            });
        }
        if self.options.dbl_click_means_lock {
            self.apply_lock(Some(&id));
        }
        events
    }

    /// Lock state transition. Locking physically relocates the row to
    /// position 0 of the state data; unlocking never restores the previous
    /// position. Locking a row that is active drops its activation.
    pub fn apply_lock(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            self.state.locked_row = None;
            return;
        };
        if self.state.locked_row.as_deref() == Some(id) {
            self.state.locked_row = None;
            return;
        }
        let id = id.to_string();
        if self.state.active_row.as_deref() == Some(id.as_str()) {
            self.state.active_row = None;
        }
        self.state.locked_row = Some(id.clone());
        if let Some((row, index)) = find_by_id(&self.state.data, &self.options.identity, &id) {
            self.state.data.remove(index);
            self.state.data.insert(0, row);
        }
        if self.options.virtual_render {
            self.apply_scroll(0);
            self.virtual_render();
        } else {
            self.rebuild_surface_in_place();
            self.state.scroll_top = 0;
        }
    }

    /// Rebuild the surface from the current state data without touching the
    /// scroll bookkeeping (used by position-changing ops mid-interaction).
    fn rebuild_surface_in_place(&mut self) {
        self.surface.clear();
        self.state.window = None;
        for i in 0..self.state.data.len() {
            if let Some(row) = self.materialize_row(i) {
                self.surface.push(row);
            }
        }
    }

    /// Set or clear the active row by identity (programmatic path: scrolls
    /// the row into view when off-screen).
    pub fn set_active_row(&mut self, id: Option<&str>) {
        self.apply_click(id, None);
    }

    /// Set or clear the locked row by identity.
    pub fn set_locked_row(&mut self, id: Option<&str>) {
        self.apply_lock(id);
    }

    // ---- hover ----

    pub fn handle_hover(&mut self, row: usize, col: usize) -> Vec<GridEvent> {
        self.apply_hover(Some((row, col)));
        vec![GridEvent::Hover {
            row: Some(row),
            col: Some(col),
        }]
    }

    pub fn handle_body_leave(&mut self) -> Vec<GridEvent> {
        self.apply_hover(None);
        vec![GridEvent::Hover {
            row: None,
            col: None,
        }]
    }

    pub fn handle_enter(&mut self) -> Vec<GridEvent> {
        vec![GridEvent::Enter]
    }

    /// Hover state transition; re-hovering the same row is a no-op.
    pub fn apply_hover(&mut self, hover: Option<(usize, usize)>) {
        if let (Some((last_row, _)), Some((row, _))) = (self.state.hover, hover) {
            if last_row == row {
                return;
            }
        }
        self.state.hover = hover;
    }

    // ---- data mutation ----

    /// Patch one row's fields by identity. Only fields the canonical row
    /// already has are copied; on-screen cells are re-rendered and replaced
    /// only when the text actually changed. Unknown identity: logged, no-op.
    pub fn update_row(&mut self, patch: &Row) {
        let id = row_id(patch, &self.options.identity, None);
        let Some((canonical_row, _)) = find_by_id(&self.canonical, &self.options.identity, &id)
        else {
            log::warn!("{}: update for unknown row id {:?}", self.options.name, id);
            return;
        };
        let Some((_, state_index)) = find_by_id(&self.state.data, &self.options.identity, &id)
        else {
            log::warn!("{}: row id {:?} missing from state data", self.options.name, id);
            return;
        };

        // Canonical and state data share row identity; one patch reaches both.
        let touched = canonical_row.borrow_mut().patch_existing(patch);
        let row = canonical_row.borrow();
        for field in &touched {
            let Some(col_index) = self.options.columns.iter().position(|c| &c.name == field)
            else {
                continue;
            };
            let col = &self.options.columns[col_index];
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            let text = col.render_cell(&value, state_index, col_index, &row);
            self.surface
                .update_cell(&id, col_index, text, self.options.flash_when_update);
        }
    }

    /// Replace the canonical collection wholesale.
    pub fn replace_rows(&mut self, data: Vec<SharedRow>) {
        self.canonical = data;
        let copy = shallow_copy(&self.canonical);
        self.update_state_data(copy);
    }

    /// Append rows to the end of both collections; materializes the new rows
    /// without a full rebuild (window recompute when virtualized).
    pub fn append_rows(&mut self, rows: Vec<SharedRow>) {
        for row in rows {
            self.canonical.push(row.clone());
            self.state.data.push(row);
            if !self.options.virtual_render {
                if let Some(surface_row) = self.materialize_row(self.state.data.len() - 1) {
                    self.surface.push(surface_row);
                }
            }
        }
        if self.options.virtual_render {
            self.virtual_render();
        }
    }

    /// Insert rows at position 0 of both collections. Position-dependent
    /// identifiers (sequence cells) and the locked-row invariant force a
    /// full render.
    pub fn prepend_rows(&mut self, rows: Vec<SharedRow>) {
        for (i, row) in rows.into_iter().enumerate() {
            self.canonical.insert(i, row.clone());
            self.state.data.insert(i, row);
        }
        self.full_render();
    }

    /// Delete rows by identity from both collections; clears active/locked
    /// markers held by deleted rows. Unknown ids are logged and skipped.
    pub fn delete_rows(&mut self, ids: &[String]) {
        for id in ids {
            if self.state.active_row.as_deref() == Some(id.as_str()) {
                self.state.active_row = None;
            }
            if self.state.locked_row.as_deref() == Some(id.as_str()) {
                self.state.locked_row = None;
            }
            match find_by_id(&self.canonical, &self.options.identity, id) {
                Some((_, index)) => {
                    self.canonical.remove(index);
                }
                None => {
                    log::warn!("{}: delete for unknown row id {:?}", self.options.name, id);
                    continue;
                }
            }
            if let Some((_, index)) = find_by_id(&self.state.data, &self.options.identity, id) {
                self.state.data.remove(index);
            }
        }
        self.full_render();
    }

    // ---- column resizing ----

    /// Pointer down on a resize handle. The last column never resizes.
    pub fn begin_resize(&mut self, column: usize, x: i32) -> bool {
        let resizable = self
            .options
            .columns
            .get(column)
            .map(|c| c.resizable)
            .unwrap_or(false);
        if !resizable || column + 1 >= self.options.columns.len() {
            return false;
        }
        self.state.resize = Some(ResizeSession { column, last_x: x });
        true
    }

    /// Pointer moved during a drag: clamp(previous width + delta) into
    /// [min_width, max_width]. Header and body read the same width table, so
    /// the mirrored structures stay identical by construction.
    pub fn resize_move(&mut self, x: i32) {
        let Some(session) = self.state.resize else {
            return;
        };
        let delta = x - session.last_x;
        let col = &self.options.columns[session.column];
        let current = self.state.col_widths[session.column] as i32;
        let mut width = current + delta;
        if let Some(min) = col.min_width {
            width = width.max(min as i32);
        }
        if let Some(max) = col.max_width {
            width = width.min(max as i32);
        }
        self.state.col_widths[session.column] = width.max(1) as u16;
        self.state.resize = Some(ResizeSession {
            column: session.column,
            last_x: x,
        });
    }

    /// Pointer up: release unconditionally, including synthetic ends after
    /// the pointer left the grid's bounds.
    pub fn end_resize(&mut self) {
        self.state.resize = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.state.resize.is_some()
    }

    /// Double-click on a resize handle: fit the column to its widest
    /// rendered value, clamped to [min_width, max_width]. With no data this
    /// is a silent no-op.
    pub fn auto_fit_column(&mut self, column: usize) {
        let Some(col) = self.options.columns.get(column) else {
            return;
        };
        if self.state.data.is_empty() {
            return;
        }
        let mut widest = 0u16;
        for (i, row) in self.state.data.iter().enumerate() {
            let row = row.borrow();
            let value = row.get(&col.name).cloned().unwrap_or(Value::Null);
            let text = col.render_cell(&value, i, column, &row);
            widest = widest.max(auto_fit_width(&text));
        }
        if widest == 0 {
            return;
        }
        let mut width = widest;
        if let Some(max) = col.max_width {
            width = width.min(max);
        }
        if let Some(min) = col.min_width {
            width = width.max(min);
        }
        self.state.col_widths[column] = width;
    }
}
