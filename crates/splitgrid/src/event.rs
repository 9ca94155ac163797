//! Typed interaction events and the caller-facing callback surface.
//!
//! Sub-grids never call back into their owner; interaction handlers return
//! [`GridEvent`]s and the owner (the split-grid coordinator, or the embedding
//! app when a single grid is used directly) decides what to replay where.

use crate::sort::SortDirection;

/// Which sub-grid of a split grid an event originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Frozen,
    Scrollable,
}

/// An interaction observed by one grid, expressed in that grid's local
/// row/column indices.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    /// Vertical scroll offset changed.
    Scroll { top: u32 },
    /// The pointer entered this grid.
    Enter,
    /// A sort was requested. `None` direction means "clear sorting".
    /// Emitted instead of resorting when sorting is delegated.
    SortRequest {
        column: Option<usize>,
        direction: Option<SortDirection>,
    },
    /// Hover moved to a cell, or left the body entirely (`None`).
    Hover {
        row: Option<usize>,
        col: Option<usize>,
    },
    /// A cell was clicked. `row_id` is `None` when the click repeats the
    /// active row and re-clicking is configured to report a clear.
    Click {
        row_id: Option<String>,
        col: Option<usize>,
    },
    /// A cell was double-clicked.
    DblClick {
        row_id: Option<String>,
        col: Option<usize>,
    },
}

/// Optional caller-supplied observers. Column indices reported here are
/// always global (frozen columns first).
#[derive(Default)]
pub struct GridCallbacks {
    pub on_scroll: Option<Box<dyn FnMut(u32)>>,
    pub on_enter: Option<Box<dyn FnMut(Side)>>,
    /// When supplied, the grid defers all resorting to the caller, who must
    /// push the resulting order back via `update_state_data`.
    pub on_sort: Option<Box<dyn FnMut(Option<usize>, Option<SortDirection>)>>,
    pub on_hover: Option<Box<dyn FnMut(Option<usize>, Option<usize>)>>,
    pub on_click: Option<Box<dyn FnMut(Option<&str>, Option<usize>)>>,
    pub on_dbl_click: Option<Box<dyn FnMut(Option<&str>, Option<usize>)>>,
}

impl std::fmt::Debug for GridCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridCallbacks")
            .field("on_scroll", &self.on_scroll.is_some())
            .field("on_enter", &self.on_enter.is_some())
            .field("on_sort", &self.on_sort.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("on_dbl_click", &self.on_dbl_click.is_some())
            .finish()
    }
}
