//! Column descriptors and normalization.
//!
//! Columns are immutable after normalization: every column ends up with a
//! renderer (sequence columns count rows, others stringify), and the single
//! column allowed to declare a default sort order is recorded as the initial
//! sort. Splitting partitions columns into the frozen and scrollable subsets
//! by the `is_frozen` flag, preserving relative order.

use crate::error::ConfigError;
use crate::row::Row;
use crate::sort::{SortDirection, SortRule};
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

/// Renders one cell: (value, row index, column index, row) -> display string.
pub type CellRenderer = Rc<dyn Fn(&Value, usize, usize, &Row) -> String>;

/// Column width, absolute terminal cells or a percentage of the grid width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Width {
    Cells(u16),
    Percent(f32),
}

#[derive(Clone)]
pub struct Column {
    pub title: String,
    /// Field name this column reads from each row.
    pub name: String,
    pub is_frozen: bool,
    pub resizable: bool,
    pub is_sequence: bool,
    pub sorter: SortRule,
    /// Directions offered by the sort indicator. Both by default.
    pub sort_directions: Vec<SortDirection>,
    pub default_sort_order: Option<SortDirection>,
    pub width: Option<Width>,
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    pub class_name: Option<String>,
    pub render: Option<CellRenderer>,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("name", &self.name)
            .field("is_frozen", &self.is_frozen)
            .field("resizable", &self.resizable)
            .field("is_sequence", &self.is_sequence)
            .field("sorter", &self.sorter)
            .field("sort_directions", &self.sort_directions)
            .field("default_sort_order", &self.default_sort_order)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("render", &self.render.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Column {
    pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            is_frozen: false,
            resizable: false,
            is_sequence: false,
            sorter: SortRule::None,
            sort_directions: vec![SortDirection::Ascend, SortDirection::Descend],
            default_sort_order: None,
            width: None,
            min_width: None,
            max_width: None,
            class_name: None,
            render: None,
        }
    }

    pub fn frozen(mut self) -> Self {
        self.is_frozen = true;
        self
    }

    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    pub fn sequence(mut self) -> Self {
        self.is_sequence = true;
        self
    }

    /// Sort with the default numeric comparator.
    pub fn sortable(mut self) -> Self {
        self.sorter = SortRule::Default;
        self
    }

    pub fn custom_sorter(mut self, cmp: Rc<dyn Fn(&Value, &Value) -> Ordering>) -> Self {
        self.sorter = SortRule::Custom(cmp);
        self
    }

    pub fn sort_directions(mut self, directions: Vec<SortDirection>) -> Self {
        self.sort_directions = directions;
        self
    }

    pub fn default_sort(mut self, direction: SortDirection) -> Self {
        self.default_sort_order = Some(direction);
        self
    }

    pub fn width(mut self, cells: u16) -> Self {
        self.width = Some(Width::Cells(cells));
        self
    }

    pub fn width_percent(mut self, percent: f32) -> Self {
        self.width = Some(Width::Percent(percent));
        self
    }

    pub fn min_width(mut self, cells: u16) -> Self {
        self.min_width = Some(cells);
        self
    }

    pub fn max_width(mut self, cells: u16) -> Self {
        self.max_width = Some(cells);
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn renderer(mut self, render: CellRenderer) -> Self {
        self.render = Some(render);
        self
    }

    pub fn offers(&self, direction: SortDirection) -> bool {
        self.sort_directions.contains(&direction)
    }

    /// Resolve this column's width against the grid width, percentages
    /// rounded down. Columns without a width get `fallback`.
    pub fn resolve_width(&self, total: u16, fallback: u16) -> u16 {
        match self.width {
            Some(Width::Cells(w)) => w,
            Some(Width::Percent(p)) => ((p / 100.0) * total as f32).floor() as u16,
            None => fallback,
        }
    }

    /// Render one cell through this column's renderer. Normalization
    /// guarantees the renderer is present.
    pub fn render_cell(&self, value: &Value, row_index: usize, col_index: usize, row: &Row) -> String {
        match &self.render {
            Some(render) => render(value, row_index, col_index, row),
            None => value.display(),
        }
    }
}

/// Stringify-or-passthrough renderer assigned to ordinary columns.
pub fn default_renderer() -> CellRenderer {
    Rc::new(|value: &Value, _row: usize, _col: usize, _data: &Row| value.display())
}

/// Row-number renderer assigned to sequence columns (1-based).
pub fn sequence_renderer() -> CellRenderer {
    Rc::new(|_value: &Value, row: usize, _col: usize, _data: &Row| (row + 1).to_string())
}

/// Assign missing renderers and locate the default sort column. More than one
/// default sort declaration is a configuration error.
pub fn normalize(columns: &mut [Column]) -> Result<Option<(usize, SortDirection)>, ConfigError> {
    let mut initial: Option<(usize, SortDirection)> = None;
    for (i, column) in columns.iter_mut().enumerate() {
        if column.render.is_none() {
            column.render = Some(if column.is_sequence {
                sequence_renderer()
            } else {
                default_renderer()
            });
        }
        if column.sorter.is_sortable() {
            if let Some(direction) = column.default_sort_order {
                match initial {
                    None => initial = Some((i, direction)),
                    Some((first, _)) => {
                        return Err(ConfigError::MultipleDefaultSort {
                            first: columns[first].name.clone(),
                            second: columns[i].name.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(initial)
}

/// Partition into (frozen, scrollable), preserving relative order.
pub fn split(columns: &[Column]) -> (Vec<Column>, Vec<Column>) {
    let mut frozen = Vec::new();
    let mut scrollable = Vec::new();
    for column in columns {
        if column.is_frozen {
            frozen.push(column.clone());
        } else {
            scrollable.push(column.clone());
        }
    }
    (frozen, scrollable)
}

/// Map a sub-grid-local column index to the global index. Frozen-side indices
/// map 1:1; scrollable-side indices are shifted by the frozen column count.
pub fn global_index(frozen_count: usize, is_frozen_side: bool, local: usize) -> usize {
    if is_frozen_side { local } else { frozen_count + local }
}
