//! `splitgrid` is a terminal data grid with frozen columns, built for large
//! datasets.
//!
//! The grid is split into two synchronized sections: frozen columns pinned at
//! the left edge and the remaining columns scrolling horizontally beside
//! them. Both present the same shared rows in the same order, so sorting,
//! activation, locking and incremental updates stay consistent across the
//! split.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - Headless state core: interaction handlers return typed
//!   [`event::GridEvent`]s; drawing is a separate, pure pass over a
//!   materialized [`surface::Surface`].
//! - Large datasets: opt-in virtual rendering materializes only the visible
//!   window of rows, with threshold-gated recomputes while scrolling.
//!
//! Useful entry points:
//! - [`SplitGrid`]: the frozen-column grid (two synchronized sections).
//! - [`SingleGrid`]: one section on its own; also usable as a plain grid
//!   with a fixed header.
//! - [`render::render_grid`] / [`SplitGrid::render`]: buffer drawing.
//!
//! ## Rows and identity
//!
//! Rows are `Rc<RefCell<Row>>` handles ([`row::SharedRow`]); every collection
//! copy is shallow, so a field patched through one view is visible through
//! all of them. Rows are addressed by a derived identity string
//! ([`identity::IdentitySource`]): a named field, a custom function, or the
//! concatenation of all field values.

pub mod column;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod grid;
pub mod identity;
pub mod render;
pub mod row;
pub mod sort;
pub mod surface;
pub mod value;
pub mod width;

pub use column::{CellRenderer, Column, Width};
pub use coordinator::{SplitGrid, SplitGridOptions};
pub use error::ConfigError;
pub use event::{GridCallbacks, GridEvent, Side};
pub use grid::{GridOptions, SingleGrid};
pub use identity::IdentitySource;
pub use render::GridStyles;
pub use row::{Row, SharedRow, shared};
pub use sort::{SortDirection, SortRule};
pub use value::Value;
