//! Configuration errors.
//!
//! All construction-time validation failures are fatal: the grid refuses to
//! build and the error names the violated constraint. Runtime lookup misses
//! are not errors; they are logged and the operation is a no-op.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("column list must not be empty")]
    EmptyColumns,

    #[error("column {column:?} has no width; frozen modes require an absolute width per column")]
    MissingWidth { column: String },

    #[error("column {column:?} uses a percentage width; frozen modes require absolute widths")]
    PercentWidthInFrozenMode { column: String },

    #[error("frozen-column mode requires at least one frozen column")]
    NoFrozenColumns,

    #[error("sequence column {column:?} must be frozen when frozen columns are used")]
    SequenceNotFrozen { column: String },

    #[error("columns {first:?} and {second:?} both declare a default sort order; at most one may")]
    MultipleDefaultSort { first: String, second: String },
}
