//! `formula-model` defines the value types that identify spreadsheet locations referenced
//! from formulas: columns, rows, cells, ranges and labels.
//!
//! All types validate on construction (Excel bounds, label syntax) and are immutable;
//! "setters" return a new value. Columns and rows are stored **0-indexed** and rendered in
//! A1 notation (`A`, `1`), with a `$` prefix for [`ReferenceKind::Absolute`] components.

mod address;
mod cell;
mod column;
mod error;
mod kind;
mod names;
mod reference;
mod row;

pub use address::RangeReference;
pub use cell::{CellReference, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
pub use column::ColumnReference;
pub use error::{LabelError, ReferenceError};
pub use kind::ReferenceKind;
pub use names::{validate_label_name, LabelName, LABEL_MAX_LEN};
pub use reference::{ExpressionReference, LABEL_COMPARED_WITH_CELL_RESULT};
pub use row::RowReference;
