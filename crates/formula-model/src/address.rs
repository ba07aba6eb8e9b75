use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{CellReference, ReferenceError};

/// A rectangular, inclusive region of cells.
///
/// The range is always normalized such that `begin` is the top-left corner and `end` the
/// bottom-right corner; each corner keeps the reference kinds of the component it was
/// taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeReference {
    begin: CellReference,
    end: CellReference,
}

impl RangeReference {
    /// Construct a new range, normalizing corners if needed.
    pub fn new(a: CellReference, b: CellReference) -> Self {
        Self {
            begin: a.lower(b),
            end: a.upper(b),
        }
    }

    #[inline]
    pub const fn begin(&self) -> CellReference {
        self.begin
    }

    #[inline]
    pub const fn end(&self) -> CellReference {
        self.end
    }

    /// Returns true if `cell` lies within this range.
    pub fn contains(&self, cell: CellReference) -> bool {
        let (col, row) = (cell.column().value(), cell.row().value());
        col >= self.begin.column().value()
            && col <= self.end.column().value()
            && row >= self.begin.row().value()
            && row <= self.end.row().value()
    }

    /// Number of columns in the range.
    pub fn width(&self) -> u32 {
        self.end.column().value() - self.begin.column().value() + 1
    }

    /// Number of rows in the range.
    pub fn height(&self) -> u32 {
        self.end.row().value() - self.begin.row().value() + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.begin.compare(&self.end).is_eq()
    }

    /// Shift both corners by the same deltas.
    pub fn add(&self, delta_column: i64, delta_row: i64) -> Result<Self, ReferenceError> {
        Ok(Self {
            begin: self.begin.add(delta_column, delta_row)?,
            end: self.end.add(delta_column, delta_row)?,
        })
    }

    /// Parse `A1:B2` or a single-cell reference like `C3`.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        match text.split_once(':') {
            None => {
                let cell = CellReference::parse(text)?;
                Ok(Self::new(cell, cell))
            }
            Some((a, b)) => {
                if a.is_empty() || b.is_empty() {
                    return Err(ReferenceError::InvalidRange(text.to_string()));
                }
                let begin = CellReference::parse(a)?;
                let end = CellReference::parse(b)?;
                Ok(Self::new(begin, end))
            }
        }
    }
}

impl fmt::Display for RangeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}
