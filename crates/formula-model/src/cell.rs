use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{ColumnReference, ReferenceError, ReferenceKind, RowReference};

/// Excel-compatible maximum rows per worksheet (1,048,576).
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;

/// Excel-compatible maximum columns per worksheet (16,384).
pub const EXCEL_MAX_COLS: u32 = 16_384;

/// A reference to a single cell, e.g. `B7` or `$A$1`.
///
/// Both components carry their own [`ReferenceKind`], so mixed references such as `$A1`
/// round-trip through [`CellReference::parse`] and [`fmt::Display`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellReference {
    column: ColumnReference,
    row: RowReference,
}

impl CellReference {
    #[inline]
    pub const fn with(column: ColumnReference, row: RowReference) -> Self {
        Self { column, row }
    }

    #[inline]
    pub const fn column(self) -> ColumnReference {
        self.column
    }

    #[inline]
    pub const fn row(self) -> RowReference {
        self.row
    }

    pub fn set_column(self, column: ColumnReference) -> Self {
        if column == self.column {
            return self;
        }
        Self { column, ..self }
    }

    pub fn set_row(self, row: RowReference) -> Self {
        if row == self.row {
            return self;
        }
        Self { row, ..self }
    }

    /// Shift both axes at once; fails if either lands outside Excel bounds.
    pub fn add(self, delta_column: i64, delta_row: i64) -> Result<Self, ReferenceError> {
        Ok(self
            .set_column(self.column.add(delta_column)?)
            .set_row(self.row.add(delta_row)?))
    }

    /// Component-wise minimum, used to normalize the top-left corner of a range.
    pub fn lower(self, other: Self) -> Self {
        let column = if self.column.compare(&other.column) == Ordering::Greater {
            other.column
        } else {
            self.column
        };
        let row = if self.row.compare(&other.row) == Ordering::Greater {
            other.row
        } else {
            self.row
        };
        self.set_column(column).set_row(row)
    }

    /// Component-wise maximum, used to normalize the bottom-right corner of a range.
    pub fn upper(self, other: Self) -> Self {
        let column = if self.column.compare(&other.column) == Ordering::Less {
            other.column
        } else {
            self.column
        };
        let row = if self.row.compare(&other.row) == Ordering::Less {
            other.row
        } else {
            self.row
        };
        self.set_column(column).set_row(row)
    }

    /// Orders cells by column, then row. Reference kinds are ignored.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.column
            .compare(&other.column)
            .then_with(|| self.row.compare(&other.row))
    }

    pub fn to_absolute(self) -> Self {
        self.set_column(self.column.set_kind(ReferenceKind::Absolute))
            .set_row(self.row.set_kind(ReferenceKind::Absolute))
    }

    pub fn to_relative(self) -> Self {
        self.set_column(self.column.set_kind(ReferenceKind::Relative))
            .set_row(self.row.set_kind(ReferenceKind::Relative))
    }

    /// Parse A1 text such as `A1`, `$B$2` or `xfd1048576`.
    ///
    /// The input must be a maximal run of column letters immediately followed by a maximal
    /// run of row digits, each optionally prefixed by `$`.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        let split = split_column_row(text)
            .ok_or_else(|| ReferenceError::InvalidCell(text.to_string()))?;
        let column = ColumnReference::parse(&text[..split])?;
        let row = RowReference::parse(&text[split..])?;
        Ok(Self::with(column, row))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Byte offset where the row part of `text` begins, if `text` has the shape
/// `[$]letters[$]digits`.
fn split_column_row(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut idx = 0usize;
    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }
    let letters_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
        idx += 1;
    }
    if idx == letters_start {
        return None;
    }

    let split = idx;
    if bytes.get(idx) == Some(&b'$') {
        idx += 1;
    }
    let digits_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == digits_start || idx != bytes.len() {
        return None;
    }
    Some(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: u32, row: u32) -> CellReference {
        CellReference::with(
            ColumnReference::with(col, ReferenceKind::Relative).unwrap(),
            RowReference::with(row, ReferenceKind::Relative).unwrap(),
        )
    }

    #[test]
    fn a1_roundtrip() {
        let c = cell(0, 0);
        assert_eq!(c.to_string(), "A1");
        assert_eq!(CellReference::parse("A1").unwrap(), c);
        assert_eq!(CellReference::parse("$A$1").unwrap(), c.to_absolute());
        assert_eq!(CellReference::parse("$A$1").unwrap().to_string(), "$A$1");

        let c2 = cell(54, 31);
        assert_eq!(c2.to_string(), "BC32");
        assert_eq!(CellReference::parse("bc32").unwrap(), c2);
    }

    #[test]
    fn mixed_kinds_roundtrip() {
        let c = CellReference::parse("$C7").unwrap();
        assert_eq!(c.column().kind(), ReferenceKind::Absolute);
        assert_eq!(c.row().kind(), ReferenceKind::Relative);
        assert_eq!(c.to_string(), "$C7");
    }

    #[test]
    fn bounds_are_excel_compatible() {
        assert!(CellReference::parse("XFD1048576").is_ok());
        assert!(CellReference::parse("XFE1").is_err());
        assert!(CellReference::parse("A1048577").is_err());
        assert!(CellReference::parse("A0").is_err());
    }

    #[test]
    fn rejects_other_shapes() {
        for text in ["", "A", "1", "1A", "A1B", "A$", "$$A1", "A 1", "A1:B2"] {
            assert!(CellReference::parse(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn add_composes_both_axes() {
        let moved = cell(1, 1).add(2, -1).unwrap();
        assert_eq!(moved, cell(3, 0));
        assert!(cell(0, 0).add(0, -1).is_err());
        assert!(cell(0, 0).add(-1, 0).is_err());
        assert!(cell(3, 3).add(i64::MAX, 0).is_err());
        assert!(cell(3, 3).add(0, i64::MIN).is_err());
    }

    #[test]
    fn lower_and_upper_are_component_wise() {
        let a = cell(5, 1);
        let b = cell(2, 9);
        assert_eq!(a.lower(b), cell(2, 1));
        assert_eq!(a.upper(b), cell(5, 9));
        assert_eq!(a.lower(a), a);
    }

    #[test]
    fn compare_orders_by_column_then_row() {
        assert_eq!(cell(0, 0).compare(&cell(0, 1)), Ordering::Less);
        assert_eq!(cell(1, 0).compare(&cell(0, 9)), Ordering::Greater);
        assert_eq!(cell(3, 3).compare(&cell(3, 3).to_absolute()), Ordering::Equal);
    }
}
