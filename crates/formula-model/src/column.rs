use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{ReferenceError, ReferenceKind, EXCEL_MAX_COLS};

/// A 0-indexed column address.
///
/// `value = 0` is column `A`, `value = 16_383` is column `XFD`. Equality includes the
/// [`ReferenceKind`], ordering (see [`ColumnReference::compare`]) does not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColumnRepr")]
pub struct ColumnReference {
    value: u32,
    kind: ReferenceKind,
}

#[derive(Deserialize)]
struct ColumnRepr {
    value: u32,
    kind: ReferenceKind,
}

impl TryFrom<ColumnRepr> for ColumnReference {
    type Error = ReferenceError;

    fn try_from(repr: ColumnRepr) -> Result<Self, Self::Error> {
        ColumnReference::with(repr.value, repr.kind)
    }
}

impl ColumnReference {
    /// Exclusive upper bound for [`ColumnReference::value`].
    pub const MAX: u32 = EXCEL_MAX_COLS;

    /// Construct a column reference, rejecting values outside `0..16384`.
    pub fn with(value: u32, kind: ReferenceKind) -> Result<Self, ReferenceError> {
        if value >= Self::MAX {
            return Err(ReferenceError::ColumnOutOfRange {
                value: i64::from(value),
                max: Self::MAX,
            });
        }
        Ok(Self { value, kind })
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.value
    }

    #[inline]
    pub const fn kind(self) -> ReferenceKind {
        self.kind
    }

    pub fn set_value(self, value: u32) -> Result<Self, ReferenceError> {
        if value == self.value {
            return Ok(self);
        }
        Self::with(value, self.kind)
    }

    pub fn set_kind(self, kind: ReferenceKind) -> Self {
        Self { kind, ..self }
    }

    /// Shift the column by `delta`, keeping its kind. Used when columns are inserted or
    /// deleted and when formulas are copied with relative adjustment.
    pub fn add(self, delta: i64) -> Result<Self, ReferenceError> {
        if delta == 0 {
            return Ok(self);
        }
        let value = i64::from(self.value).saturating_add(delta);
        if !(0..i64::from(Self::MAX)).contains(&value) {
            return Err(ReferenceError::ColumnOutOfRange {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self {
            value: value as u32,
            kind: self.kind,
        })
    }

    /// Orders columns by value; the reference kind is ignored.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }

    /// Parse column text such as `A`, `xfd` or `$AB`.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        let (kind, letters) = ReferenceKind::split_prefix(text);
        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ReferenceError::InvalidColumn(text.to_string()));
        }
        let one_based = decode_column_letters(letters).ok_or(ReferenceError::ColumnOutOfRange {
            value: i64::MAX,
            max: Self::MAX,
        })?;
        if one_based > u64::from(Self::MAX) {
            return Err(ReferenceError::ColumnOutOfRange {
                value: i64::try_from(one_based - 1).unwrap_or(i64::MAX),
                max: Self::MAX,
            });
        }
        Self::with((one_based - 1) as u32, kind)
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.prefix())?;
        f.write_str(&column_letters(self.value))
    }
}

/// Render a 0-indexed column as base-26 letters (`0` → `A`, `26` → `AA`).
pub(crate) fn column_letters(value: u32) -> String {
    let mut n = u64::from(value) + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Decode ASCII letters into a 1-based column number (`A` → 1). Returns `None` on overflow.
pub(crate) fn decode_column_letters(letters: &str) -> Option<u64> {
    letters.bytes().try_fold(0u64, |acc, b| {
        let digit = u64::from(b.to_ascii_uppercase() - b'A') + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}
