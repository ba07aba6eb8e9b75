use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{ReferenceError, ReferenceKind, EXCEL_MAX_ROWS};

/// A 0-indexed row address; `value = 0` renders as row `1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RowRepr")]
pub struct RowReference {
    value: u32,
    kind: ReferenceKind,
}

#[derive(Deserialize)]
struct RowRepr {
    value: u32,
    kind: ReferenceKind,
}

impl TryFrom<RowRepr> for RowReference {
    type Error = ReferenceError;

    fn try_from(repr: RowRepr) -> Result<Self, Self::Error> {
        RowReference::with(repr.value, repr.kind)
    }
}

impl RowReference {
    /// Exclusive upper bound for [`RowReference::value`].
    pub const MAX: u32 = EXCEL_MAX_ROWS;

    pub fn with(value: u32, kind: ReferenceKind) -> Result<Self, ReferenceError> {
        if value >= Self::MAX {
            return Err(ReferenceError::RowOutOfRange {
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

    pub fn add(self, delta: i64) -> Result<Self, ReferenceError> {
        if delta == 0 {
            return Ok(self);
        }
        let value = i64::from(self.value).saturating_add(delta);
        if !(0..i64::from(Self::MAX)).contains(&value) {
            return Err(ReferenceError::RowOutOfRange {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self {
            value: value as u32,
            kind: self.kind,
        })
    }

    /// Orders rows by value; the reference kind is ignored.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }

    /// Parse 1-based row text such as `1` or `$12`.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        let (kind, digits) = ReferenceKind::split_prefix(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReferenceError::InvalidRow(text.to_string()));
        }
        let one_based: u64 = digits.parse().map_err(|_| ReferenceError::RowOutOfRange {
            value: i64::MAX,
            max: Self::MAX,
        })?;
        if one_based == 0 {
            // Row numbers in A1 text start at 1.
            return Err(ReferenceError::InvalidRow(text.to_string()));
        }
        if one_based > u64::from(Self::MAX) {
            return Err(ReferenceError::RowOutOfRange {
                value: i64::try_from(one_based - 1).unwrap_or(i64::MAX),
                max: Self::MAX,
            });
        }
        Self::with((one_based - 1) as u32, kind)
    }
}

impl fmt::Display for RowReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), u64::from(self.value) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_row_renders_one_based() {
        let row = RowReference::with(1_048_575, ReferenceKind::Relative).unwrap();
        assert_eq!(row.to_string(), "1048576");
        assert!(RowReference::with(1_048_576, ReferenceKind::Relative).is_err());
    }

    #[test]
    fn parse_rejects_zero_and_overflow() {
        assert!(RowReference::parse("0").is_err());
        assert!(RowReference::parse("1048577").is_err());
        assert!(RowReference::parse("99999999999999999999999").is_err());
        assert!(RowReference::parse("1a").is_err());
        assert_eq!(
            RowReference::parse("$12").unwrap(),
            RowReference::with(11, ReferenceKind::Absolute).unwrap()
        );
    }

    #[test]
    fn add_keeps_kind_and_checks_bounds() {
        let row = RowReference::with(4, ReferenceKind::Absolute).unwrap();
        let moved = row.add(-4).unwrap();
        assert_eq!(moved.value(), 0);
        assert_eq!(moved.kind(), ReferenceKind::Absolute);
        assert!(row.add(-5).is_err());
        assert_eq!(
            row.add(i64::MAX),
            Err(ReferenceError::RowOutOfRange {
                value: i64::MAX,
                max: RowReference::MAX,
            })
        );
        assert!(row.add(i64::MIN).is_err());
    }

    #[test]
    fn set_value_is_identity_when_unchanged() {
        let row = RowReference::with(4, ReferenceKind::Relative).unwrap();
        assert_eq!(row.set_value(4).unwrap(), row);
        assert_eq!(row.set_value(7).unwrap().value(), 7);
        assert!(row.set_value(RowReference::MAX).is_err());
    }
}
