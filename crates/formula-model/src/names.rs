use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{CellReference, LabelError};

/// Label names must be strictly shorter than this many characters.
pub const LABEL_MAX_LEN: usize = 255;

/// A named label such as `Total` or `tax_rate`, usable wherever a cell reference is.
///
/// Rules:
/// - must not be empty and must be shorter than [`LABEL_MAX_LEN`]
/// - must start with an ASCII letter
/// - remaining characters may be ASCII letters, digits or `_`
/// - must not parse as a cell reference (`AB11` is a cell, `Total1` is not because `TOTAL`
///   is beyond the last column)
///
/// Equality, hashing and ordering are ASCII case-insensitive.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName {
    name: String,
}

impl LabelName {
    pub fn with(name: impl Into<String>) -> Result<Self, LabelError> {
        let name = name.into();
        validate_label_name(&name)?;
        Ok(Self { name })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.name.bytes().map(|b| b.to_ascii_lowercase())
    }
}

/// Validate label text without constructing a [`LabelName`].
pub fn validate_label_name(name: &str) -> Result<(), LabelError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(LabelError::Empty);
    };

    let len = name.chars().count();
    if len >= LABEL_MAX_LEN {
        return Err(LabelError::TooLong {
            len,
            max: LABEL_MAX_LEN - 1,
        });
    }

    if !first.is_ascii_alphabetic() {
        return Err(LabelError::InvalidStartCharacter(first));
    }
    for (index, ch) in name.chars().enumerate().skip(1) {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(LabelError::InvalidCharacter { ch, index });
        }
    }

    if CellReference::parse(name).is_ok() {
        return Err(LabelError::LooksLikeCellReference(name.to_string()));
    }
    Ok(())
}

impl PartialEq for LabelName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for LabelName {}

impl Hash for LabelName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for LabelName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LabelName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for LabelName {
    type Error = LabelError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        LabelName::with(name)
    }
}

impl From<LabelName> for String {
    fn from(label: LabelName) -> Self {
        label.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_names() {
        for name in ["A", "Total1", "tax_rate", "XFE1", "R1C1", "Q_1"] {
            assert!(LabelName::with(name).is_ok(), "{name} should be a valid label");
        }
    }

    #[test]
    fn rejects_cell_lookalikes() {
        assert_eq!(
            LabelName::with("AB11"),
            Err(LabelError::LooksLikeCellReference("AB11".to_string()))
        );
        assert!(LabelName::with("xfd1048576").is_err());
    }

    #[test]
    fn rejects_bad_characters() {
        assert_eq!(LabelName::with(""), Err(LabelError::Empty));
        assert_eq!(
            LabelName::with("1abc"),
            Err(LabelError::InvalidStartCharacter('1'))
        );
        assert_eq!(
            LabelName::with("_abc"),
            Err(LabelError::InvalidStartCharacter('_'))
        );
        assert_eq!(
            LabelName::with("ab.c"),
            Err(LabelError::InvalidCharacter { ch: '.', index: 2 })
        );
    }

    #[test]
    fn length_limit_is_exclusive() {
        let ok = format!("a{}", "b".repeat(253));
        assert_eq!(ok.len(), 254);
        assert!(LabelName::with(ok).is_ok());
        let too_long = format!("a{}", "b".repeat(254));
        assert_eq!(
            LabelName::with(too_long),
            Err(LabelError::TooLong { len: 255, max: 254 })
        );
    }

    #[test]
    fn equality_and_order_ignore_case() {
        let a = LabelName::with("Total").unwrap();
        let b = LabelName::with("TOTAL").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.as_str(), "Total");
        assert!(LabelName::with("apple").unwrap() < LabelName::with("Banana").unwrap());
    }

    #[test]
    fn serde_validates() {
        let label: LabelName = serde_json::from_str("\"Total\"").unwrap();
        assert_eq!(label.as_str(), "Total");
        assert!(serde_json::from_str::<LabelName>("\"A1\"").is_err());
    }
}
