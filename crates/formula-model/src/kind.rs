use serde::{Deserialize, Serialize};

/// Whether a column or row address is fixed (`$A`) or shifts under copy/insert (`A`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Absolute,
    Relative,
}

impl ReferenceKind {
    /// Text written before the column letters or row digits.
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            ReferenceKind::Absolute => "$",
            ReferenceKind::Relative => "",
        }
    }

    #[inline]
    pub const fn is_absolute(self) -> bool {
        matches!(self, ReferenceKind::Absolute)
    }

    /// Split an optional leading `$` marker from `text`.
    pub fn split_prefix(text: &str) -> (Self, &str) {
        match text.strip_prefix('$') {
            Some(rest) => (ReferenceKind::Absolute, rest),
            None => (ReferenceKind::Relative, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_split_roundtrip() {
        assert_eq!(ReferenceKind::split_prefix("$A"), (ReferenceKind::Absolute, "A"));
        assert_eq!(ReferenceKind::split_prefix("12"), (ReferenceKind::Relative, "12"));
        assert_eq!(ReferenceKind::Absolute.prefix(), "$");
        assert_eq!(ReferenceKind::Relative.prefix(), "");
    }
}
