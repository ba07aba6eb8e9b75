use serde::{Deserialize, Serialize};

/// Excel's limit on formula text length, in characters.
pub const EXCEL_MAX_FORMULA_CHARS: usize = 8_192;

/// Excel allows 64 levels of nested functions.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Inputs longer than this are rejected before matching.
    pub max_formula_chars: usize,
    /// Deepest allowed nesting of groups, function calls and negatives.
    pub max_nesting_depth: usize,
    /// When `true`, [`crate::FormulaParser::parse_formula`] accepts a leading `=`.
    pub allow_leading_equals: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_formula_chars: EXCEL_MAX_FORMULA_CHARS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            allow_leading_equals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"max_nesting_depth": 8}"#).unwrap();
        assert_eq!(
            options,
            ParseOptions {
                max_nesting_depth: 8,
                ..ParseOptions::default()
            }
        );
    }
}
