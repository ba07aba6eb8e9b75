use serde::{Deserialize, Serialize};

use crate::token::NumberValue;

/// Recognises a numeric literal at the start of `input`.
///
/// Returns the value and the number of bytes consumed, or `None` when `input` does not
/// start with a number. Spreadsheets disagree on number syntax (decimal separator,
/// grouping), so the parser takes this as a parameter.
pub trait NumberParser {
    fn parse_number(&self, input: &str) -> Option<(NumberValue, usize)>;
}

impl<F> NumberParser for F
where
    F: Fn(&str) -> Option<(NumberValue, usize)>,
{
    fn parse_number(&self, input: &str) -> Option<(NumberValue, usize)> {
        self(input)
    }
}

/// Plain decimal literals: `12`, `1.5`, `.5`, `3e-2`, `1.2E+10`.
///
/// Literals without a fraction or exponent that fit in an `i64` become
/// [`NumberValue::Integer`]; everything else is a [`NumberValue::Decimal`]. Signs are not
/// part of the literal; they are operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalNumberParser {
    pub decimal_separator: char,
}

impl Default for DecimalNumberParser {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
        }
    }
}

impl DecimalNumberParser {
    pub fn with_decimal_separator(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }
}

fn digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

impl NumberParser for DecimalNumberParser {
    fn parse_number(&self, input: &str) -> Option<(NumberValue, usize)> {
        let bytes = input.as_bytes();
        let integer_digits = digits(bytes, 0);
        let mut end = integer_digits;

        let mut fraction_digits = 0;
        if input[end..].starts_with(self.decimal_separator) {
            let after = end + self.decimal_separator.len_utf8();
            fraction_digits = digits(bytes, after);
            if integer_digits > 0 || fraction_digits > 0 {
                end = after + fraction_digits;
            }
        }
        if integer_digits == 0 && fraction_digits == 0 {
            return None;
        }
        let has_fraction = end > integer_digits;

        let mut has_exponent = false;
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut after = end + 1;
            if matches!(bytes.get(after), Some(b'+' | b'-')) {
                after += 1;
            }
            let exponent_digits = digits(bytes, after);
            if exponent_digits > 0 {
                end = after + exponent_digits;
                has_exponent = true;
            }
        }

        let literal = &input[..end];
        if !has_fraction && !has_exponent {
            if let Ok(value) = literal.parse::<i64>() {
                return Some((NumberValue::Integer(value), end));
            }
        }

        let normalized = if self.decimal_separator == '.' {
            literal.to_string()
        } else {
            literal.replacen(self.decimal_separator, ".", 1)
        };
        let value = normalized.parse::<f64>().ok()?;
        Some((NumberValue::Decimal(value), end))
    }
}
