use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::BinaryKind;

/// Priority of symbols that never act as binary operators (parentheses, separators, `%`).
pub const LOWEST_PRIORITY: u8 = 0;
/// Comparisons: `=`, `<>`, `<`, `<=`, `>`, `>=`.
pub const COMPARISON_PRIORITY: u8 = 1;
/// Range (`:`). Shares the loosest operator tier with comparisons.
pub const RANGE_PRIORITY: u8 = 1;
pub const ADDITION_SUBTRACTION_PRIORITY: u8 = 2;
pub const MULTIPLICATION_DIVISION_PRIORITY: u8 = 3;
pub const POWER_PRIORITY: u8 = 4;
/// Highest tier scanned by the precedence engine.
pub const HIGHEST_PRIORITY: u8 = POWER_PRIORITY;

/// A leaf node: a single value plus the exact source text it was parsed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafToken<V> {
    value: V,
    text: String,
}

impl<V: Clone> LeafToken<V> {
    pub fn new(value: V, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns `self` when the text is unchanged, otherwise a copy with the new text.
    pub fn set_text(&self, text: &str) -> Cow<'_, Self> {
        if self.text == text {
            return Cow::Borrowed(self);
        }
        Cow::Owned(Self {
            value: self.value.clone(),
            text: text.to_string(),
        })
    }
}

impl<V: Clone + PartialEq> LeafToken<V> {
    /// Returns `self` when the value is unchanged, otherwise a copy with the new value and
    /// the same source text.
    pub fn set_value(&self, value: V) -> Cow<'_, Self> {
        if self.value == value {
            return Cow::Borrowed(self);
        }
        Cow::Owned(Self {
            value,
            text: self.text.clone(),
        })
    }
}

/// Every operator and punctuation symbol that can appear in a formula.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Percent,
    Between,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    ParenthesisOpen,
    ParenthesisClose,
    ParameterSeparator,
}

impl Symbol {
    pub const ALL: [Symbol; 16] = [
        Symbol::Plus,
        Symbol::Minus,
        Symbol::Multiply,
        Symbol::Divide,
        Symbol::Power,
        Symbol::Percent,
        Symbol::Between,
        Symbol::Equals,
        Symbol::NotEquals,
        Symbol::GreaterThan,
        Symbol::GreaterThanEquals,
        Symbol::LessThan,
        Symbol::LessThanEquals,
        Symbol::ParenthesisOpen,
        Symbol::ParenthesisClose,
        Symbol::ParameterSeparator,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Multiply => "*",
            Symbol::Divide => "/",
            Symbol::Power => "^",
            Symbol::Percent => "%",
            Symbol::Between => ":",
            Symbol::Equals => "=",
            Symbol::NotEquals => "<>",
            Symbol::GreaterThan => ">",
            Symbol::GreaterThanEquals => ">=",
            Symbol::LessThan => "<",
            Symbol::LessThanEquals => "<=",
            Symbol::ParenthesisOpen => "(",
            Symbol::ParenthesisClose => ")",
            Symbol::ParameterSeparator => ",",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == text)
    }

    /// Operator priority; higher binds tighter.
    pub const fn priority(self) -> u8 {
        match self {
            Symbol::Equals
            | Symbol::NotEquals
            | Symbol::GreaterThan
            | Symbol::GreaterThanEquals
            | Symbol::LessThan
            | Symbol::LessThanEquals => COMPARISON_PRIORITY,
            Symbol::Between => RANGE_PRIORITY,
            Symbol::Plus | Symbol::Minus => ADDITION_SUBTRACTION_PRIORITY,
            Symbol::Multiply | Symbol::Divide => MULTIPLICATION_DIVISION_PRIORITY,
            Symbol::Power => POWER_PRIORITY,
            Symbol::Percent
            | Symbol::ParenthesisOpen
            | Symbol::ParenthesisClose
            | Symbol::ParameterSeparator => LOWEST_PRIORITY,
        }
    }

    /// The binary node this symbol produces when it joins two operands.
    pub const fn binary_kind(self) -> Option<BinaryKind> {
        Some(match self {
            Symbol::Plus => BinaryKind::Addition,
            Symbol::Minus => BinaryKind::Subtraction,
            Symbol::Multiply => BinaryKind::Multiplication,
            Symbol::Divide => BinaryKind::Division,
            Symbol::Power => BinaryKind::Power,
            Symbol::Between => BinaryKind::Range,
            Symbol::Equals => BinaryKind::Equals,
            Symbol::NotEquals => BinaryKind::NotEquals,
            Symbol::GreaterThan => BinaryKind::GreaterThan,
            Symbol::GreaterThanEquals => BinaryKind::GreaterThanEquals,
            Symbol::LessThan => BinaryKind::LessThan,
            Symbol::LessThanEquals => BinaryKind::LessThanEquals,
            Symbol::Percent
            | Symbol::ParenthesisOpen
            | Symbol::ParenthesisClose
            | Symbol::ParameterSeparator => return None,
        })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a numeric literal as produced by a [`crate::NumberParser`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum NumberValue {
    Integer(i64),
    Decimal(f64),
}

impl NumberValue {
    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::Integer(v) => v as f64,
            NumberValue::Decimal(v) => v,
        }
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberValue::Integer(v) => write!(f, "{v}"),
            NumberValue::Decimal(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_roundtrip_through_text() {
        for symbol in Symbol::ALL {
            assert_eq!(Symbol::from_text(symbol.as_str()), Some(symbol));
        }
        assert_eq!(Symbol::from_text("&"), None);
    }

    #[test]
    fn every_operator_tier_has_a_binary_kind() {
        for symbol in Symbol::ALL {
            let is_operator = symbol.priority() > LOWEST_PRIORITY;
            assert_eq!(symbol.binary_kind().is_some(), is_operator, "{symbol}");
        }
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(Symbol::Power.priority() > Symbol::Multiply.priority());
        assert!(Symbol::Divide.priority() > Symbol::Minus.priority());
        assert!(Symbol::Plus.priority() > Symbol::LessThanEquals.priority());
        assert_eq!(Symbol::Between.priority(), Symbol::Equals.priority());
    }

    #[test]
    fn leaf_setters_preserve_identity() {
        let leaf = LeafToken::new(NumberValue::Integer(1), "1");
        assert!(matches!(leaf.set_text("1"), Cow::Borrowed(_)));
        assert!(matches!(leaf.set_value(NumberValue::Integer(1)), Cow::Borrowed(_)));

        let renamed = leaf.set_text("01").into_owned();
        assert_eq!(renamed.value(), &NumberValue::Integer(1));
        assert_eq!(renamed.text(), "01");

        let revalued = leaf.set_value(NumberValue::Decimal(1.5)).into_owned();
        assert_eq!(revalued.text(), "1");
    }
}
