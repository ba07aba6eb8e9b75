//! The parse tree: an immutable, closed set of syntax nodes that keep their exact source
//! text.
//!
//! Parent nodes ([`ParentToken`] and its typed wrappers) hold an ordered list of children,
//! leaves ([`LeafToken`]) hold a single value. Every node answers exactly one `is_*`
//! predicate and reports a [`TokenKind`], which is what downstream consumers switch on.

mod leaf;
mod parent;

use std::borrow::Cow;
use std::fmt;

use formula_model::{ColumnReference, LabelName, RowReference};
use serde::{Deserialize, Serialize};

pub use leaf::{
    LeafToken, NumberValue, Symbol, ADDITION_SUBTRACTION_PRIORITY, COMPARISON_PRIORITY,
    HIGHEST_PRIORITY, LOWEST_PRIORITY, MULTIPLICATION_DIVISION_PRIORITY, POWER_PRIORITY,
    RANGE_PRIORITY,
};
pub use parent::{BinaryToken, CellToken, FunctionToken, ParentToken, UnaryToken};

use parent::{FromParent, ParentRepr, Stripped};

use crate::TokenError;

/// The binary node variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    Range,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl BinaryKind {
    /// The operator symbol joining the two operands.
    pub const fn symbol(self) -> Symbol {
        match self {
            BinaryKind::Addition => Symbol::Plus,
            BinaryKind::Subtraction => Symbol::Minus,
            BinaryKind::Multiplication => Symbol::Multiply,
            BinaryKind::Division => Symbol::Divide,
            BinaryKind::Power => Symbol::Power,
            BinaryKind::Range => Symbol::Between,
            BinaryKind::Equals => Symbol::Equals,
            BinaryKind::NotEquals => Symbol::NotEquals,
            BinaryKind::GreaterThan => Symbol::GreaterThan,
            BinaryKind::GreaterThanEquals => Symbol::GreaterThanEquals,
            BinaryKind::LessThan => Symbol::LessThan,
            BinaryKind::LessThanEquals => Symbol::LessThanEquals,
        }
    }

    pub const fn token_kind(self) -> TokenKind {
        match self {
            BinaryKind::Addition => TokenKind::Addition,
            BinaryKind::Subtraction => TokenKind::Subtraction,
            BinaryKind::Multiplication => TokenKind::Multiplication,
            BinaryKind::Division => TokenKind::Division,
            BinaryKind::Power => TokenKind::Power,
            BinaryKind::Range => TokenKind::Range,
            BinaryKind::Equals => TokenKind::Equals,
            BinaryKind::NotEquals => TokenKind::NotEquals,
            BinaryKind::GreaterThan => TokenKind::GreaterThan,
            BinaryKind::GreaterThanEquals => TokenKind::GreaterThanEquals,
            BinaryKind::LessThan => TokenKind::LessThan,
            BinaryKind::LessThanEquals => TokenKind::LessThanEquals,
        }
    }
}

/// The unary node variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryKind {
    Negative,
    Percentage,
}

impl UnaryKind {
    pub const fn token_kind(self) -> TokenKind {
        match self {
            UnaryKind::Negative => TokenKind::Negative,
            UnaryKind::Percentage => TokenKind::Percentage,
        }
    }
}

/// Type tag for every node variant, with symbols distinguished individually.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    Range,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    Negative,
    Percentage,
    Group,
    Function,
    Cell,
    Expression,
    ColumnReference,
    RowReference,
    Label,
    FunctionName,
    Number,
    Text,
    Whitespace,
    Symbol(Symbol),
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Addition => "addition",
            TokenKind::Subtraction => "subtraction",
            TokenKind::Multiplication => "multiplication",
            TokenKind::Division => "division",
            TokenKind::Power => "power",
            TokenKind::Range => "range",
            TokenKind::Equals => "equals",
            TokenKind::NotEquals => "not-equals",
            TokenKind::GreaterThan => "greater-than",
            TokenKind::GreaterThanEquals => "greater-than-equals",
            TokenKind::LessThan => "less-than",
            TokenKind::LessThanEquals => "less-than-equals",
            TokenKind::Negative => "negative",
            TokenKind::Percentage => "percentage",
            TokenKind::Group => "group",
            TokenKind::Function => "function",
            TokenKind::Cell => "cell",
            TokenKind::Expression => "expression",
            TokenKind::ColumnReference => "column-reference",
            TokenKind::RowReference => "row-reference",
            TokenKind::Label => "label",
            TokenKind::FunctionName => "function-name",
            TokenKind::Number => "number",
            TokenKind::Text => "text",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Symbol(_) => "symbol",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Symbol(symbol) => write!(f, "symbol {symbol:?}"),
            other => f.write_str(other.name()),
        }
    }
}

/// A node of the parse tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum ParserToken {
    #[serde(deserialize_with = "de::addition")]
    Addition(BinaryToken),
    #[serde(deserialize_with = "de::subtraction")]
    Subtraction(BinaryToken),
    #[serde(deserialize_with = "de::multiplication")]
    Multiplication(BinaryToken),
    #[serde(deserialize_with = "de::division")]
    Division(BinaryToken),
    #[serde(deserialize_with = "de::power")]
    Power(BinaryToken),
    #[serde(deserialize_with = "de::range")]
    Range(BinaryToken),
    #[serde(deserialize_with = "de::equals")]
    Equals(BinaryToken),
    #[serde(deserialize_with = "de::not_equals")]
    NotEquals(BinaryToken),
    #[serde(deserialize_with = "de::greater_than")]
    GreaterThan(BinaryToken),
    #[serde(deserialize_with = "de::greater_than_equals")]
    GreaterThanEquals(BinaryToken),
    #[serde(deserialize_with = "de::less_than")]
    LessThan(BinaryToken),
    #[serde(deserialize_with = "de::less_than_equals")]
    LessThanEquals(BinaryToken),
    #[serde(deserialize_with = "de::negative")]
    Negative(UnaryToken),
    #[serde(deserialize_with = "de::percentage")]
    Percentage(UnaryToken),
    #[serde(deserialize_with = "de::group")]
    Group(ParentToken),
    #[serde(deserialize_with = "de::function")]
    Function(FunctionToken),
    #[serde(deserialize_with = "de::cell")]
    Cell(CellToken),
    /// A plain sequence that did not reduce to a single node.
    #[serde(deserialize_with = "de::expression")]
    Expression(ParentToken),
    ColumnReference(LeafToken<ColumnReference>),
    RowReference(LeafToken<RowReference>),
    Label(LeafToken<LabelName>),
    FunctionName(LeafToken<String>),
    Number(LeafToken<NumberValue>),
    /// A quoted text literal; the value has quotes removed and `""` unescaped.
    Text(LeafToken<String>),
    Whitespace(LeafToken<String>),
    Symbol(LeafToken<Symbol>),
}

/// Parent variants are rebuilt through their constructors, so a malformed tree is
/// rejected with the kind its tag names.
mod de {
    use serde::de::{Deserialize, Deserializer, Error};

    use super::{
        BinaryToken, CellToken, FromParent, FunctionToken, ParentRepr, ParentToken, TokenKind,
        UnaryToken,
    };

    fn node<'de, D: Deserializer<'de>, T: FromParent>(
        kind: TokenKind,
        deserializer: D,
    ) -> Result<T, D::Error> {
        let parent = ParentRepr::deserialize(deserializer)?
            .into_parent(kind)
            .map_err(D::Error::custom)?;
        T::from_parent(kind, parent).map_err(D::Error::custom)
    }

    macro_rules! nodes {
        ($($name:ident: $token:ident = $kind:ident),* $(,)?) => {
            $(
                pub(super) fn $name<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<$token, D::Error> {
                    node(TokenKind::$kind, deserializer)
                }
            )*
        };
    }

    nodes! {
        addition: BinaryToken = Addition,
        subtraction: BinaryToken = Subtraction,
        multiplication: BinaryToken = Multiplication,
        division: BinaryToken = Division,
        power: BinaryToken = Power,
        range: BinaryToken = Range,
        equals: BinaryToken = Equals,
        not_equals: BinaryToken = NotEquals,
        greater_than: BinaryToken = GreaterThan,
        greater_than_equals: BinaryToken = GreaterThanEquals,
        less_than: BinaryToken = LessThan,
        less_than_equals: BinaryToken = LessThanEquals,
        negative: UnaryToken = Negative,
        percentage: UnaryToken = Percentage,
        group: ParentToken = Group,
        function: FunctionToken = Function,
        cell: CellToken = Cell,
        expression: ParentToken = Expression,
    }
}

// Factories.
impl ParserToken {
    pub fn binary(
        kind: BinaryKind,
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let token_kind = kind.token_kind();
        let token = BinaryToken::new(token_kind, ParentToken::new(token_kind, children, text)?)?;
        Ok(match kind {
            BinaryKind::Addition => ParserToken::Addition(token),
            BinaryKind::Subtraction => ParserToken::Subtraction(token),
            BinaryKind::Multiplication => ParserToken::Multiplication(token),
            BinaryKind::Division => ParserToken::Division(token),
            BinaryKind::Power => ParserToken::Power(token),
            BinaryKind::Range => ParserToken::Range(token),
            BinaryKind::Equals => ParserToken::Equals(token),
            BinaryKind::NotEquals => ParserToken::NotEquals(token),
            BinaryKind::GreaterThan => ParserToken::GreaterThan(token),
            BinaryKind::GreaterThanEquals => ParserToken::GreaterThanEquals(token),
            BinaryKind::LessThan => ParserToken::LessThan(token),
            BinaryKind::LessThanEquals => ParserToken::LessThanEquals(token),
        })
    }

    pub fn addition(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Addition, children, text)
    }

    pub fn subtraction(
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Subtraction, children, text)
    }

    pub fn multiplication(
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Multiplication, children, text)
    }

    pub fn division(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Division, children, text)
    }

    pub fn power(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Power, children, text)
    }

    pub fn range(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        Self::binary(BinaryKind::Range, children, text)
    }

    pub fn unary(
        kind: UnaryKind,
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let token_kind = kind.token_kind();
        let token = UnaryToken::new(token_kind, ParentToken::new(token_kind, children, text)?)?;
        Ok(match kind {
            UnaryKind::Negative => ParserToken::Negative(token),
            UnaryKind::Percentage => ParserToken::Percentage(token),
        })
    }

    pub fn negative(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        Self::unary(UnaryKind::Negative, children, text)
    }

    pub fn percentage(
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        Self::unary(UnaryKind::Percentage, children, text)
    }

    pub fn group(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        ParentToken::new(TokenKind::Group, children, text).map(ParserToken::Group)
    }

    pub fn function(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        let parent = ParentToken::new(TokenKind::Function, children, text)?;
        FunctionToken::new(parent).map(ParserToken::Function)
    }

    pub fn cell(children: Vec<ParserToken>, text: impl Into<String>) -> Result<Self, TokenError> {
        let parent = ParentToken::new(TokenKind::Cell, children, text)?;
        CellToken::new(parent).map(ParserToken::Cell)
    }

    pub fn expression(
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        ParentToken::new(TokenKind::Expression, children, text).map(ParserToken::Expression)
    }

    pub fn column(value: ColumnReference, text: impl Into<String>) -> Self {
        ParserToken::ColumnReference(LeafToken::new(value, text))
    }

    pub fn row(value: RowReference, text: impl Into<String>) -> Self {
        ParserToken::RowReference(LeafToken::new(value, text))
    }

    pub fn label(value: LabelName, text: impl Into<String>) -> Self {
        ParserToken::Label(LeafToken::new(value, text))
    }

    pub fn function_name(name: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::FunctionName(LeafToken::new(name.into(), text))
    }

    pub fn number(value: NumberValue, text: impl Into<String>) -> Self {
        ParserToken::Number(LeafToken::new(value, text))
    }

    pub fn text_literal(value: impl Into<String>, text: impl Into<String>) -> Self {
        ParserToken::Text(LeafToken::new(value.into(), text))
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        let text = text.into();
        ParserToken::Whitespace(LeafToken::new(text.clone(), text))
    }

    pub fn symbol(symbol: Symbol, text: impl Into<String>) -> Self {
        ParserToken::Symbol(LeafToken::new(symbol, text))
    }
}

// Structure.
impl ParserToken {
    pub fn kind(&self) -> TokenKind {
        match self {
            ParserToken::Addition(_) => TokenKind::Addition,
            ParserToken::Subtraction(_) => TokenKind::Subtraction,
            ParserToken::Multiplication(_) => TokenKind::Multiplication,
            ParserToken::Division(_) => TokenKind::Division,
            ParserToken::Power(_) => TokenKind::Power,
            ParserToken::Range(_) => TokenKind::Range,
            ParserToken::Equals(_) => TokenKind::Equals,
            ParserToken::NotEquals(_) => TokenKind::NotEquals,
            ParserToken::GreaterThan(_) => TokenKind::GreaterThan,
            ParserToken::GreaterThanEquals(_) => TokenKind::GreaterThanEquals,
            ParserToken::LessThan(_) => TokenKind::LessThan,
            ParserToken::LessThanEquals(_) => TokenKind::LessThanEquals,
            ParserToken::Negative(_) => TokenKind::Negative,
            ParserToken::Percentage(_) => TokenKind::Percentage,
            ParserToken::Group(_) => TokenKind::Group,
            ParserToken::Function(_) => TokenKind::Function,
            ParserToken::Cell(_) => TokenKind::Cell,
            ParserToken::Expression(_) => TokenKind::Expression,
            ParserToken::ColumnReference(_) => TokenKind::ColumnReference,
            ParserToken::RowReference(_) => TokenKind::RowReference,
            ParserToken::Label(_) => TokenKind::Label,
            ParserToken::FunctionName(_) => TokenKind::FunctionName,
            ParserToken::Number(_) => TokenKind::Number,
            ParserToken::Text(_) => TokenKind::Text,
            ParserToken::Whitespace(_) => TokenKind::Whitespace,
            ParserToken::Symbol(leaf) => TokenKind::Symbol(*leaf.value()),
        }
    }

    /// The exact source text this node was parsed from.
    pub fn text(&self) -> &str {
        match self {
            ParserToken::ColumnReference(leaf) => leaf.text(),
            ParserToken::RowReference(leaf) => leaf.text(),
            ParserToken::Label(leaf) => leaf.text(),
            ParserToken::FunctionName(leaf) => leaf.text(),
            ParserToken::Number(leaf) => leaf.text(),
            ParserToken::Text(leaf) => leaf.text(),
            ParserToken::Whitespace(leaf) => leaf.text(),
            ParserToken::Symbol(leaf) => leaf.text(),
            other => other.parent().map_or("", ParentToken::text),
        }
    }

    /// The parent payload of every non-leaf variant.
    pub fn parent(&self) -> Option<&ParentToken> {
        match self {
            ParserToken::Addition(t)
            | ParserToken::Subtraction(t)
            | ParserToken::Multiplication(t)
            | ParserToken::Division(t)
            | ParserToken::Power(t)
            | ParserToken::Range(t)
            | ParserToken::Equals(t)
            | ParserToken::NotEquals(t)
            | ParserToken::GreaterThan(t)
            | ParserToken::GreaterThanEquals(t)
            | ParserToken::LessThan(t)
            | ParserToken::LessThanEquals(t) => Some(t.parent()),
            ParserToken::Negative(t) | ParserToken::Percentage(t) => Some(t.parent()),
            ParserToken::Group(t) | ParserToken::Expression(t) => Some(t),
            ParserToken::Function(t) => Some(t.parent()),
            ParserToken::Cell(t) => Some(t.parent()),
            ParserToken::ColumnReference(_)
            | ParserToken::RowReference(_)
            | ParserToken::Label(_)
            | ParserToken::FunctionName(_)
            | ParserToken::Number(_)
            | ParserToken::Text(_)
            | ParserToken::Whitespace(_)
            | ParserToken::Symbol(_) => None,
        }
    }

    /// Ordered children; empty for leaves.
    pub fn children(&self) -> &[ParserToken] {
        match self.parent() {
            Some(parent) => parent.children(),
            None => &[],
        }
    }

    pub fn as_binary(&self) -> Option<(BinaryKind, &BinaryToken)> {
        Some(match self {
            ParserToken::Addition(t) => (BinaryKind::Addition, t),
            ParserToken::Subtraction(t) => (BinaryKind::Subtraction, t),
            ParserToken::Multiplication(t) => (BinaryKind::Multiplication, t),
            ParserToken::Division(t) => (BinaryKind::Division, t),
            ParserToken::Power(t) => (BinaryKind::Power, t),
            ParserToken::Range(t) => (BinaryKind::Range, t),
            ParserToken::Equals(t) => (BinaryKind::Equals, t),
            ParserToken::NotEquals(t) => (BinaryKind::NotEquals, t),
            ParserToken::GreaterThan(t) => (BinaryKind::GreaterThan, t),
            ParserToken::GreaterThanEquals(t) => (BinaryKind::GreaterThanEquals, t),
            ParserToken::LessThan(t) => (BinaryKind::LessThan, t),
            ParserToken::LessThanEquals(t) => (BinaryKind::LessThanEquals, t),
            _ => return None,
        })
    }

    pub fn as_unary(&self) -> Option<(UnaryKind, &UnaryToken)> {
        match self {
            ParserToken::Negative(t) => Some((UnaryKind::Negative, t)),
            ParserToken::Percentage(t) => Some((UnaryKind::Percentage, t)),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            ParserToken::Symbol(leaf) => Some(*leaf.value()),
            _ => None,
        }
    }

    /// Returns `self` when `text` matches, otherwise a structurally identical node with the
    /// new text.
    pub fn set_text(&self, text: &str) -> Cow<'_, ParserToken> {
        if self.text() == text {
            return Cow::Borrowed(self);
        }
        Cow::Owned(match self {
            ParserToken::Addition(t) => ParserToken::Addition(t.with_text(text)),
            ParserToken::Subtraction(t) => ParserToken::Subtraction(t.with_text(text)),
            ParserToken::Multiplication(t) => ParserToken::Multiplication(t.with_text(text)),
            ParserToken::Division(t) => ParserToken::Division(t.with_text(text)),
            ParserToken::Power(t) => ParserToken::Power(t.with_text(text)),
            ParserToken::Range(t) => ParserToken::Range(t.with_text(text)),
            ParserToken::Equals(t) => ParserToken::Equals(t.with_text(text)),
            ParserToken::NotEquals(t) => ParserToken::NotEquals(t.with_text(text)),
            ParserToken::GreaterThan(t) => ParserToken::GreaterThan(t.with_text(text)),
            ParserToken::GreaterThanEquals(t) => {
                ParserToken::GreaterThanEquals(t.with_text(text))
            }
            ParserToken::LessThan(t) => ParserToken::LessThan(t.with_text(text)),
            ParserToken::LessThanEquals(t) => ParserToken::LessThanEquals(t.with_text(text)),
            ParserToken::Negative(t) => ParserToken::Negative(t.with_text(text)),
            ParserToken::Percentage(t) => ParserToken::Percentage(t.with_text(text)),
            ParserToken::Group(t) => ParserToken::Group(t.with_text(text)),
            ParserToken::Function(t) => ParserToken::Function(t.with_text(text)),
            ParserToken::Cell(t) => ParserToken::Cell(t.with_text(text)),
            ParserToken::Expression(t) => ParserToken::Expression(t.with_text(text)),
            ParserToken::ColumnReference(l) => {
                ParserToken::ColumnReference(l.set_text(text).into_owned())
            }
            ParserToken::RowReference(l) => ParserToken::RowReference(l.set_text(text).into_owned()),
            ParserToken::Label(l) => ParserToken::Label(l.set_text(text).into_owned()),
            ParserToken::FunctionName(l) => ParserToken::FunctionName(l.set_text(text).into_owned()),
            ParserToken::Number(l) => ParserToken::Number(l.set_text(text).into_owned()),
            ParserToken::Text(l) => ParserToken::Text(l.set_text(text).into_owned()),
            ParserToken::Whitespace(l) => ParserToken::Whitespace(l.set_text(text).into_owned()),
            ParserToken::Symbol(l) => ParserToken::Symbol(l.set_text(text).into_owned()),
        })
    }

    /// The evaluable view of this node.
    ///
    /// Symbol and whitespace leaves are absent; other leaves are themselves. A parent node
    /// is itself when none of its children were dropped or changed, otherwise a node of the
    /// same variant and text holding only the surviving children. The result is computed
    /// once per node.
    pub fn without_symbols_or_whitespace(&self) -> Option<&ParserToken> {
        let Some(parent) = self.parent() else {
            return if self.is_noise() { None } else { Some(self) };
        };
        match parent.stripped_cache().get_or_init(|| self.strip(parent)) {
            Stripped::Unchanged => Some(self),
            Stripped::Replaced(token) => Some(&**token),
            Stripped::Absent => None,
        }
    }

    fn strip(&self, parent: &ParentToken) -> Stripped {
        let unchanged = parent.children().iter().all(|child| {
            child
                .without_symbols_or_whitespace()
                .is_some_and(|stripped| std::ptr::eq(stripped, child))
        });
        if unchanged {
            return Stripped::Unchanged;
        }

        let children: Vec<ParserToken> = parent
            .children()
            .iter()
            .filter_map(ParserToken::without_symbols_or_whitespace)
            .cloned()
            .collect();
        if children.is_empty() {
            return Stripped::Absent;
        }

        let text = parent.text();
        let rebuilt = if let Some((kind, _)) = self.as_binary() {
            ParserToken::binary(kind, children.clone(), text)
        } else if let Some((kind, _)) = self.as_unary() {
            ParserToken::unary(kind, children.clone(), text)
        } else {
            match self {
                ParserToken::Group(_) => ParserToken::group(children.clone(), text),
                ParserToken::Function(_) => ParserToken::function(children.clone(), text),
                ParserToken::Cell(_) => ParserToken::cell(children.clone(), text),
                _ => ParserToken::expression(children.clone(), text),
            }
        };
        match rebuilt.or_else(|_| ParserToken::expression(children, text)) {
            Ok(token) => Stripped::Replaced(Box::new(token)),
            Err(_) => Stripped::Absent,
        }
    }
}

macro_rules! symbol_predicates {
    ($($name:ident => $symbol:ident),* $(,)?) => {
        $(
            #[doc = concat!("True for the `", stringify!($symbol), "` symbol leaf.")]
            pub fn $name(&self) -> bool {
                self.is_symbol_of(Symbol::$symbol)
            }
        )*
    };
}

// Variant predicates.
impl ParserToken {
    pub fn is_addition(&self) -> bool {
        matches!(self, ParserToken::Addition(_))
    }

    pub fn is_subtraction(&self) -> bool {
        matches!(self, ParserToken::Subtraction(_))
    }

    pub fn is_multiplication(&self) -> bool {
        matches!(self, ParserToken::Multiplication(_))
    }

    pub fn is_division(&self) -> bool {
        matches!(self, ParserToken::Division(_))
    }

    pub fn is_power(&self) -> bool {
        matches!(self, ParserToken::Power(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ParserToken::Range(_))
    }

    pub fn is_equals(&self) -> bool {
        matches!(self, ParserToken::Equals(_))
    }

    pub fn is_not_equals(&self) -> bool {
        matches!(self, ParserToken::NotEquals(_))
    }

    pub fn is_greater_than(&self) -> bool {
        matches!(self, ParserToken::GreaterThan(_))
    }

    pub fn is_greater_than_equals(&self) -> bool {
        matches!(self, ParserToken::GreaterThanEquals(_))
    }

    pub fn is_less_than(&self) -> bool {
        matches!(self, ParserToken::LessThan(_))
    }

    pub fn is_less_than_equals(&self) -> bool {
        matches!(self, ParserToken::LessThanEquals(_))
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, ParserToken::Negative(_))
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, ParserToken::Percentage(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ParserToken::Group(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ParserToken::Function(_))
    }

    pub fn is_cell(&self) -> bool {
        matches!(self, ParserToken::Cell(_))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, ParserToken::Expression(_))
    }

    pub fn is_column_reference(&self) -> bool {
        matches!(self, ParserToken::ColumnReference(_))
    }

    pub fn is_row_reference(&self) -> bool {
        matches!(self, ParserToken::RowReference(_))
    }

    pub fn is_label(&self) -> bool {
        matches!(self, ParserToken::Label(_))
    }

    pub fn is_function_name(&self) -> bool {
        matches!(self, ParserToken::FunctionName(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, ParserToken::Number(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ParserToken::Text(_))
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, ParserToken::Whitespace(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, ParserToken::Symbol(_))
    }

    /// True for the symbol leaf carrying `symbol`.
    pub fn is_symbol_of(&self, symbol: Symbol) -> bool {
        self.as_symbol() == Some(symbol)
    }

    symbol_predicates! {
        is_plus_symbol => Plus,
        is_minus_symbol => Minus,
        is_multiply_symbol => Multiply,
        is_divide_symbol => Divide,
        is_power_symbol => Power,
        is_percent_symbol => Percent,
        is_between_symbol => Between,
        is_equals_symbol => Equals,
        is_not_equals_symbol => NotEquals,
        is_greater_than_symbol => GreaterThan,
        is_greater_than_equals_symbol => GreaterThanEquals,
        is_less_than_symbol => LessThan,
        is_less_than_equals_symbol => LessThanEquals,
        is_parenthesis_open_symbol => ParenthesisOpen,
        is_parenthesis_close_symbol => ParenthesisClose,
        is_parameter_separator_symbol => ParameterSeparator,
    }

    pub fn is_binary(&self) -> bool {
        self.as_binary().is_some()
    }

    pub fn is_unary(&self) -> bool {
        self.as_unary().is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.parent().is_none()
    }

    /// Symbols and whitespace: textually present, semantically irrelevant.
    pub fn is_noise(&self) -> bool {
        self.is_symbol() || self.is_whitespace()
    }
}

impl fmt::Display for ParserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
