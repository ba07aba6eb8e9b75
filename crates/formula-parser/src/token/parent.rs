use std::fmt;
use std::sync::OnceLock;

use formula_model::{CellReference, ColumnReference, RowReference};
use serde::{Deserialize, Serialize};

use super::{ParserToken, TokenKind};
use crate::TokenError;

/// Memoised result of stripping symbols and whitespace from a parent node.
#[derive(Clone, Debug)]
pub(crate) enum Stripped {
    /// No child was dropped or changed; the node itself is the stripped view.
    Unchanged,
    Replaced(Box<ParserToken>),
    /// Every child was noise.
    Absent,
}

/// An ordered, non-empty list of child tokens plus the source text they cover.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "ParentRepr")]
pub struct ParentToken {
    children: Vec<ParserToken>,
    text: String,
    #[serde(skip)]
    stripped: OnceLock<Stripped>,
}

/// Serialized shape of every parent node; the node kind lives in the enclosing tag.
#[derive(Deserialize)]
pub(crate) struct ParentRepr {
    children: Vec<ParserToken>,
    text: String,
}

impl ParentRepr {
    pub(crate) fn into_parent(self, kind: TokenKind) -> Result<ParentToken, TokenError> {
        ParentToken::new(kind, self.children, self.text)
    }
}

impl TryFrom<ParentRepr> for ParentToken {
    type Error = TokenError;

    fn try_from(repr: ParentRepr) -> Result<Self, Self::Error> {
        repr.into_parent(TokenKind::Expression)
    }
}

/// Rebuilds a typed parent node from its children, validating its shape.
pub(crate) trait FromParent: Sized {
    fn from_parent(kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError>;
}

impl FromParent for ParentToken {
    fn from_parent(_kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        Ok(parent)
    }
}

impl ParentToken {
    pub(crate) fn new(
        kind: TokenKind,
        children: Vec<ParserToken>,
        text: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let text = text.into();
        if children.is_empty() {
            return Err(TokenError::EmptyChildren { kind, text });
        }
        Ok(Self {
            children,
            text,
            stripped: OnceLock::new(),
        })
    }

    #[inline]
    pub fn children(&self) -> &[ParserToken] {
        &self.children
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_children(self) -> Vec<ParserToken> {
        self.children
    }

    /// Children that are neither symbols nor whitespace, in order.
    pub fn significant_children(&self) -> impl Iterator<Item = &ParserToken> + '_ {
        self.children.iter().filter(|c| !c.is_noise())
    }

    /// Same children, new text. The stripped-view cache starts empty.
    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            children: self.children.clone(),
            text: text.to_string(),
            stripped: OnceLock::new(),
        }
    }

    pub(crate) fn stripped_cache(&self) -> &OnceLock<Stripped> {
        &self.stripped
    }
}

impl PartialEq for ParentToken {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.children == other.children
    }
}

impl fmt::Debug for ParentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentToken")
            .field("text", &self.text)
            .field("children", &self.children)
            .finish()
    }
}

fn significant_positions(children: &[ParserToken]) -> Vec<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_noise())
        .map(|(i, _)| i)
        .collect()
}

/// A binary operator node; `left` and `right` are the first and last significant children.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "ParentToken")]
pub struct BinaryToken {
    parent: ParentToken,
    left: usize,
    right: usize,
}

impl BinaryToken {
    pub(crate) fn new(kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        let positions = significant_positions(&parent.children);
        match (positions.first(), positions.last()) {
            (Some(&left), Some(&right)) if left != right => Ok(Self {
                parent,
                left,
                right,
            }),
            _ => Err(TokenError::MissingOperand {
                kind,
                text: parent.text,
            }),
        }
    }

    #[inline]
    pub fn parent(&self) -> &ParentToken {
        &self.parent
    }

    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            parent: self.parent.with_text(text),
            ..*self
        }
    }

    pub fn left(&self) -> &ParserToken {
        &self.parent.children[self.left]
    }

    pub fn right(&self) -> &ParserToken {
        &self.parent.children[self.right]
    }
}

impl From<BinaryToken> for ParentToken {
    fn from(token: BinaryToken) -> Self {
        token.parent
    }
}

impl FromParent for BinaryToken {
    fn from_parent(kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        BinaryToken::new(kind, parent)
    }
}

/// A unary node (negative, percentage) with exactly one significant child.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "ParentToken")]
pub struct UnaryToken {
    parent: ParentToken,
    parameter: usize,
}

impl UnaryToken {
    pub(crate) fn new(kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        let positions = significant_positions(&parent.children);
        match positions.as_slice() {
            [parameter] => Ok(Self {
                parameter: *parameter,
                parent,
            }),
            found => Err(TokenError::WrongParameterCount {
                kind,
                found: found.len(),
                text: parent.text,
            }),
        }
    }

    #[inline]
    pub fn parent(&self) -> &ParentToken {
        &self.parent
    }

    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            parent: self.parent.with_text(text),
            ..*self
        }
    }

    pub fn parameter(&self) -> &ParserToken {
        &self.parent.children[self.parameter]
    }
}

impl From<UnaryToken> for ParentToken {
    fn from(token: UnaryToken) -> Self {
        token.parent
    }
}

impl FromParent for UnaryToken {
    fn from_parent(kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        UnaryToken::new(kind, parent)
    }
}

/// A cell address node. Exactly one column leaf and one row leaf must appear somewhere
/// among its descendants, in either order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "ParentToken")]
pub struct CellToken {
    parent: ParentToken,
    column: ColumnReference,
    row: RowReference,
}

impl CellToken {
    pub(crate) fn new(parent: ParentToken) -> Result<Self, TokenError> {
        let mut columns = Vec::new();
        let mut rows = Vec::new();
        collect_coordinates(&parent.children, &mut columns, &mut rows);

        let column = match columns.as_slice() {
            [column] => *column,
            [] => return Err(TokenError::MissingColumn { text: parent.text }),
            _ => return Err(TokenError::DuplicateColumn { text: parent.text }),
        };
        let row = match rows.as_slice() {
            [row] => *row,
            [] => return Err(TokenError::MissingRow { text: parent.text }),
            _ => return Err(TokenError::DuplicateRow { text: parent.text }),
        };
        Ok(Self {
            parent,
            column,
            row,
        })
    }

    #[inline]
    pub fn parent(&self) -> &ParentToken {
        &self.parent
    }

    #[inline]
    pub fn column(&self) -> ColumnReference {
        self.column
    }

    #[inline]
    pub fn row(&self) -> RowReference {
        self.row
    }

    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            parent: self.parent.with_text(text),
            ..*self
        }
    }

    pub fn reference(&self) -> CellReference {
        CellReference::with(self.column, self.row)
    }
}

fn collect_coordinates(
    tokens: &[ParserToken],
    columns: &mut Vec<ColumnReference>,
    rows: &mut Vec<RowReference>,
) {
    for token in tokens {
        match token {
            ParserToken::ColumnReference(leaf) => columns.push(*leaf.value()),
            ParserToken::RowReference(leaf) => rows.push(*leaf.value()),
            other => {
                if let Some(parent) = other.parent() {
                    collect_coordinates(parent.children(), columns, rows);
                }
            }
        }
    }
}

impl From<CellToken> for ParentToken {
    fn from(token: CellToken) -> Self {
        token.parent
    }
}

impl FromParent for CellToken {
    fn from_parent(_kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        CellToken::new(parent)
    }
}

/// A function call: a leading function-name child followed by parameters, parentheses,
/// separators and whitespace.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "ParentToken")]
pub struct FunctionToken {
    parent: ParentToken,
    name: usize,
}

impl FunctionToken {
    pub(crate) fn new(parent: ParentToken) -> Result<Self, TokenError> {
        let name = parent
            .children
            .iter()
            .position(|c| !c.is_noise())
            .filter(|&i| parent.children[i].is_function_name());
        match name {
            Some(name) => Ok(Self { parent, name }),
            None => Err(TokenError::MissingFunctionName { text: parent.text }),
        }
    }

    #[inline]
    pub fn parent(&self) -> &ParentToken {
        &self.parent
    }

    pub(crate) fn with_text(&self, text: &str) -> Self {
        Self {
            parent: self.parent.with_text(text),
            ..*self
        }
    }

    pub fn name(&self) -> &str {
        match &self.parent.children[self.name] {
            ParserToken::FunctionName(leaf) => leaf.value().as_str(),
            other => other.text(),
        }
    }

    /// Significant children after the function name.
    pub fn parameters(&self) -> impl Iterator<Item = &ParserToken> + '_ {
        self.parent.children[self.name + 1..]
            .iter()
            .filter(|c| !c.is_noise())
    }
}

impl From<FunctionToken> for ParentToken {
    fn from(token: FunctionToken) -> Self {
        token.parent
    }
}

impl FromParent for FunctionToken {
    fn from_parent(_kind: TokenKind, parent: ParentToken) -> Result<Self, TokenError> {
        FunctionToken::new(parent)
    }
}
