use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::{Symbol, TokenKind};

/// Byte range into the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn add_offset(self, delta: usize) -> Self {
        Self {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node could not be built from the children it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("{kind} requires at least one child: {text:?}")]
    EmptyChildren { kind: TokenKind, text: String },
    #[error("cell is missing a column: {text:?}")]
    MissingColumn { text: String },
    #[error("cell is missing a row: {text:?}")]
    MissingRow { text: String },
    #[error("cell has more than one column: {text:?}")]
    DuplicateColumn { text: String },
    #[error("cell has more than one row: {text:?}")]
    DuplicateRow { text: String },
    #[error("function is missing its name: {text:?}")]
    MissingFunctionName { text: String },
    #[error("{kind} is missing an operand: {text:?}")]
    MissingOperand { kind: TokenKind, text: String },
    #[error("{kind} expects exactly one parameter, found {found}: {text:?}")]
    WrongParameterCount {
        kind: TokenKind,
        found: usize,
        text: String,
    },
    #[error("symbol `{symbol}` is not a binary operator: {text:?}")]
    NotBinaryOperator { symbol: Symbol, text: String },
}

impl TokenError {
    /// The source text of the node that failed to build.
    pub fn text(&self) -> &str {
        match self {
            TokenError::EmptyChildren { text, .. }
            | TokenError::MissingColumn { text }
            | TokenError::MissingRow { text }
            | TokenError::DuplicateColumn { text }
            | TokenError::DuplicateRow { text }
            | TokenError::MissingFunctionName { text }
            | TokenError::MissingOperand { text, .. }
            | TokenError::WrongParameterCount { text, .. }
            | TokenError::NotBinaryOperator { text, .. } => text,
        }
    }
}

/// The grammar text could not be loaded or bound to terminals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar syntax error: {message} (at offset {offset})")]
    Syntax { message: String, offset: usize },
    #[error("production `{0}` is defined more than once")]
    DuplicateProduction(String),
    #[error("production `{production}` refers to unknown identifier `{identifier}`")]
    UnknownIdentifier {
        production: String,
        identifier: String,
    },
    #[error("production `{production}` uses unknown symbol {literal:?}")]
    UnknownSymbol { production: String, literal: String },
    #[error("grammar has no `{0}` production")]
    MissingEntryPoint(String),
}

/// The input did not match the formula grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// Input left unconsumed at the point of failure.
    pub remaining: String,
    pub source: Option<TokenError>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (at {}..{})",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span, remaining: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            remaining: remaining.into(),
            source: None,
        }
    }

    /// A node built by the grammar rejected its children.
    #[must_use]
    pub fn from_token(error: TokenError, span: Span, remaining: impl Into<String>) -> Self {
        Self {
            message: error.to_string(),
            span,
            remaining: remaining.into(),
            source: Some(error),
        }
    }

    #[must_use]
    pub fn add_offset(self, delta: usize) -> Self {
        Self {
            span: self.span.add_offset(delta),
            ..self
        }
    }
}

/// Either failure a top-level parse call can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn parse_error_display_includes_span() {
        let err = ParseError::new("unexpected input", Span::new(2, 4), "+)");
        assert_eq!(err.to_string(), "unexpected input (at 2..4)");
        assert!(err.source().is_none());
    }

    #[test]
    fn token_error_is_exposed_as_source() {
        let token = TokenError::MissingRow {
            text: "A".to_string(),
        };
        let err = ParseError::from_token(token.clone(), Span::new(0, 1), "");
        assert_eq!(err.message, token.to_string());
        assert_eq!(err.source().map(|s| s.to_string()), Some(token.to_string()));
        assert_eq!(token.text(), "A");
    }

    #[test]
    fn offsets_saturate() {
        let span = Span::new(usize::MAX - 1, usize::MAX).add_offset(5);
        assert_eq!(span, Span::new(usize::MAX, usize::MAX));
        assert!(span.is_empty());
    }
}
