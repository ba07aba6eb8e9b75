#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Grammar-driven parsing of spreadsheet formulas into source-preserving trees.
//!
//! The embedded grammar (see [`wiring::FORMULA_GRAMMAR`]) matches formula text into flat
//! runs of tokens per production; each run is then turned into a tree by ranking its
//! operators (`^`, then `*` `/`, then `+` `-`, then comparisons and `:`). Every node keeps
//! the exact text it was parsed from, whitespace included, so a tree prints back to its
//! input.
//!
//! ```
//! use formula_parser::parse_expression;
//!
//! let tree = parse_expression("1+2*3").unwrap();
//! assert!(tree.is_addition());
//! assert_eq!(tree.text(), "1+2*3");
//! ```
//!
//! Numeric literal syntax is pluggable through [`NumberParser`]; [`DecimalNumberParser`] is
//! the default. Trees can be walked with a [`ParserTokenVisitor`].

pub mod grammar;
mod error;
mod number;
mod options;
mod parser;
pub mod resolve;
pub mod token;
pub mod visitor;
pub mod wiring;

pub use error::{FormulaError, GrammarError, ParseError, Span, TokenError};
pub use number::{DecimalNumberParser, NumberParser};
pub use options::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH, EXCEL_MAX_FORMULA_CHARS};
pub use parser::{parse_expression, parse_formula, Formula, FormulaParser};
pub use token::{
    BinaryKind, BinaryToken, CellToken, FunctionToken, LeafToken, NumberValue, ParentToken,
    ParserToken, Symbol, TokenKind, UnaryKind, UnaryToken,
};
pub use visitor::{ParserTokenVisitor, ReferenceCollector, TreePrinter, Visiting};
