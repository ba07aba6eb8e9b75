//! Binds the embedded formula grammar to terminal matchers and node builders.

use std::sync::OnceLock;

use formula_model::{ColumnReference, LabelName, RowReference};

use crate::grammar::{Actions, CompiledGrammar, Grammar};
use crate::resolve::{resolve, Resolved};
use crate::token::ParserToken;
use crate::{GrammarError, NumberParser, TokenError};

/// The grammar every [`crate::FormulaParser`] uses unless given another.
pub const FORMULA_GRAMMAR: &str = include_str!("formula.grammar");

/// Production a formula must match.
pub const ENTRY_POINT: &str = "EXPRESSION";

const CELL: &str = "CELL";

/// Productions counted against [`crate::ParseOptions::max_nesting_depth`].
const NESTING_PRODUCTIONS: [&str; 3] = ["FUNCTION", "GROUP", "NEGATIVE"];

/// Grammar identifiers matched directly against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Whitespace,
    Number,
    FunctionName,
    LabelName,
    Column,
    Row,
    Text,
}

impl Terminal {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "WHITESPACE" => Terminal::Whitespace,
            "NUMBER" => Terminal::Number,
            "FUNCTION_NAME" => Terminal::FunctionName,
            "LABEL_NAME" => Terminal::LabelName,
            "COLUMN" => Terminal::Column,
            "ROW" => Terminal::Row,
            "TEXT" => Terminal::Text,
            _ => return None,
        })
    }
}

pub(crate) fn compile_grammar(text: &str) -> Result<CompiledGrammar<Terminal>, GrammarError> {
    Grammar::parse(text)?.compile(ENTRY_POINT, Terminal::from_name)
}

/// The embedded grammar, compiled on first use.
pub(crate) fn formula_grammar() -> Result<&'static CompiledGrammar<Terminal>, GrammarError> {
    static GRAMMAR: OnceLock<Result<CompiledGrammar<Terminal>, GrammarError>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| {
            let compiled = compile_grammar(FORMULA_GRAMMAR);
            match &compiled {
                Ok(_) => log::debug!("loaded formula grammar ({} bytes)", FORMULA_GRAMMAR.len()),
                Err(err) => log::error!("formula grammar failed to load: {err}"),
            }
            compiled
        })
        .as_ref()
        .map_err(Clone::clone)
}

pub(crate) struct FormulaActions<'a, N: ?Sized> {
    pub numbers: &'a N,
}

impl<N: NumberParser + ?Sized> Actions<Terminal> for FormulaActions<'_, N> {
    fn terminal(&self, terminal: Terminal, rest: &str) -> Option<(ParserToken, usize)> {
        match terminal {
            Terminal::Whitespace => whitespace(rest),
            Terminal::Number => {
                let (value, len) = self.numbers.parse_number(rest)?;
                let text = rest.get(..len)?;
                Some((ParserToken::number(value, text), len))
            }
            Terminal::FunctionName => function_name(rest),
            Terminal::LabelName => label_name(rest),
            Terminal::Column => column(rest),
            Terminal::Row => row(rest),
            Terminal::Text => text_literal(rest),
        }
    }

    fn nests(&self, production: &str) -> bool {
        NESTING_PRODUCTIONS.contains(&production)
    }

    fn reduce(
        &self,
        production: &str,
        tokens: Vec<ParserToken>,
        text: &str,
    ) -> Result<Resolved, TokenError> {
        // Operator-only runs such as a lone `-` have nothing to build.
        if tokens.iter().all(ParserToken::is_noise) {
            return Ok(Resolved::Sequence(tokens));
        }
        if production == CELL {
            return ParserToken::cell(tokens, text).map(Resolved::Token);
        }
        resolve(tokens, text)
    }
}

fn prefix_len(rest: &str, accept: impl Fn(char) -> bool) -> usize {
    rest.find(|c: char| !accept(c)).unwrap_or(rest.len())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn whitespace(rest: &str) -> Option<(ParserToken, usize)> {
    let len = prefix_len(rest, |c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    (len > 0).then(|| (ParserToken::whitespace(&rest[..len]), len))
}

/// `[A-Za-z][A-Za-z0-9_.]*`
fn function_name(rest: &str) -> Option<(ParserToken, usize)> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let len = prefix_len(rest, |c| is_word_char(c) || c == '.');
    let name = &rest[..len];
    Some((ParserToken::function_name(name, name), len))
}

fn label_name(rest: &str) -> Option<(ParserToken, usize)> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let len = prefix_len(rest, is_word_char);
    let label = LabelName::with(&rest[..len]).ok()?;
    Some((ParserToken::label(label, &rest[..len]), len))
}

/// Splits an optional `$` plus a run of characters accepted by `accept`.
fn prefixed_run(rest: &str, accept: impl Fn(char) -> bool) -> Option<usize> {
    let start = usize::from(rest.starts_with('$'));
    let len = prefix_len(&rest[start..], accept);
    (len > 0).then_some(start + len)
}

fn column(rest: &str) -> Option<(ParserToken, usize)> {
    let len = prefixed_run(rest, |c| c.is_ascii_alphabetic())?;
    let value = ColumnReference::parse(&rest[..len]).ok()?;
    Some((ParserToken::column(value, &rest[..len]), len))
}

/// Digits that are not the start of a longer name, so `A1B` is not a cell.
fn row(rest: &str) -> Option<(ParserToken, usize)> {
    let len = prefixed_run(rest, |c| c.is_ascii_digit())?;
    if rest[len..].starts_with(is_word_char) {
        return None;
    }
    let value = RowReference::parse(&rest[..len]).ok()?;
    Some((ParserToken::row(value, &rest[..len]), len))
}

/// `"..."` with `""` standing for one quote.
fn text_literal(rest: &str) -> Option<(ParserToken, usize)> {
    let body = rest.strip_prefix('"')?;
    let mut value = String::new();
    let mut offset = 0;
    loop {
        let quote = body[offset..].find('"')? + offset;
        value.push_str(&body[offset..quote]);
        if body[quote + 1..].starts_with('"') {
            value.push('"');
            offset = quote + 2;
        } else {
            let len = 1 + quote + 1;
            return Some((ParserToken::text_literal(value, &rest[..len]), len));
        }
    }
}
