use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::grammar::{match_grammar, CompiledGrammar, MatchFailure};
use crate::token::ParserToken;
use crate::wiring::{compile_grammar, formula_grammar, FormulaActions, Terminal};
use crate::{
    DecimalNumberParser, FormulaError, GrammarError, NumberParser, ParseError, ParseOptions, Span,
};

/// A parsed formula: the expression tree plus whether the text began with `=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub has_equals: bool,
    pub expression: ParserToken,
}

impl Formula {
    /// The formula text, including the leading `=` when there was one.
    pub fn to_text(&self) -> String {
        if self.has_equals {
            format!("={}", self.expression.text())
        } else {
            self.expression.text().to_string()
        }
    }
}

/// Parses formula text into [`ParserToken`] trees.
///
/// The parser is immutable after construction and every parse is independent, so one
/// instance can be shared freely.
#[derive(Debug, Clone)]
pub struct FormulaParser<N = DecimalNumberParser> {
    grammar: Cow<'static, CompiledGrammar<Terminal>>,
    numbers: N,
    options: ParseOptions,
}

impl<N: NumberParser> FormulaParser<N> {
    /// A parser over the embedded formula grammar.
    pub fn new(numbers: N, options: ParseOptions) -> Result<Self, GrammarError> {
        Ok(Self {
            grammar: Cow::Borrowed(formula_grammar()?),
            numbers,
            options,
        })
    }

    /// A parser over a caller-supplied grammar. The grammar must define `EXPRESSION` and may
    /// use the terminals and symbols of the embedded one.
    pub fn with_grammar(
        grammar: &str,
        numbers: N,
        options: ParseOptions,
    ) -> Result<Self, GrammarError> {
        Ok(Self {
            grammar: Cow::Owned(compile_grammar(grammar)?),
            numbers,
            options,
        })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn number_parser(&self) -> &N {
        &self.numbers
    }

    /// Parses `text` as a bare expression (no leading `=`).
    pub fn parse_expression(&self, text: &str) -> Result<ParserToken, ParseError> {
        let char_len = text.chars().count();
        if char_len > self.options.max_formula_chars {
            return Err(ParseError::new(
                format!(
                    "Formula exceeds the {}-character limit (got {char_len})",
                    self.options.max_formula_chars
                ),
                Span::new(0, text.len()),
                text,
            ));
        }

        let actions = FormulaActions {
            numbers: &self.numbers,
        };
        let matched = match match_grammar(
            &*self.grammar,
            &actions,
            text,
            self.options.max_nesting_depth,
        ) {
            Ok(matched) => matched,
            Err(MatchFailure::NoMatch { furthest, too_deep }) => {
                return Err(self.unexpected(text, furthest, too_deep));
            }
            Err(MatchFailure::Token { error, span }) => {
                return Err(ParseError::from_token(error, span, &text[span.start..]));
            }
        };

        if matched.end < text.len() {
            return Err(self.unexpected(text, matched.furthest, matched.too_deep));
        }

        let mut tokens = matched.tokens;
        if tokens.len() == 1 {
            if let Some(token) = tokens.pop() {
                return Ok(token);
            }
        }
        ParserToken::expression(tokens, text)
            .map_err(|error| ParseError::from_token(error, Span::new(0, text.len()), text))
    }

    /// Parses a cell formula, which may start with `=` when the options allow it.
    pub fn parse_formula(&self, text: &str) -> Result<Formula, ParseError> {
        let (has_equals, expression) = match text.strip_prefix('=') {
            Some(rest) if self.options.allow_leading_equals => (true, rest),
            _ => (false, text),
        };
        let offset = text.len() - expression.len();
        let expression = self
            .parse_expression(expression)
            .map_err(|e| e.add_offset(offset))?;
        Ok(Formula {
            has_equals,
            expression,
        })
    }

    fn unexpected(&self, text: &str, at: usize, too_deep: bool) -> ParseError {
        let at = at.min(text.len());
        let remaining = &text[at..];
        let span = Span::new(at, at + remaining.chars().next().map_or(0, char::len_utf8));
        let message = if too_deep {
            format!(
                "Expression nesting exceeds the {}-level limit",
                self.options.max_nesting_depth
            )
        } else {
            match remaining.chars().next() {
                Some(c) => format!("Unexpected {c:?}"),
                None => "Unexpected end of formula".to_string(),
            }
        };
        ParseError::new(message, span, remaining)
    }
}

/// Parses an expression with the default grammar, number syntax and options.
pub fn parse_expression(text: &str) -> Result<ParserToken, FormulaError> {
    let parser = FormulaParser::new(DecimalNumberParser::default(), ParseOptions::default())?;
    Ok(parser.parse_expression(text)?)
}

/// Parses a cell formula with the default grammar and number syntax.
pub fn parse_formula(text: &str, options: ParseOptions) -> Result<Formula, FormulaError> {
    let parser = FormulaParser::new(DecimalNumberParser::default(), options)?;
    Ok(parser.parse_formula(text)?)
}
