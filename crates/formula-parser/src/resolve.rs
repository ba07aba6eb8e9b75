//! Turns the flat token run matched by one grammar production into a tree.
//!
//! Operators are only ranked once the whole run is known. A grammar that cannot tell a
//! unary `-` from a binary one locally may match every lone `-` as a negative; this pass
//! undoes that where the minus actually sits between two operands.

use crate::token::{ParserToken, Symbol, UnaryKind, HIGHEST_PRIORITY, LOWEST_PRIORITY};
use crate::TokenError;

/// Result of resolving one production.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Token(ParserToken),
    /// The run starts with a symbol; the enclosing production resolves it.
    Sequence(Vec<ParserToken>),
}

/// Resolves `tokens`, which together cover `text`.
pub fn resolve(tokens: Vec<ParserToken>, text: &str) -> Result<Resolved, TokenError> {
    let Some(first) = tokens.iter().find(|t| !t.is_whitespace()) else {
        return Ok(Resolved::Sequence(tokens));
    };

    if first.is_function_name() {
        return ParserToken::function(tokens, text).map(Resolved::Token);
    }
    if first.is_symbol_of(Symbol::ParenthesisOpen) {
        return ParserToken::group(tokens, text).map(Resolved::Token);
    }
    if first.is_symbol_of(Symbol::Minus) {
        return ParserToken::unary(UnaryKind::Negative, tokens, text).map(Resolved::Token);
    }
    if tokens.last().is_some_and(|t| t.is_symbol_of(Symbol::Percent)) {
        return ParserToken::unary(UnaryKind::Percentage, tokens, text).map(Resolved::Token);
    }
    if first.is_symbol() {
        return Ok(Resolved::Sequence(tokens));
    }
    prioritize(tokens, text).map(Resolved::Token)
}

/// Collapses binary operators tier by tier, highest priority first.
pub fn prioritize(tokens: Vec<ParserToken>, text: &str) -> Result<ParserToken, TokenError> {
    let mut tokens = expand_negatives(tokens);

    for priority in (LOWEST_PRIORITY + 1..=HIGHEST_PRIORITY).rev() {
        while let Some((operator, symbol)) = tokens.iter().enumerate().find_map(|(i, t)| {
            t.as_symbol()
                .filter(|s| s.priority() == priority)
                .map(|s| (i, s))
        }) {
            collapse(&mut tokens, operator, symbol)?;
        }
    }

    if tokens.len() == 1 {
        if let Some(token) = tokens.pop() {
            return Ok(token);
        }
    }
    if tokens.iter().filter(|t| !t.is_noise()).count() > 1 {
        log::warn!("token run did not reduce to a single node: {text:?}");
    }
    ParserToken::expression(tokens, text)
}

/// Replaces every negative that follows an operand with its own children, so that its
/// minus becomes a binary operator.
fn expand_negatives(tokens: Vec<ParserToken>) -> Vec<ParserToken> {
    let mut expanded = Vec::with_capacity(tokens.len());
    let mut follows_symbol = true;

    for token in tokens {
        if token.is_whitespace() {
            expanded.push(token);
            continue;
        }
        match token {
            ParserToken::Negative(negative) if !follows_symbol => {
                let children = negative.parent().children();
                follows_symbol = children
                    .iter()
                    .rev()
                    .find(|c| !c.is_whitespace())
                    .is_some_and(ParserToken::is_symbol);
                expanded.extend(children.iter().cloned());
            }
            other => {
                follows_symbol = other.is_symbol();
                expanded.push(other);
            }
        }
    }
    expanded
}

fn collapse(
    tokens: &mut Vec<ParserToken>,
    operator: usize,
    symbol: Symbol,
) -> Result<(), TokenError> {
    let kind = symbol
        .binary_kind()
        .ok_or_else(|| TokenError::NotBinaryOperator {
            symbol,
            text: tokens[operator].text().to_string(),
        })?;

    let left = tokens[..operator].iter().rposition(|t| !t.is_whitespace());
    let right = tokens[operator + 1..]
        .iter()
        .position(|t| !t.is_whitespace())
        .map(|i| operator + 1 + i);
    let (Some(left), Some(right)) = (left, right) else {
        let text: String = tokens.iter().map(ParserToken::text).collect();
        return Err(TokenError::MissingOperand {
            kind: kind.token_kind(),
            text,
        });
    };

    let children: Vec<ParserToken> = tokens.drain(left..=right).collect();
    let text: String = children.iter().map(ParserToken::text).collect();
    log::trace!("collapsed `{symbol}` into {} {text:?}", kind.token_kind());
    let binary = ParserToken::binary(kind, children, text)?;
    tokens.insert(left, binary);
    Ok(())
}
