use super::{CompiledGrammar, Node};
use crate::resolve::Resolved;
use crate::token::ParserToken;
use crate::{Span, TokenError};

/// What a compiled grammar does when it matches terminals and productions.
pub(crate) trait Actions<T> {
    /// Matches `terminal` at the start of `rest`, returning the token and its byte length.
    fn terminal(&self, terminal: T, rest: &str) -> Option<(ParserToken, usize)>;

    /// Whether entering `production` adds a nesting level.
    fn nests(&self, production: &str) -> bool;

    /// Turns the flat token run matched by `production` into a tree.
    fn reduce(
        &self,
        production: &str,
        tokens: Vec<ParserToken>,
        text: &str,
    ) -> Result<Resolved, TokenError>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Matched {
    pub tokens: Vec<ParserToken>,
    pub end: usize,
    /// Furthest offset any alternative got to before failing.
    pub furthest: usize,
    /// The furthest failure was caused by the nesting limit.
    pub too_deep: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MatchFailure {
    NoMatch {
        furthest: usize,
        /// The furthest failure was caused by the nesting limit.
        too_deep: bool,
    },
    Token {
        error: TokenError,
        span: Span,
    },
}

/// Matches the entry production against a prefix of `input`.
pub(crate) fn match_grammar<T: Copy, A: Actions<T> + ?Sized>(
    grammar: &CompiledGrammar<T>,
    actions: &A,
    input: &str,
    max_depth: usize,
) -> Result<Matched, MatchFailure> {
    let mut matcher = Matcher {
        grammar,
        actions,
        input,
        max_depth,
        depth: 0,
        furthest: 0,
        cut: None,
    };
    let mut tokens = Vec::new();
    match matcher.production(grammar.entry, 0, &mut tokens) {
        Ok(Some(end)) => {
            let furthest = matcher.furthest.max(end);
            Ok(Matched {
                tokens,
                end,
                furthest,
                too_deep: matcher.cut == Some(furthest),
            })
        }
        Ok(None) => Err(MatchFailure::NoMatch {
            furthest: matcher.furthest,
            too_deep: matcher.cut == Some(matcher.furthest),
        }),
        Err((error, span)) => Err(MatchFailure::Token { error, span }),
    }
}

/// `Ok(None)` means no match and leaves `out` untouched; `Err` aborts the whole match.
type Step = Result<Option<usize>, (TokenError, Span)>;

struct Matcher<'a, T, A: ?Sized> {
    grammar: &'a CompiledGrammar<T>,
    actions: &'a A,
    input: &'a str,
    max_depth: usize,
    depth: usize,
    furthest: usize,
    /// Furthest offset at which a nesting production was refused.
    cut: Option<usize>,
}

impl<T: Copy, A: Actions<T> + ?Sized> Matcher<'_, T, A> {
    fn miss(&mut self, pos: usize) -> Step {
        self.furthest = self.furthest.max(pos);
        Ok(None)
    }

    fn node(&mut self, node: &Node<T>, pos: usize, out: &mut Vec<ParserToken>) -> Step {
        match node {
            Node::Concatenation(nodes) => {
                let mark = out.len();
                let mut at = pos;
                for node in nodes {
                    match self.node(node, at, out)? {
                        Some(end) => at = end,
                        None => {
                            out.truncate(mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(at))
            }
            Node::Alternatives(nodes) => {
                for node in nodes {
                    if let Some(end) = self.node(node, pos, out)? {
                        return Ok(Some(end));
                    }
                }
                Ok(None)
            }
            Node::Optional(node) => Ok(Some(self.node(node, pos, out)?.unwrap_or(pos))),
            Node::Repeated(node) => {
                let mut at = pos;
                loop {
                    let mark = out.len();
                    match self.node(node, at, out)? {
                        Some(end) if end > at => at = end,
                        // A repetition that consumes nothing would never stop.
                        _ => {
                            out.truncate(mark);
                            return Ok(Some(at));
                        }
                    }
                }
            }
            Node::Symbol(symbol) => {
                let text = symbol.as_str();
                if self.input[pos..].starts_with(text) {
                    out.push(ParserToken::symbol(*symbol, text));
                    Ok(Some(pos + text.len()))
                } else {
                    self.miss(pos)
                }
            }
            Node::Terminal(terminal) => match self.actions.terminal(*terminal, &self.input[pos..]) {
                Some((token, len)) if len > 0 => {
                    out.push(token);
                    Ok(Some(pos + len))
                }
                _ => self.miss(pos),
            },
            Node::Production(index) => self.production(*index, pos, out),
        }
    }

    fn production(&mut self, index: usize, pos: usize, out: &mut Vec<ParserToken>) -> Step {
        let grammar = self.grammar;
        let production = &grammar.productions[index];
        let nests = self.actions.nests(&production.name);
        if nests {
            if self.depth >= self.max_depth {
                self.cut = Some(self.cut.map_or(pos, |cut| cut.max(pos)));
                return self.miss(pos);
            }
            self.depth += 1;
        }
        let mut tokens = Vec::new();
        let matched = self.node(&production.node, pos, &mut tokens);
        if nests {
            self.depth -= 1;
        }
        let Some(end) = matched? else {
            return Ok(None);
        };
        if tokens.is_empty() {
            return Ok(Some(end));
        }

        let text = &self.input[pos..end];
        match self.actions.reduce(&production.name, tokens, text) {
            Ok(Resolved::Token(token)) => out.push(token),
            Ok(Resolved::Sequence(tokens)) => out.extend(tokens),
            Err(error) => return Err((error, Span::new(pos, end))),
        }
        Ok(Some(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::resolve::resolve;
    use crate::token::{NumberValue, Symbol};

    #[derive(Clone, Copy)]
    struct Digit;

    struct Arithmetic;

    impl Actions<Digit> for Arithmetic {
        fn terminal(&self, _terminal: Digit, rest: &str) -> Option<(ParserToken, usize)> {
            let c = rest.chars().next().filter(char::is_ascii_digit)?;
            let value = NumberValue::Integer(i64::from(c.to_digit(10)?));
            Some((ParserToken::number(value, &rest[..1]), 1))
        }

        fn nests(&self, production: &str) -> bool {
            production == "GROUP"
        }

        fn reduce(
            &self,
            _production: &str,
            tokens: Vec<ParserToken>,
            text: &str,
        ) -> Result<Resolved, TokenError> {
            resolve(tokens, text)
        }
    }

    fn grammar() -> CompiledGrammar<Digit> {
        Grammar::parse(
            r#"
            SUM = TERM, { OPERATOR, TERM } ;
            OPERATOR = "+" | "*" ;
            TERM = GROUP | DIGIT ;
            GROUP = "(", SUM, ")" ;
            "#,
        )
        .and_then(|g| g.compile("SUM", |name| (name == "DIGIT").then_some(Digit)))
        .unwrap()
    }

    #[test]
    fn matches_and_reduces_productions() {
        let matched = match_grammar(&grammar(), &Arithmetic, "1+2*3", 8).unwrap();
        assert_eq!(matched.end, 5);
        assert_eq!(matched.tokens.len(), 1);
        let tree = &matched.tokens[0];
        assert!(tree.is_addition());
        assert!(tree.as_binary().unwrap().1.right().is_multiplication());
    }

    #[test]
    fn stops_at_the_longest_prefix() {
        let matched = match_grammar(&grammar(), &Arithmetic, "1+2)", 8).unwrap();
        assert_eq!(matched.end, 3);
        assert_eq!(matched.furthest, 3);
        assert!(!matched.too_deep);
    }

    #[test]
    fn reports_furthest_failure() {
        let failure = match_grammar(&grammar(), &Arithmetic, "(1+", 8).unwrap_err();
        assert_eq!(
            failure,
            MatchFailure::NoMatch {
                furthest: 3,
                too_deep: false
            }
        );
    }

    #[test]
    fn nesting_limit_is_a_soft_failure() {
        let matched = match_grammar(&grammar(), &Arithmetic, "((1))", 2).unwrap();
        assert!(matched.tokens[0].is_group());

        let failure = match_grammar(&grammar(), &Arithmetic, "(((1)))", 2).unwrap_err();
        assert!(matches!(failure, MatchFailure::NoMatch { too_deep: true, .. }));

        // Cut off at offset 2, but the input is wrong further on.
        let failure = match_grammar(&grammar(), &Arithmetic, "((1)+", 2).unwrap_err();
        assert!(matches!(failure, MatchFailure::NoMatch { too_deep: false, .. }));
    }

    #[test]
    fn symbols_become_leaves() {
        let matched = match_grammar(&grammar(), &Arithmetic, "(2)", 8).unwrap();
        let group = &matched.tokens[0];
        assert!(group.children()[0].is_symbol_of(Symbol::ParenthesisOpen));
        assert!(group.children()[2].is_symbol_of(Symbol::ParenthesisClose));
    }
}
