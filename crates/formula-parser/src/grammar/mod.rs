//! A small EBNF engine.
//!
//! Grammar text is a list of productions:
//!
//! ```text
//! (* comment *)
//! NAME = rhs ;
//! ```
//!
//! where `rhs` uses `,` for concatenation, `|` for ordered alternatives, `[ ... ]` for an
//! optional part, `{ ... }` for zero or more repetitions, `( ... )` for grouping and
//! `"..."`/`'...'` for literals. [`Grammar::compile`] binds every identifier to either a
//! production or a caller-supplied terminal and every literal to a [`Symbol`].

mod matcher;

use std::collections::HashMap;

use crate::token::Symbol;
use crate::GrammarError;

pub(crate) use matcher::{match_grammar, Actions, MatchFailure};

/// Right-hand side of a production, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Alternatives(Vec<Rule>),
    Concatenation(Vec<Rule>),
    Optional(Box<Rule>),
    Repeated(Box<Rule>),
    Literal(String),
    Identifier(String),
}

impl Rule {
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Rule)) {
        f(self);
        match self {
            Rule::Alternatives(rules) | Rule::Concatenation(rules) => {
                for rule in rules {
                    rule.visit(f);
                }
            }
            Rule::Optional(rule) | Rule::Repeated(rule) => rule.visit(f),
            Rule::Literal(_) | Rule::Identifier(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub name: String,
    pub rule: Rule,
}

/// Parsed, unbound grammar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    productions: Vec<Production>,
    index: HashMap<String, usize>,
}

impl Grammar {
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut reader = Reader { text, pos: 0 };
        let mut productions = Vec::new();
        let mut index = HashMap::new();

        reader.skip_trivia()?;
        while !reader.at_end() {
            let production = reader.production()?;
            if index
                .insert(production.name.clone(), productions.len())
                .is_some()
            {
                return Err(GrammarError::DuplicateProduction(production.name));
            }
            productions.push(production);
            reader.skip_trivia()?;
        }
        Ok(Self { productions, index })
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, name: &str) -> Option<&Production> {
        self.index.get(name).map(|&i| &self.productions[i])
    }

    /// Binds identifiers and literals. Identifiers naming a production refer to it; any
    /// other identifier must be accepted by `terminal`.
    pub fn compile<T: Copy>(
        &self,
        entry: &str,
        terminal: impl Fn(&str) -> Option<T>,
    ) -> Result<CompiledGrammar<T>, GrammarError> {
        let entry = *self
            .index
            .get(entry)
            .ok_or_else(|| GrammarError::MissingEntryPoint(entry.to_string()))?;

        // Report the first unresolvable name in source order.
        for production in &self.productions {
            let mut error = None;
            production.rule.visit(&mut |rule| {
                if error.is_some() {
                    return;
                }
                match rule {
                    Rule::Identifier(name)
                        if !self.index.contains_key(name) && terminal(name.as_str()).is_none() =>
                    {
                        error = Some(GrammarError::UnknownIdentifier {
                            production: production.name.clone(),
                            identifier: name.clone(),
                        });
                    }
                    Rule::Literal(literal) if Symbol::from_text(literal).is_none() => {
                        error = Some(GrammarError::UnknownSymbol {
                            production: production.name.clone(),
                            literal: literal.clone(),
                        });
                    }
                    _ => {}
                }
            });
            if let Some(error) = error {
                return Err(error);
            }
        }

        let productions = self
            .productions
            .iter()
            .map(|p| CompiledProduction {
                name: p.name.clone(),
                node: self.bind(&p.rule, &terminal),
            })
            .collect();
        Ok(CompiledGrammar { productions, entry })
    }

    fn bind<T: Copy>(&self, rule: &Rule, terminal: &impl Fn(&str) -> Option<T>) -> Node<T> {
        match rule {
            Rule::Alternatives(rules) => {
                Node::Alternatives(rules.iter().map(|r| self.bind(r, terminal)).collect())
            }
            Rule::Concatenation(rules) => {
                Node::Concatenation(rules.iter().map(|r| self.bind(r, terminal)).collect())
            }
            Rule::Optional(rule) => Node::Optional(Box::new(self.bind(rule, terminal))),
            Rule::Repeated(rule) => Node::Repeated(Box::new(self.bind(rule, terminal))),
            // Both lookups were checked by `compile`.
            Rule::Literal(literal) => Symbol::from_text(literal)
                .map(Node::Symbol)
                .unwrap_or(Node::Concatenation(Vec::new())),
            Rule::Identifier(name) => match self.index.get(name) {
                Some(&index) => Node::Production(index),
                None => terminal(name.as_str())
                    .map(Node::Terminal)
                    .unwrap_or(Node::Concatenation(Vec::new())),
            },
        }
    }
}

/// A grammar whose names are all resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGrammar<T> {
    productions: Vec<CompiledProduction<T>>,
    entry: usize,
}

impl<T> CompiledGrammar<T> {
    pub fn entry(&self) -> &str {
        &self.productions[self.entry].name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledProduction<T> {
    name: String,
    node: Node<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node<T> {
    Alternatives(Vec<Node<T>>),
    Concatenation(Vec<Node<T>>),
    Optional(Box<Node<T>>),
    Repeated(Box<Node<T>>),
    Symbol(Symbol),
    Terminal(T),
    Production(usize),
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::Syntax {
            message: message.into(),
            offset: self.pos,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), GrammarError> {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.text.len() - trimmed.len();
            if !trimmed.starts_with("(*") {
                return Ok(());
            }
            match trimmed[2..].find("*)") {
                Some(end) => self.pos += 2 + end + 2,
                None => return Err(self.error("unterminated comment")),
            }
        }
    }

    fn eat(&mut self, expected: char) -> Result<bool, GrammarError> {
        self.skip_trivia()?;
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), GrammarError> {
        if self.eat(expected)? {
            Ok(())
        } else {
            Err(self.error(format!("expected `{expected}`")))
        }
    }

    fn identifier(&mut self) -> Result<Option<String>, GrammarError> {
        self.skip_trivia()?;
        let rest = self.rest();
        let starts = rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts {
            return Ok(None);
        }
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        Ok(Some(rest[..len].to_string()))
    }

    fn production(&mut self) -> Result<Production, GrammarError> {
        let Some(name) = self.identifier()? else {
            return Err(self.error("expected a production name"));
        };
        self.expect('=')?;
        let rule = self.alternatives()?;
        self.expect(';')?;
        Ok(Production { name, rule })
    }

    fn alternatives(&mut self) -> Result<Rule, GrammarError> {
        let mut rules = vec![self.concatenation()?];
        while self.eat('|')? {
            rules.push(self.concatenation()?);
        }
        Ok(if rules.len() == 1 {
            rules.remove(0)
        } else {
            Rule::Alternatives(rules)
        })
    }

    fn concatenation(&mut self) -> Result<Rule, GrammarError> {
        let mut rules = vec![self.factor()?];
        while self.eat(',')? {
            rules.push(self.factor()?);
        }
        Ok(if rules.len() == 1 {
            rules.remove(0)
        } else {
            Rule::Concatenation(rules)
        })
    }

    fn factor(&mut self) -> Result<Rule, GrammarError> {
        if let Some(name) = self.identifier()? {
            return Ok(Rule::Identifier(name));
        }
        if self.eat('[')? {
            let rule = self.alternatives()?;
            self.expect(']')?;
            return Ok(Rule::Optional(Box::new(rule)));
        }
        if self.eat('{')? {
            let rule = self.alternatives()?;
            self.expect('}')?;
            return Ok(Rule::Repeated(Box::new(rule)));
        }
        if self.eat('(')? {
            let rule = self.alternatives()?;
            self.expect(')')?;
            return Ok(rule);
        }
        for quote in ['"', '\''] {
            if self.eat(quote)? {
                let rest = self.rest();
                let Some(end) = rest.find(quote) else {
                    return Err(self.error("unterminated literal"));
                };
                if end == 0 {
                    return Err(self.error("empty literal"));
                }
                self.pos += end + 1;
                return Ok(Rule::Literal(rest[..end].to_string()));
            }
        }
        Err(self.error("expected an identifier, literal or group"))
    }
}
