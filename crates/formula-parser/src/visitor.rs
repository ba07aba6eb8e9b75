//! Double-dispatch traversal over the parse tree.
//!
//! [`ParserToken::accept`] calls, in order: [`ParserTokenVisitor::start_visit`], the typed
//! `start_visit_*` hook, the children left to right, the typed `end_visit_*` hook and
//! finally [`ParserTokenVisitor::end_visit`]. Leaves get one typed `visit_*` call between the
//! generic hooks. Returning [`Visiting::Skip`] from either start hook skips the children;
//! end hooks still run.

use formula_model::{
    CellReference, ColumnReference, ExpressionReference, LabelName, RangeReference, RowReference,
};

use crate::token::{
    BinaryToken, CellToken, FunctionToken, LeafToken, NumberValue, ParentToken, ParserToken,
    Symbol, UnaryToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visiting {
    Continue,
    Skip,
}

macro_rules! parent_hooks {
    ($($start:ident, $end:ident, $ty:ty;)*) => {
        $(
            fn $start(&mut self, _token: &$ty) -> Visiting {
                Visiting::Continue
            }

            fn $end(&mut self, _token: &$ty) {}
        )*
    };
}

/// Callbacks for every node variant. Every hook defaults to a no-op that continues.
#[allow(unused_variables)]
pub trait ParserTokenVisitor {
    fn start_visit(&mut self, token: &ParserToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit(&mut self, token: &ParserToken) {}

    parent_hooks! {
        start_visit_addition, end_visit_addition, BinaryToken;
        start_visit_subtraction, end_visit_subtraction, BinaryToken;
        start_visit_multiplication, end_visit_multiplication, BinaryToken;
        start_visit_division, end_visit_division, BinaryToken;
        start_visit_power, end_visit_power, BinaryToken;
        start_visit_range, end_visit_range, BinaryToken;
        start_visit_equals, end_visit_equals, BinaryToken;
        start_visit_not_equals, end_visit_not_equals, BinaryToken;
        start_visit_greater_than, end_visit_greater_than, BinaryToken;
        start_visit_greater_than_equals, end_visit_greater_than_equals, BinaryToken;
        start_visit_less_than, end_visit_less_than, BinaryToken;
        start_visit_less_than_equals, end_visit_less_than_equals, BinaryToken;
        start_visit_negative, end_visit_negative, UnaryToken;
        start_visit_percentage, end_visit_percentage, UnaryToken;
        start_visit_group, end_visit_group, ParentToken;
        start_visit_function, end_visit_function, FunctionToken;
        start_visit_cell, end_visit_cell, CellToken;
        start_visit_expression, end_visit_expression, ParentToken;
    }

    fn visit_column(&mut self, token: &LeafToken<ColumnReference>) {}

    fn visit_row(&mut self, token: &LeafToken<RowReference>) {}

    fn visit_label(&mut self, token: &LeafToken<LabelName>) {}

    fn visit_function_name(&mut self, token: &LeafToken<String>) {}

    fn visit_number(&mut self, token: &LeafToken<NumberValue>) {}

    fn visit_text(&mut self, token: &LeafToken<String>) {}

    fn visit_whitespace(&mut self, token: &LeafToken<String>) {}

    /// Called for every symbol leaf; match on the value to tell them apart.
    fn visit_symbol(&mut self, token: &LeafToken<Symbol>) {}

    /// Walks `token` and everything beneath it.
    fn accept(&mut self, token: &ParserToken)
    where
        Self: Sized,
    {
        token.accept(self);
    }
}

impl ParserToken {
    pub fn accept<V: ParserTokenVisitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.start_visit(self) == Visiting::Skip {
            visitor.end_visit(self);
            return;
        }

        macro_rules! parent {
            ($token:expr, $start:ident, $end:ident) => {{
                if visitor.$start($token) == Visiting::Continue {
                    for child in self.children() {
                        child.accept(visitor);
                    }
                }
                visitor.$end($token);
            }};
        }

        match self {
            ParserToken::Addition(t) => parent!(t, start_visit_addition, end_visit_addition),
            ParserToken::Subtraction(t) => {
                parent!(t, start_visit_subtraction, end_visit_subtraction)
            }
            ParserToken::Multiplication(t) => {
                parent!(t, start_visit_multiplication, end_visit_multiplication)
            }
            ParserToken::Division(t) => parent!(t, start_visit_division, end_visit_division),
            ParserToken::Power(t) => parent!(t, start_visit_power, end_visit_power),
            ParserToken::Range(t) => parent!(t, start_visit_range, end_visit_range),
            ParserToken::Equals(t) => parent!(t, start_visit_equals, end_visit_equals),
            ParserToken::NotEquals(t) => parent!(t, start_visit_not_equals, end_visit_not_equals),
            ParserToken::GreaterThan(t) => {
                parent!(t, start_visit_greater_than, end_visit_greater_than)
            }
            ParserToken::GreaterThanEquals(t) => {
                parent!(t, start_visit_greater_than_equals, end_visit_greater_than_equals)
            }
            ParserToken::LessThan(t) => parent!(t, start_visit_less_than, end_visit_less_than),
            ParserToken::LessThanEquals(t) => {
                parent!(t, start_visit_less_than_equals, end_visit_less_than_equals)
            }
            ParserToken::Negative(t) => parent!(t, start_visit_negative, end_visit_negative),
            ParserToken::Percentage(t) => parent!(t, start_visit_percentage, end_visit_percentage),
            ParserToken::Group(t) => parent!(t, start_visit_group, end_visit_group),
            ParserToken::Function(t) => parent!(t, start_visit_function, end_visit_function),
            ParserToken::Cell(t) => parent!(t, start_visit_cell, end_visit_cell),
            ParserToken::Expression(t) => parent!(t, start_visit_expression, end_visit_expression),
            ParserToken::ColumnReference(leaf) => visitor.visit_column(leaf),
            ParserToken::RowReference(leaf) => visitor.visit_row(leaf),
            ParserToken::Label(leaf) => visitor.visit_label(leaf),
            ParserToken::FunctionName(leaf) => visitor.visit_function_name(leaf),
            ParserToken::Number(leaf) => visitor.visit_number(leaf),
            ParserToken::Text(leaf) => visitor.visit_text(leaf),
            ParserToken::Whitespace(leaf) => visitor.visit_whitespace(leaf),
            ParserToken::Symbol(leaf) => visitor.visit_symbol(leaf),
        }

        visitor.end_visit(self);
    }
}

/// Gathers every reference a tree mentions, in source order.
///
/// Ranges whose endpoints are both cells are also reported as [`RangeReference`]s; their
/// endpoints still appear in [`ReferenceCollector::references`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReferenceCollector {
    references: Vec<ExpressionReference>,
    ranges: Vec<RangeReference>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(token: &ParserToken) -> Self {
        let mut collector = Self::new();
        token.accept(&mut collector);
        collector
    }

    pub fn references(&self) -> &[ExpressionReference] {
        &self.references
    }

    pub fn ranges(&self) -> &[RangeReference] {
        &self.ranges
    }

    pub fn cells(&self) -> impl Iterator<Item = CellReference> + '_ {
        self.references.iter().filter_map(ExpressionReference::as_cell)
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelName> + '_ {
        self.references.iter().filter_map(ExpressionReference::as_label)
    }
}

impl ParserTokenVisitor for ReferenceCollector {
    fn start_visit_range(&mut self, token: &BinaryToken) -> Visiting {
        if let (ParserToken::Cell(begin), ParserToken::Cell(end)) = (token.left(), token.right()) {
            self.ranges
                .push(RangeReference::new(begin.reference(), end.reference()));
        }
        Visiting::Continue
    }

    fn start_visit_cell(&mut self, token: &CellToken) -> Visiting {
        self.references.push(token.reference().into());
        Visiting::Skip
    }

    fn visit_label(&mut self, token: &LeafToken<LabelName>) {
        self.references.push(token.value().clone().into());
    }
}

/// Renders a tree as one line per node, indented by depth: `kind "text"`.
#[derive(Debug, Default, Clone)]
pub struct TreePrinter {
    depth: usize,
    output: String,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(token: &ParserToken) -> String {
        let mut printer = Self::new();
        token.accept(&mut printer);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.output
    }
}

impl ParserTokenVisitor for TreePrinter {
    fn start_visit(&mut self, token: &ParserToken) -> Visiting {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
        self.output
            .push_str(&format!("{} {:?}\n", token.kind(), token.text()));
        self.depth += 1;
        Visiting::Continue
    }

    fn end_visit(&mut self, _token: &ParserToken) {
        self.depth -= 1;
    }
}
