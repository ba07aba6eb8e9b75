use formula_model::LabelName;
use formula_parser::{
    parse_expression, NumberValue, ParserToken, Symbol, TokenKind, TreePrinter,
};
use pretty_assertions::assert_eq;

fn parse(text: &str) -> ParserToken {
    parse_expression(text).unwrap_or_else(|err| panic!("{text:?} failed to parse: {err}"))
}

fn number(value: i64) -> ParserToken {
    ParserToken::number(NumberValue::Integer(value), value.to_string())
}

fn operands(token: &ParserToken) -> (&ParserToken, &ParserToken) {
    let (_, binary) = token.as_binary().expect("expected a binary node");
    (binary.left(), binary.right())
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let tree = parse("1+2*3");
    assert_eq!(tree.kind(), TokenKind::Addition);
    let (left, right) = operands(&tree);
    assert_eq!(left, &number(1));
    assert!(right.is_multiplication());
    assert_eq!(right.text(), "2*3");
}

#[test]
fn minus_between_operands_is_subtraction() {
    let tree = parse("1-2");
    assert!(tree.is_subtraction(), "{}", TreePrinter::print(&tree));
    assert_eq!(
        tree.children(),
        &[number(1), ParserToken::symbol(Symbol::Minus, "-"), number(2)]
    );
}

#[test]
fn trailing_percent_is_percentage() {
    let tree = parse("50%");
    let (_, percentage) = tree.as_unary().expect("expected a unary node");
    assert!(tree.is_percentage());
    assert_eq!(percentage.parameter(), &number(50));
}

#[test]
fn function_with_range_parameter() {
    let tree = parse("SUM(A1:A10)");
    let ParserToken::Function(function) = &tree else {
        panic!("expected a function, got {}", TreePrinter::print(&tree));
    };
    assert_eq!(function.name(), "SUM");

    let parameters: Vec<&ParserToken> = function.parameters().collect();
    assert_eq!(parameters.len(), 1);
    let range = parameters[0];
    assert!(range.is_range());

    let (begin, end) = operands(range);
    let (ParserToken::Cell(begin), ParserToken::Cell(end)) = (begin, end) else {
        panic!("range endpoints should be cells");
    };
    assert_eq!(begin.reference().to_string(), "A1");
    assert_eq!(end.reference().to_string(), "A10");
}

#[test]
fn mixed_precedence_tree() {
    assert_eq!(
        TreePrinter::print(&parse("1-2*3^4%")),
        concat!(
            "subtraction \"1-2*3^4%\"\n",
            "  number \"1\"\n",
            "  symbol Minus \"-\"\n",
            "  multiplication \"2*3^4%\"\n",
            "    number \"2\"\n",
            "    symbol Multiply \"*\"\n",
            "    power \"3^4%\"\n",
            "      number \"3\"\n",
            "      symbol Power \"^\"\n",
            "      percentage \"4%\"\n",
            "        number \"4\"\n",
            "        symbol Percent \"%\"\n",
        )
    );
}

#[test]
fn negation_after_an_operator_stays_unary() {
    let tree = parse("1*-2");
    assert!(tree.is_multiplication());
    let (_, right) = operands(&tree);
    assert!(right.is_negative());
    assert_eq!(right.text(), "-2");

    let tree = parse("-1+2");
    assert!(tree.is_addition());
    let (left, right) = operands(&tree);
    assert!(left.is_negative());
    assert_eq!(right, &number(2));
}

#[test]
fn double_minus_is_subtraction_of_a_negative() {
    let tree = parse("1 - -2");
    assert!(tree.is_subtraction());
    let (left, right) = operands(&tree);
    assert_eq!(left, &number(1));
    assert!(right.is_negative());
    assert_eq!(tree.text(), "1 - -2");
}

#[test]
fn same_tier_is_left_associative() {
    let tree = parse("8/4/2");
    let (left, right) = operands(&tree);
    assert!(left.is_division());
    assert_eq!(left.text(), "8/4");
    assert_eq!(right, &number(2));
}

#[test]
fn groups_override_precedence() {
    let tree = parse("(1+2)*3");
    assert!(tree.is_multiplication());
    let (left, _) = operands(&tree);
    assert!(left.is_group());
    let inner: Vec<&ParserToken> = left.parent().unwrap().significant_children().collect();
    assert_eq!(inner.len(), 1);
    assert!(inner[0].is_addition());
}

#[test]
fn comparisons() {
    assert!(parse("A1>=B2").is_greater_than_equals());
    assert!(parse("1<>2").is_not_equals());
    assert!(parse("1<2").is_less_than());
    assert!(parse("1<=2").is_less_than_equals());
    assert!(parse("1>2").is_greater_than());

    let tree = parse("1+1=2");
    assert!(tree.is_equals());
    assert!(operands(&tree).0.is_addition());
}

#[test]
fn references_and_labels() {
    let tree = parse("$A$1+B$2");
    let (left, right) = operands(&tree);
    let (ParserToken::Cell(left), ParserToken::Cell(right)) = (left, right) else {
        panic!("expected cells");
    };
    assert_eq!(left.reference().to_string(), "$A$1");
    assert!(left.column().kind().is_absolute());
    assert_eq!(right.reference().to_string(), "B$2");

    let tree = parse("Total*2");
    let (left, _) = operands(&tree);
    assert_eq!(
        left,
        &ParserToken::label(LabelName::with("Total").unwrap(), "Total")
    );

    assert!(parse("A1B").is_label());
    assert!(parse("Revenue:Costs").is_range());
}

#[test]
fn functions_with_whitespace_and_nesting() {
    let tree = parse("ROUND( SUM(1, A1) , 0 )");
    let ParserToken::Function(round) = &tree else {
        panic!("expected a function");
    };
    assert_eq!(round.name(), "ROUND");
    let parameters: Vec<&ParserToken> = round.parameters().collect();
    assert_eq!(parameters.len(), 2);
    let ParserToken::Function(sum) = parameters[0] else {
        panic!("expected a nested function");
    };
    assert_eq!(sum.name(), "SUM");
    assert_eq!(sum.parameters().count(), 2);
    assert_eq!(parameters[1], &number(0));

    let ParserToken::Function(pi) = parse("PI()") else {
        panic!("expected a function");
    };
    assert_eq!(pi.parameters().count(), 0);
}

#[test]
fn literals() {
    assert_eq!(
        parse("1.5"),
        ParserToken::number(NumberValue::Decimal(1.5), "1.5")
    );
    let ParserToken::Text(text) = parse(r#""a""b""#) else {
        panic!("expected text");
    };
    assert_eq!(text.value(), r#"a"b"#);
    assert_eq!(text.text(), r#""a""b""#);
}

#[test]
fn surrounding_whitespace_is_kept() {
    let tree = parse(" 1 ");
    assert!(tree.is_expression());
    assert_eq!(tree.text(), " 1 ");
    assert_eq!(tree.without_symbols_or_whitespace().unwrap().children(), &[number(1)]);

    let tree = parse("1 + 2");
    assert!(tree.is_addition());
    assert_eq!(tree.children().len(), 5);
}
