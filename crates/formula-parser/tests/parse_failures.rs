use std::error::Error as _;

use formula_parser::{
    parse_expression, parse_formula, DecimalNumberParser, FormulaError, FormulaParser,
    GrammarError, ParseError, ParseOptions, Span, TokenError,
};
use pretty_assertions::assert_eq;

fn parse_error(text: &str) -> ParseError {
    match parse_expression(text) {
        Err(FormulaError::Parse(err)) => err,
        other => panic!("expected a parse error for {text:?}, got {other:?}"),
    }
}

fn parser_with(options: ParseOptions) -> FormulaParser {
    FormulaParser::new(DecimalNumberParser::default(), options).unwrap()
}

#[test]
fn failures_carry_the_unconsumed_input() {
    let err = parse_error("A1 B1");
    assert_eq!(err.remaining, "B1");
    assert_eq!(err.span, Span::new(3, 4));
    assert_eq!(err.message, "Unexpected 'B'");
    assert_eq!(err.to_string(), "Unexpected 'B' (at 3..4)");
}

#[test]
fn incomplete_input_fails_at_the_end() {
    for text in ["1+", "1-", "1 -", "SUM(1", "(1", "\"open", ""] {
        let err = parse_error(text);
        if text.starts_with('"') {
            // The quote itself cannot start any term.
            assert_eq!(err.remaining, text);
        } else {
            assert_eq!(err.remaining, "", "{text:?}");
            assert_eq!(err.message, "Unexpected end of formula", "{text:?}");
        }
    }
}

#[test]
fn out_of_range_references_are_labels() {
    // Column past XFD, row past 1048576.
    assert!(parse_expression("XFE1").unwrap().is_label());
    assert!(parse_expression("A1048577").unwrap().is_label());
    assert!(parse_expression("XFD1048576").unwrap().is_cell());
    assert!(parse_expression("$XFE$1").is_err());
}

#[test]
fn nesting_limit() {
    let parser = parser_with(ParseOptions {
        max_nesting_depth: 4,
        ..ParseOptions::default()
    });
    assert!(parser.parse_expression("((((1))))").unwrap().is_group());

    let err = parser.parse_expression("(((((1)))))").unwrap_err();
    assert_eq!(err.message, "Expression nesting exceeds the 4-level limit");
    assert_eq!(err.span, Span::new(4, 5));

    // A cut-off alternative does not mask the real error.
    let err = parser.parse_expression("((((1)))").unwrap_err();
    assert_eq!(err.message, "Unexpected end of formula");
}

#[test]
fn subtraction_does_not_count_as_nesting() {
    let parser = parser_with(ParseOptions {
        max_nesting_depth: 1,
        ..ParseOptions::default()
    });
    for text in ["(1+2)", "(1-2)", "(1 - 2)"] {
        let tree = parser.parse_expression(text).unwrap();
        assert!(tree.is_group(), "{text:?}");
    }
    let inner: Vec<_> = parser
        .parse_expression("(1-2)")
        .unwrap()
        .parent()
        .unwrap()
        .significant_children()
        .cloned()
        .collect();
    assert_eq!(inner.len(), 1);
    assert!(inner[0].is_subtraction());

    // A negative operand still nests.
    let err = parser.parse_expression("(1*-2)").unwrap_err();
    assert_eq!(err.message, "Expression nesting exceeds the 1-level limit");
}

#[test]
fn subtraction_at_the_default_nesting_limit() {
    for operator in ["+", "-"] {
        let text = format!("{}1{operator}2{}", "(".repeat(64), ")".repeat(64));
        let tree = parse_expression(&text).unwrap();
        assert!(tree.is_group(), "{operator}");
        assert_eq!(tree.text(), text);
    }
}

#[test]
fn default_nesting_limit_stops_runaway_input() {
    let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    let err = parse_expression(&deep).unwrap_err();
    let FormulaError::Parse(err) = err else {
        panic!("expected a parse error");
    };
    assert!(err.message.contains("64-level"), "{err}");
}

#[test]
fn formula_length_limit() {
    let long = "1+".repeat(5000) + "1";
    let err = parse_formula(&long, ParseOptions::default()).unwrap_err();
    assert!(err.to_string().contains("8192-character limit"), "{err}");
}

#[test]
fn grammar_load_failures() {
    let options = ParseOptions::default();
    let numbers = DecimalNumberParser::default();

    let err = FormulaParser::with_grammar("EXPRESSION = NUMBER, WORD ;", numbers, options.clone())
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownIdentifier {
            production: "EXPRESSION".to_string(),
            identifier: "WORD".to_string(),
        }
    );

    let err = FormulaParser::with_grammar("START = NUMBER ;", numbers, options.clone())
        .unwrap_err();
    assert_eq!(err, GrammarError::MissingEntryPoint("EXPRESSION".to_string()));

    let err = FormulaParser::with_grammar("EXPRESSION = NUMBER", numbers, options).unwrap_err();
    assert!(matches!(err, GrammarError::Syntax { .. }));
}

#[test]
fn custom_grammars_reuse_the_terminals() {
    let parser = FormulaParser::with_grammar(
        r#"EXPRESSION = NUMBER, { "+", NUMBER } ;"#,
        DecimalNumberParser::default(),
        ParseOptions::default(),
    )
    .unwrap();
    assert!(parser.parse_expression("1+2+3").unwrap().is_addition());
    assert!(parser.parse_expression("1*2").is_err());
}

#[test]
fn custom_grammars_may_match_every_minus_as_negative() {
    let parser = FormulaParser::with_grammar(
        r#"
        EXPRESSION = VALUE, { NEGATIVE | ( "+", VALUE ) } ;
        VALUE = NEGATIVE | NUMBER ;
        NEGATIVE = "-", VALUE ;
        "#,
        DecimalNumberParser::default(),
        ParseOptions::default(),
    )
    .unwrap();

    let tree = parser.parse_expression("1-2").unwrap();
    assert!(tree.is_subtraction());
    assert_eq!(tree.children().len(), 3);

    let tree = parser.parse_expression("1--2").unwrap();
    assert!(tree.is_subtraction());
    let (_, subtraction) = tree.as_binary().unwrap();
    assert!(subtraction.right().is_negative());

    assert!(parser.parse_expression("-2").unwrap().is_negative());
}

#[test]
fn incomplete_nodes_surface_as_parse_errors() {
    let parser = FormulaParser::with_grammar(
        "EXPRESSION = CELL ; CELL = COLUMN ;",
        DecimalNumberParser::default(),
        ParseOptions::default(),
    )
    .unwrap();
    let err = parser.parse_expression("AB").unwrap_err();
    assert_eq!(err.span, Span::new(0, 2));
    assert_eq!(
        err.source,
        Some(TokenError::MissingRow {
            text: "AB".to_string()
        })
    );
    assert!(err.source().is_some());
}
