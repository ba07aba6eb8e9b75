use formula_model::{
    CellReference, ColumnReference, ExpressionReference, LabelName, ReferenceKind, RowReference,
    EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_kind() -> impl Strategy<Value = ReferenceKind> {
    prop_oneof![Just(ReferenceKind::Absolute), Just(ReferenceKind::Relative)]
}

fn col(value: u32) -> ColumnReference {
    ColumnReference::with(value, ReferenceKind::Relative).unwrap()
}

fn row(value: u32) -> RowReference {
    RowReference::with(value, ReferenceKind::Relative).unwrap()
}

proptest! {
    #[test]
    fn column_text_roundtrip(value in 0..EXCEL_MAX_COLS, kind in arb_kind()) {
        let column = ColumnReference::with(value, kind).unwrap();
        prop_assert_eq!(ColumnReference::parse(&column.to_string()).unwrap(), column);
    }

    #[test]
    fn row_text_roundtrip(value in 0..EXCEL_MAX_ROWS, kind in arb_kind()) {
        let row = RowReference::with(value, kind).unwrap();
        prop_assert_eq!(RowReference::parse(&row.to_string()).unwrap(), row);
    }

    #[test]
    fn cell_text_roundtrip(
        c in 0..EXCEL_MAX_COLS,
        r in 0..EXCEL_MAX_ROWS,
        ck in arb_kind(),
        rk in arb_kind(),
    ) {
        let cell = CellReference::with(
            ColumnReference::with(c, ck).unwrap(),
            RowReference::with(r, rk).unwrap(),
        );
        prop_assert_eq!(CellReference::parse(&cell.to_string()).unwrap(), cell);
    }

    #[test]
    fn cell_text_is_never_a_label(c in 0..EXCEL_MAX_COLS, r in 0..EXCEL_MAX_ROWS) {
        let text = CellReference::with(col(c), row(r)).to_string();
        prop_assert!(LabelName::with(text).is_err());
    }
}

#[test]
fn documented_renderings() {
    assert_eq!(row(1_048_575).to_string(), "1048576");
    assert_eq!(CellReference::with(col(0), row(0)).to_string(), "A1");
    assert_eq!(
        CellReference::with(
            ColumnReference::with(27, ReferenceKind::Absolute).unwrap(),
            RowReference::with(9, ReferenceKind::Absolute).unwrap(),
        )
        .to_string(),
        "$AB$10"
    );
}

#[test]
fn label_ambiguity() {
    assert!(LabelName::with("AB11").is_err());
    assert!(LabelName::with("Total1").is_ok());
}

#[test]
fn label_sorts_before_any_cell() {
    let label = ExpressionReference::from(LabelName::with("A").unwrap());
    let first = ExpressionReference::from(CellReference::with(col(0), row(0)));
    let second = ExpressionReference::from(CellReference::with(col(0), row(1)));
    assert_eq!(label.compare(&first), Ordering::Less);
    assert_eq!(first.compare(&second), Ordering::Less);
    assert_eq!(second.compare(&label), Ordering::Greater);
}

#[test]
fn reference_json_shape() {
    let cell = ExpressionReference::parse("$B2").unwrap();
    let json = serde_json::to_string(&cell).unwrap();
    assert_eq!(
        json,
        r#"{"type":"cell","value":{"column":{"value":1,"kind":"absolute"},"row":{"value":1,"kind":"relative"}}}"#
    );
    let back: ExpressionReference = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cell);

    let out_of_range = r#"{"value":16384,"kind":"relative"}"#;
    assert!(serde_json::from_str::<ColumnReference>(out_of_range).is_err());
}
