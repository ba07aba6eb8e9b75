use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{CellReference, LabelName, ReferenceError};

/// Result of comparing a label against a cell: labels always sort first.
pub const LABEL_COMPARED_WITH_CELL_RESULT: Ordering = Ordering::Less;

/// Anything a formula can name as a location: a cell address or a label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExpressionReference {
    Cell(CellReference),
    Label(LabelName),
}

impl ExpressionReference {
    /// Parse text as a cell reference, falling back to a label.
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        match CellReference::parse(text) {
            Ok(cell) => Ok(Self::Cell(cell)),
            Err(_) => Ok(Self::Label(LabelName::with(text)?)),
        }
    }

    pub fn as_cell(&self) -> Option<CellReference> {
        match self {
            ExpressionReference::Cell(cell) => Some(*cell),
            ExpressionReference::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelName> {
        match self {
            ExpressionReference::Cell(_) => None,
            ExpressionReference::Label(label) => Some(label),
        }
    }

    /// Total order over references: every label sorts before every cell, cells compare
    /// column-then-row and labels compare case-insensitively.
    ///
    /// `self` hands itself to `other`, which then answers from its own side; neither side
    /// inspects the other's variant.
    pub fn compare(&self, other: &Self) -> Ordering {
        match self {
            ExpressionReference::Cell(cell) => other.compared_with_cell(cell),
            ExpressionReference::Label(label) => other.compared_with_label(label),
        }
    }

    /// How `cell` orders relative to `self`.
    fn compared_with_cell(&self, cell: &CellReference) -> Ordering {
        match self {
            ExpressionReference::Cell(me) => cell.compare(me),
            ExpressionReference::Label(_) => LABEL_COMPARED_WITH_CELL_RESULT.reverse(),
        }
    }

    /// How `label` orders relative to `self`.
    fn compared_with_label(&self, label: &LabelName) -> Ordering {
        match self {
            ExpressionReference::Cell(_) => LABEL_COMPARED_WITH_CELL_RESULT,
            ExpressionReference::Label(me) => label.cmp(me),
        }
    }
}

impl From<CellReference> for ExpressionReference {
    fn from(cell: CellReference) -> Self {
        ExpressionReference::Cell(cell)
    }
}

impl From<LabelName> for ExpressionReference {
    fn from(label: LabelName) -> Self {
        ExpressionReference::Label(label)
    }
}

impl fmt::Display for ExpressionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionReference::Cell(cell) => cell.fmt(f),
            ExpressionReference::Label(label) => label.fmt(f),
        }
    }
}
