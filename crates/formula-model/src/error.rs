use thiserror::Error;

/// Errors raised while constructing or parsing column, row, cell and range references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("column {value} out of range (must be within 0..{max})")]
    ColumnOutOfRange { value: i64, max: u32 },
    #[error("row {value} out of range (must be within 0..{max})")]
    RowOutOfRange { value: i64, max: u32 },
    #[error("invalid column reference: {0:?}")]
    InvalidColumn(String),
    #[error("invalid row reference: {0:?}")]
    InvalidRow(String),
    #[error("invalid cell reference: {0:?}")]
    InvalidCell(String),
    #[error("invalid range reference: {0:?}")]
    InvalidRange(String),
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Validation errors for label names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("label cannot be empty")]
    Empty,
    #[error("label is too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
    #[error("invalid first character '{0}' (must start with a letter)")]
    InvalidStartCharacter(char),
    #[error("invalid character '{ch}' at index {index}")]
    InvalidCharacter { ch: char, index: usize },
    #[error("label {0:?} cannot look like a cell reference")]
    LooksLikeCellReference(String),
}
