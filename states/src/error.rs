use thiserror::Error;

use crate::FieldKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Row index {index} out of range for table of {len} row(s)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Row {index} has no neighbour in that direction ({len} row(s))")]
    CannotMove { index: usize, len: usize },
    #[error("Unknown field: {field}")]
    UnknownField { field: String },
    #[error("Field {field} expects a {expected} value, got {actual}")]
    FieldType {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("Cannot parse {input:?} as a {kind} value")]
    ParseValue { kind: FieldKind, input: String },
}

impl TableError {
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn cannot_move(index: usize, len: usize) -> Self {
        Self::CannotMove { index, len }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn field_type(field: impl Into<String>, expected: FieldKind, actual: FieldKind) -> Self {
        Self::FieldType {
            field: field.into(),
            expected,
            actual,
        }
    }

    pub fn parse_value(kind: FieldKind, input: impl Into<String>) -> Self {
        Self::ParseValue {
            kind,
            input: input.into(),
        }
    }
}
