use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// A Sale Record that cannot be turned into a row of the `SalesTable`.
///
/// `row` is the zero-based position of the record in the downloaded array. These errors travel
/// inside `anyhow::Error`; use `downcast_ref::<RecordError>()` to inspect them.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RecordError {
    #[error("Record {row} is missing the required field '{field}'")]
    MissingField { row: usize, field: String },

    #[error("Record {row} has a 'date_closed' value that cannot be parsed as a timestamp: '{value}'")]
    MalformedTimestamp { row: usize, value: String },

    #[error("Record {row} has an invalid '{field}' field, expected {expected}")]
    InvalidField {
        row: usize,
        field: String,
        expected: &'static str,
    },

    #[error("Record {row} has '{field}' values whose sum is too large to represent")]
    AmountOverflow { row: usize, field: String },
}

impl RecordError {
    pub(crate) fn missing(row: usize, field: impl Into<String>) -> Self {
        Self::MissingField {
            row,
            field: field.into(),
        }
    }

    pub(crate) fn invalid(row: usize, field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            row,
            field: field.into(),
            expected,
        }
    }
}
