use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("SQL identifier cannot be empty")]
    Empty,

    #[error("SQL identifier too long: {0} chars (max 255)")]
    TooLong(usize),

    #[error("invalid SQL identifier '{0}'")]
    Invalid(String),
}

/// A single table's configuration cannot be used. Only that table is
/// skipped; the rest of the run goes ahead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid configuration for table '{table}': {reason}")]
pub struct TableConfigError {
    pub table: String,
    pub reason: String,
}

impl TableConfigError {
    pub fn new(table: impl Into<String>, reason: impl Into<String>) -> Self {
        TableConfigError {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
