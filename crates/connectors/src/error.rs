use thiserror::Error;

/// All errors coming from the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be reached, authenticated against or
    /// negotiated with.
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// The engine rejected a statement: malformed SQL, missing object,
    /// parameter mismatch, constraint violation.
    #[error("Query error: {0}")]
    Query(String),

    /// A row batch failed part-way. Rows before `failed_row` stay written.
    #[error("Insert failed at row {failed_row} after {inserted} rows were written: {source}")]
    PartialInsert {
        inserted: usize,
        failed_row: usize,
        #[source]
        source: Box<DbError>,
    },

    /// A transactional batch failed at `failed_row` and was rolled back, so
    /// none of its rows were written. `source` keeps the classified cause.
    #[error("Insert failed at row {failed_row}, batch rolled back: {source}")]
    RolledBack {
        failed_row: usize,
        #[source]
        source: Box<DbError>,
    },

    /// A value came back in a shape the reader cannot represent.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl DbError {
    pub fn connectivity(err: impl std::fmt::Display) -> Self {
        DbError::Connectivity(err.to_string())
    }

    pub fn query(err: impl std::fmt::Display) -> Self {
        DbError::Query(err.to_string())
    }

    pub fn is_connectivity(&self) -> bool {
        match self {
            DbError::Connectivity(_) => true,
            DbError::PartialInsert { source, .. } | DbError::RolledBack { source, .. } => {
                source.is_connectivity()
            }
            _ => false,
        }
    }
}

impl From<native_tls::Error> for DbError {
    fn from(err: native_tls::Error) -> Self {
        DbError::Connectivity(format!("TLS setup failed: {err}"))
    }
}
