use connectors::DbError;
use model::execution::errors::TableConfigError;
use thiserror::Error;

/// Why a single table's sync did not complete.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The table's own configuration is unusable; it is skipped.
    #[error(transparent)]
    TableConfig(#[from] TableConfigError),

    /// A database could not be reached.
    #[error(transparent)]
    Connectivity(DbError),

    /// A statement was rejected or a value could not be read back.
    #[error(transparent)]
    Query(DbError),

    /// An insert batch stopped part-way; earlier rows remain in the target.
    #[error(transparent)]
    PartialInsert(DbError),
}

impl SyncError {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::TableConfig(_) => "table_config",
            SyncError::Connectivity(_) => "connectivity",
            SyncError::Query(_) => "query",
            SyncError::PartialInsert(_) => "partial_insert",
        }
    }
}

impl From<DbError> for SyncError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::PartialInsert { .. } => SyncError::PartialInsert(err),
            ref e if e.is_connectivity() => SyncError::Connectivity(err),
            _ => SyncError::Query(err),
        }
    }
}
