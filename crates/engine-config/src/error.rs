use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before any table is synced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read the configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse the configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} connection string is missing.")]
    MissingConnectionString(&'static str),

    #[error("No SyncTablesAndQueries found in configuration.")]
    NoTables,

    #[error("Invalid insert mode: {0}")]
    InvalidInsertMode(String),
}
