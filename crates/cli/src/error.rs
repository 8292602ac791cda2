use connectors::DbError;
use engine_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load the configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// SQL Server driver error.
    #[error("MS SQL error: {0}")]
    MsSql(#[from] tiberius::error::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("{0} of the configured connections failed")]
    ConnectionCheck(usize),
}
