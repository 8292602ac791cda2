//! Database plumbing for the PostgreSQL to SQL Server table sync.
//!
//! The sync engine only talks to the [`SourceReader`] and [`TargetWriter`]
//! traits. Each driver opens a fresh connection per operation and drops it
//! when the operation finishes, successful or not.

pub mod error;
pub mod sql;

pub use error::DbError;
pub use sql::base::{
    destination::TargetWriter,
    source::{SourceReader, WatermarkFilter},
};
pub use sql::{mssql::writer::MsSqlTargetWriter, postgres::reader::PgSourceReader};
