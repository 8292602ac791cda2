use crate::error::DbError;
use async_trait::async_trait;
use model::{
    core::identifiers::SqlIdent,
    execution::spec::InsertMode,
    pagination::watermark::{Watermark, WatermarkColumns},
    records::row::RowSet,
};

#[async_trait]
pub trait TargetWriter: Send + Sync {
    /// Executes a configured delete statement and returns the number of rows
    /// it removed.
    async fn delete(&self, query: &str) -> Result<u64, DbError>;

    /// Executes `query` once per row, binding column `i` to parameter `i + 1`.
    /// Nulls are bound, never skipped.
    ///
    /// The first failing row stops the batch. Under [`InsertMode::BestEffort`]
    /// earlier rows stay written and the error says how many; under
    /// [`InsertMode::Transactional`] the batch is rolled back. Returns the
    /// number of rows inserted.
    async fn insert(&self, query: &str, rows: &RowSet, mode: InsertMode)
    -> Result<usize, DbError>;

    /// Reads the end time and id of the newest row in `table`, newest by end
    /// time and then by id. An empty table yields [`Watermark::none`].
    async fn watermark(
        &self,
        table: &SqlIdent,
        columns: &WatermarkColumns,
    ) -> Result<Watermark, DbError>;
}
