use crate::error::DbError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use model::{
    core::{identifiers::SqlIdent, utils::truncate_to_second},
    pagination::watermark::Watermark,
    records::row::RowSet,
};

/// Restricts a source read to rows whose end time, at whole-second
/// precision, is strictly after `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkFilter {
    pub column: SqlIdent,
    pub after: DateTime<FixedOffset>,
}

impl WatermarkFilter {
    pub fn new(column: SqlIdent, after: DateTime<FixedOffset>) -> Self {
        WatermarkFilter {
            column,
            after: truncate_to_second(&after),
        }
    }

    /// Builds the filter for a target watermark; `None` when the target is
    /// empty and everything should be read.
    pub fn from_watermark(column: &SqlIdent, watermark: &Watermark) -> Option<Self> {
        watermark
            .end_time()
            .map(|end_time| Self::new(column.clone(), end_time))
    }
}

#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Runs `query` against the source.
    ///
    /// Without a filter the query runs verbatim. With one, the reader appends
    /// the end-time predicate and an ascending order on the end-time column,
    /// so rows come back oldest first. No matching rows is an empty
    /// [`RowSet`], never an error.
    async fn select(
        &self,
        query: &str,
        filter: Option<&WatermarkFilter>,
    ) -> Result<RowSet, DbError>;
}
