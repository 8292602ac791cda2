//! The three per-table strategies.
//!
//! `Delete_and_Insert` and `Full_sync` run the configured delete and then copy
//! every source row. `Insert_latest` reads the target watermark and copies only
//! source rows that end after it, oldest first.

use crate::{error::SyncError, summary::TableStats};
use connectors::{SourceReader, TargetWriter, WatermarkFilter};
use model::{
    core::identifiers::SqlIdent,
    execution::{
        errors::TableConfigError,
        spec::{SyncSpec, SyncType},
    },
    records::row::RowSet,
};
use tracing::info;

pub async fn execute<R, W>(spec: &SyncSpec, reader: &R, writer: &W) -> Result<TableStats, SyncError>
where
    R: SourceReader + ?Sized,
    W: TargetWriter + ?Sized,
{
    if spec.sync_type.requires_delete() {
        replace_all(spec, reader, writer).await
    } else {
        insert_latest(spec, reader, writer).await
    }
}

/// Deletes with the configured statement, then copies the full source result.
/// The delete is not undone if a later step fails.
pub async fn replace_all<R, W>(
    spec: &SyncSpec,
    reader: &R,
    writer: &W,
) -> Result<TableStats, SyncError>
where
    R: SourceReader + ?Sized,
    W: TargetWriter + ?Sized,
{
    let table = spec.table_name.as_str();
    let delete_query = spec
        .delete_query()
        .ok_or_else(|| TableConfigError::new(table, "Missing delete query"))?;

    let deleted = writer.delete(delete_query).await?;
    match spec.sync_type {
        SyncType::FullSync => {
            info!(table, rows = deleted, "{deleted} rows deleted for full sync on '{table}'.")
        }
        _ => info!(table, rows = deleted, "{deleted} rows deleted from '{table}'."),
    }

    let rows = reader.select(&spec.select_query, None).await?;
    let inserted = transfer(spec, writer, &rows).await?;
    if inserted == 0 {
        info!(table, "No rows found to insert for '{table}'.");
    } else {
        info!(table, rows = inserted, "{inserted} rows inserted into '{table}'.");
    }

    Ok(TableStats {
        deleted: Some(deleted),
        selected: rows.len(),
        inserted,
        watermark: None,
    })
}

/// Copies source rows newer than the target's watermark.
pub async fn insert_latest<R, W>(
    spec: &SyncSpec,
    reader: &R,
    writer: &W,
) -> Result<TableStats, SyncError>
where
    R: SourceReader + ?Sized,
    W: TargetWriter + ?Sized,
{
    let table = SqlIdent::new(&spec.table_name)
        .map_err(|e| TableConfigError::new(&spec.table_name, e.to_string()))?;

    let watermark = writer.watermark(&table, &spec.watermark).await?;
    let filter = WatermarkFilter::from_watermark(&spec.watermark.end_time, &watermark);
    if let Some(filter) = &filter {
        info!(%table, after = %filter.after, "Selecting rows of '{table}' ending after {}", filter.after);
    }

    let rows = reader.select(&spec.select_query, filter.as_ref()).await?;
    let inserted = transfer(spec, writer, &rows).await?;
    if inserted == 0 {
        info!(%table, "No new rows to transfer for '{table}'.");
    } else {
        info!(%table, rows = inserted, "{inserted} new rows transferred for '{table}'.");
    }

    Ok(TableStats {
        deleted: None,
        selected: rows.len(),
        inserted,
        watermark: Some(watermark),
    })
}

/// Hands `rows` to the writer. An empty result skips the insert entirely.
async fn transfer<W>(spec: &SyncSpec, writer: &W, rows: &RowSet) -> Result<usize, SyncError>
where
    W: TargetWriter + ?Sized,
{
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(writer
        .insert(&spec.insert_query, rows, spec.insert_mode)
        .await?)
}
