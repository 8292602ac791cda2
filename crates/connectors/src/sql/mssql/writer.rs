use crate::{
    error::DbError,
    sql::{
        base::destination::TargetWriter,
        mssql::{
            params::{param_refs, row_params},
            query::{latest_watermark_sql, normalize_placeholders},
            utils::{MsSqlClient, classify, connect_client, release},
        },
    },
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use model::{
    core::identifiers::SqlIdent,
    execution::spec::InsertMode,
    pagination::watermark::{Watermark, WatermarkColumns},
    records::row::RowSet,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Writes to SQL Server, one connection per operation.
#[derive(Clone)]
pub struct MsSqlTargetWriter {
    conn_str: String,
}

impl MsSqlTargetWriter {
    pub fn new(conn_str: impl Into<String>) -> Self {
        MsSqlTargetWriter {
            conn_str: conn_str.into(),
        }
    }

    async fn connect(&self) -> Result<MsSqlClient, DbError> {
        let client = connect_client(&self.conn_str).await?;
        info!("Connected to MS SQL Server.");
        Ok(client)
    }
}

#[async_trait]
impl TargetWriter for MsSqlTargetWriter {
    async fn delete(&self, query: &str) -> Result<u64, DbError> {
        let mut client = self.connect().await?;
        info!(query, "Executing query");

        let result = client.execute(query, &[]).await.map_err(classify);
        release(client).await;

        let affected = result?.total();
        info!(rows = affected, "Delete query affected {affected} rows.");
        Ok(affected)
    }

    async fn insert(
        &self,
        query: &str,
        rows: &RowSet,
        mode: InsertMode,
    ) -> Result<usize, DbError> {
        let sql = normalize_placeholders(query, rows.column_count());
        let mut client = self.connect().await?;
        info!(query = %sql, mode = %mode, "MSSQL insert query");

        let result = insert_rows(&mut client, &sql, rows, mode).await;
        release(client).await;
        result
    }

    async fn watermark(
        &self,
        table: &SqlIdent,
        columns: &WatermarkColumns,
    ) -> Result<Watermark, DbError> {
        let mut client = connect_client(&self.conn_str).await?;
        info!(%table, "Connected to MS SQL Server to get the latest end time for table '{table}'.");

        let sql = latest_watermark_sql(table, columns);
        debug!(query = %sql, "Executing watermark query");

        let result = read_watermark(&mut client, &sql).await;
        release(client).await;

        let watermark = result?;
        match (watermark.end_time(), watermark.id()) {
            (Some(end_time), Some(id)) => {
                info!(%table, %end_time, %id, "Latest end time from '{table}' is {end_time} with id {id}")
            }
            _ => info!(%table, "No end time found in '{table}', returning nulls"),
        }
        Ok(watermark)
    }
}

async fn insert_rows(
    client: &mut MsSqlClient,
    sql: &str,
    rows: &RowSet,
    mode: InsertMode,
) -> Result<usize, DbError> {
    let transactional = mode == InsertMode::Transactional;
    if transactional {
        run_batch(client, "BEGIN TRAN").await?;
    }

    let mut inserted = 0;
    for (index, row) in rows.iter().enumerate() {
        let params = row_params(&row.values);
        let refs = param_refs(&params);

        if let Err(err) = client.execute(sql, &refs).await {
            let err = classify(err);
            error!(row = index, error = %err, "Insert failed");

            if transactional {
                if let Err(rollback) = run_batch(client, "ROLLBACK TRAN").await {
                    warn!(error = %rollback, "Rollback failed");
                }
                return Err(DbError::RolledBack {
                    failed_row: index,
                    source: Box::new(err),
                });
            }

            if inserted == 0 {
                return Err(err);
            }
            return Err(DbError::PartialInsert {
                inserted,
                failed_row: index,
                source: Box::new(err),
            });
        }
        inserted += 1;
    }

    if transactional {
        run_batch(client, "COMMIT TRAN").await?;
    }

    Ok(inserted)
}

/// Runs a plain T-SQL batch outside `sp_executesql`, so transaction control
/// statements take effect on the session.
async fn run_batch(client: &mut MsSqlClient, batch: &str) -> Result<(), DbError> {
    client
        .simple_query(batch)
        .await
        .map_err(classify)?
        .into_results()
        .await
        .map_err(classify)?;
    Ok(())
}

async fn read_watermark(client: &mut MsSqlClient, sql: &str) -> Result<Watermark, DbError> {
    let row = client
        .query(sql, &[])
        .await
        .map_err(classify)?
        .into_row()
        .await
        .map_err(classify)?;

    let Some(row) = row else {
        return Ok(Watermark::none());
    };

    let Some(end_time) = read_end_time(&row)? else {
        return Ok(Watermark::none());
    };

    let id = row
        .try_get::<Uuid, _>(1)
        .map_err(|e| DbError::Decode(format!("watermark id: {e}")))?
        .ok_or_else(|| DbError::Decode("watermark id is NULL while end time is set".into()))?;

    Ok(Watermark::new(end_time, id))
}

/// Reads the end time as `datetimeoffset`, falling back to `datetime2` /
/// `datetime` taken as UTC.
fn read_end_time(row: &tiberius::Row) -> Result<Option<DateTime<FixedOffset>>, DbError> {
    if let Ok(value) = row.try_get::<DateTime<FixedOffset>, _>(0) {
        return Ok(value);
    }

    row.try_get::<NaiveDateTime, _>(0)
        .map(|value| value.map(|naive| naive.and_utc().fixed_offset()))
        .map_err(|e| DbError::Decode(format!("watermark end time: {e}")))
}
