use crate::{
    error::DbError,
    sql::{
        base::source::{SourceReader, WatermarkFilter},
        postgres::{
            query::with_watermark_filter,
            row::to_row_set,
            utils::{classify, connect_client},
        },
    },
};
use async_trait::async_trait;
use model::records::row::RowSet;
use tokio_postgres::types::ToSql;
use tracing::info;

/// Reads source rows from PostgreSQL, one connection per select.
#[derive(Clone)]
pub struct PgSourceReader {
    conn_str: String,
}

impl PgSourceReader {
    pub fn new(conn_str: impl Into<String>) -> Self {
        PgSourceReader {
            conn_str: conn_str.into(),
        }
    }
}

#[async_trait]
impl SourceReader for PgSourceReader {
    async fn select(
        &self,
        query: &str,
        filter: Option<&WatermarkFilter>,
    ) -> Result<RowSet, DbError> {
        let client = connect_client(&self.conn_str).await?;
        info!("Connected to PostgreSQL.");

        let sql = match filter {
            Some(filter) => with_watermark_filter(query, filter),
            None => query.to_string(),
        };
        info!(query = %sql, "Executing query");

        let params: Vec<&(dyn ToSql + Sync)> = match filter {
            Some(filter) => vec![&filter.after as &(dyn ToSql + Sync)],
            None => vec![],
        };

        let statement = client.prepare(&sql).await.map_err(classify)?;
        let columns = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();
        let rows = client.query(&statement, &params).await.map_err(classify)?;

        let row_set = to_row_set(columns, &rows)?;
        info!(rows = row_set.len(), "Selected {} rows", row_set.len());
        Ok(row_set)
    }
}
