use crate::error::CliError;
use async_trait::async_trait;
use connectors::sql::{mssql, postgres};
use tracing::{error, info};

/// Trait for "pinging" a database
#[async_trait]
pub trait ConnectionPinger: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// Source side
pub struct PostgresConnectionPinger {
    pub conn_str: String,
}

/// Target side
pub struct MsSqlConnectionPinger {
    pub conn_str: String,
}

#[async_trait]
impl ConnectionPinger for PostgresConnectionPinger {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn ping(&self) -> Result<(), CliError> {
        info!("Pinging PostgreSQL");

        let client = postgres::utils::connect_client(&self.conn_str).await?;
        let row = client.query_one("SELECT 1", &[]).await?;

        let val: i32 = row.try_get(0)?;
        expect_one(self.name(), val as i64)?;

        info!("PostgreSQL ping succeeded");
        Ok(())
    }
}

#[async_trait]
impl ConnectionPinger for MsSqlConnectionPinger {
    fn name(&self) -> &'static str {
        "MS SQL Server"
    }

    async fn ping(&self) -> Result<(), CliError> {
        info!("Pinging MS SQL Server");

        let mut client = mssql::utils::connect_client(&self.conn_str).await?;
        let result = async {
            client
                .simple_query("SELECT 1")
                .await?
                .into_row()
                .await
        }
        .await;
        mssql::utils::release(client).await;

        let no_result = || CliError::Unexpected("MS SQL Server ping returned no result".into());
        let row = result?.ok_or_else(no_result)?;
        let val = row.try_get::<i32, _>(0)?.ok_or_else(no_result)?;
        expect_one(self.name(), val as i64)?;

        info!("MS SQL Server ping succeeded");
        Ok(())
    }
}

fn expect_one(engine: &str, val: i64) -> Result<(), CliError> {
    if val != 1 {
        let msg = format!("{engine} ping returned unexpected result: {val}");
        error!("{}", msg);
        return Err(CliError::Unexpected(msg));
    }
    Ok(())
}

/// Pings every connection, logging each result. Returns how many failed.
pub async fn ping_all(pingers: &[&dyn ConnectionPinger]) -> usize {
    let mut failed = 0;
    for pinger in pingers {
        if let Err(err) = pinger.ping().await {
            error!(engine = pinger.name(), error = %err, "{} connection failed: {err}", pinger.name());
            failed += 1;
        }
    }
    failed
}
