use crate::error::DbError;
use tiberius::{Client, Config, error::Error as TdsError};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

pub type MsSqlClient = Client<Compat<TcpStream>>;

/// Opens a client for an ADO.NET-style connection string
/// (`Server=tcp:host,1433;Database=...;User Id=...;Password=...`).
///
/// Follows one server redirect, as issued by Azure SQL gateways.
pub async fn connect_client(conn_str: &str) -> Result<MsSqlClient, DbError> {
    let mut config = Config::from_ado_string(conn_str)
        .map_err(|e| DbError::Connectivity(format!("Invalid SQL Server connection string: {e}")))?;

    match try_connect(config.clone()).await {
        Err(TdsError::Routing { host, port }) => {
            info!(%host, port, "SQL Server redirected the connection");
            config.host(&host);
            config.port(port);
            try_connect(config).await.map_err(DbError::connectivity)
        }
        other => other.map_err(DbError::connectivity),
    }
}

async fn try_connect(config: Config) -> Result<MsSqlClient, TdsError> {
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true).ok();
    Client::connect(config, tcp.compat_write()).await
}

/// Closes the client, logging rather than failing: by the time a close runs
/// the operation's outcome is already decided.
pub async fn release(client: MsSqlClient) {
    if let Err(err) = client.close().await {
        debug!(%err, "SQL Server connection did not close cleanly");
    }
}

/// Sorts a statement-time driver error into the connectivity or query
/// bucket.
pub(crate) fn classify(err: TdsError) -> DbError {
    match err {
        TdsError::Io { .. } | TdsError::Routing { .. } => {
            DbError::connectivity(err)
        }
        other => DbError::query(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_connection_string_is_connectivity_error() {
        let err = connect_client("Server=tcp:localhost,notaport").await.unwrap_err();
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_server_errors_are_query_errors() {
        let err = classify(TdsError::Conversion("cannot convert nvarchar to uniqueidentifier".into()));
        assert!(matches!(err, DbError::Query(_)));
    }
}
