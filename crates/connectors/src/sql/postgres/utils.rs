use crate::error::DbError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{error, warn};

/// Opens a client for a libpq-style connection string (`host=... user=...`)
/// or a `postgres://` URL, honouring its `sslmode`.
///
/// The connection task is spawned onto the runtime and ends when the
/// returned client is dropped.
pub async fn connect_client(conn_str: &str) -> Result<Client, DbError> {
    let config = conn_str
        .parse::<Config>()
        .map_err(|e| DbError::Connectivity(format!("Invalid PostgreSQL connection string: {e}")))?;
    let ssl_mode = config.get_ssl_mode();

    match ssl_mode {
        SslMode::Disable => connect_without_tls(config).await,
        SslMode::Require => connect_with_tls(config).await,
        SslMode::Prefer => match connect_with_tls(config.clone()).await {
            Ok(client) => Ok(client),
            Err(error) => {
                warn!(%error, "Postgres TLS handshake failed, retrying without TLS");
                connect_without_tls(config).await
            }
        },
        _ => connect_with_tls(config).await,
    }
}

async fn connect_with_tls(config: Config) -> Result<Client, DbError> {
    let connector = TlsConnector::builder().build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) = config.connect(tls).await.map_err(DbError::connectivity)?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

async fn connect_without_tls(config: Config) -> Result<Client, DbError> {
    let (client, connection) = config.connect(NoTls).await.map_err(DbError::connectivity)?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

/// Sorts a statement-time driver error into the connectivity or query
/// bucket. A closed connection or an I/O failure means the socket went away;
/// everything else is the server or the driver rejecting the statement.
pub(crate) fn classify(err: tokio_postgres::Error) -> DbError {
    if err.is_closed() || is_io(&err) {
        DbError::connectivity(err)
    } else {
        DbError::query(err)
    }
}

fn is_io(err: &tokio_postgres::Error) -> bool {
    std::error::Error::source(err)
        .is_some_and(|source| source.downcast_ref::<std::io::Error>().is_some())
}
