use crate::{
    commands::Commands,
    conn::{ConnectionPinger, MsSqlConnectionPinger, PostgresConnectionPinger},
    error::CliError,
};
use clap::Parser;
use connectors::{MsSqlTargetWriter, PgSourceReader};
use engine_config::SyncConfig;
use engine_core::SyncOrchestrator;
use model::execution::spec::InsertMode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "pg2mssql-sync",
    version,
    about = "Copies tables from PostgreSQL into SQL Server"
)]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Log at debug level unless RUST_LOG says otherwise"
    )]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sync {
            config,
            tables,
            insert_mode,
        } => {
            // A bad configuration ends the run before any table is touched.
            let config = match engine_config::load(&config) {
                Ok(config) => config,
                Err(err) => {
                    error!(error = %err, "Configuration error: {err}");
                    return Ok(());
                }
            };
            sync(config, &tables, insert_mode).await;
        }
        Commands::CheckConfig { config } => {
            let config = engine_config::load(&config)?;
            println!("{}", output::plans_json(&config)?);
        }
        Commands::TestConn { config } => {
            let config = engine_config::load(&config)?;
            let source = PostgresConnectionPinger {
                conn_str: config.source_conn.clone(),
            };
            let target = MsSqlConnectionPinger {
                conn_str: config.target_conn.clone(),
            };

            let pingers: [&dyn ConnectionPinger; 2] = [&source, &target];
            let failed = conn::ping_all(&pingers).await;
            if failed > 0 {
                return Err(CliError::ConnectionCheck(failed));
            }
            info!("All connections succeeded");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn sync(mut config: SyncConfig, tables: &[String], insert_mode: Option<InsertMode>) {
    if !tables.is_empty() {
        config.retain_tables(tables);
        if config.tables.is_empty() {
            warn!(requested = ?tables, "None of the requested tables are configured");
            return;
        }
    }
    if let Some(mode) = insert_mode {
        config.override_insert_mode(mode);
    }

    info!(tables = config.tables.len(), insert_mode = %config.insert_mode, "Starting synchronization");

    let orchestrator = SyncOrchestrator::new(
        PgSourceReader::new(&config.source_conn),
        MsSqlTargetWriter::new(&config.target_conn),
    );
    let summary = orchestrator
        .run_entries(config.tables.iter().map(|entry| entry.as_ref()))
        .await;

    output::log_summary(&summary);
}
