use clap::Subcommand;
use model::execution::spec::InsertMode;

const DEFAULT_CONFIG: &str = "appsettings.json";

#[derive(Subcommand)]
pub enum Commands {
    /// Sync every configured table from PostgreSQL into SQL Server
    Sync {
        #[arg(long, default_value = DEFAULT_CONFIG, help = "Config file path")]
        config: String,

        #[arg(
            long = "table",
            value_name = "NAME",
            help = "Only sync the named table; may be given more than once"
        )]
        tables: Vec<String>,

        #[arg(
            long,
            help = "Override the configured insert mode (best-effort or transactional)"
        )]
        insert_mode: Option<InsertMode>,
    },
    /// Load the configuration and print the resolved table plans as JSON
    CheckConfig {
        #[arg(long, default_value = DEFAULT_CONFIG, help = "Config file path")]
        config: String,
    },
    /// Open both configured connections and run `SELECT 1` on each
    TestConn {
        #[arg(long, default_value = DEFAULT_CONFIG, help = "Config file path")]
        config: String,
    },
}
