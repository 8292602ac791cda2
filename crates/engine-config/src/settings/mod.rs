use crate::{
    error::ConfigError,
    settings::file::{AppSettings, TableSection},
};
use model::{
    core::identifiers::SqlIdent,
    execution::{
        errors::TableConfigError,
        spec::{InsertMode, SyncSpec, SyncType},
    },
    pagination::watermark::WatermarkColumns,
};
use std::path::Path;
use tracing::{info, warn};

pub mod file;

/// A configured table: its spec, or the reason it cannot run.
pub type TableEntry = Result<SyncSpec, TableConfigError>;

/// Immutable configuration for one run, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source_conn: String,
    pub target_conn: String,
    pub insert_mode: InsertMode,
    pub tables: Vec<TableEntry>,
}

impl SyncConfig {
    /// Keeps only the named tables, preserving configured order.
    pub fn retain_tables(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.tables.retain(|entry| {
            let table = match entry {
                Ok(spec) => &spec.table_name,
                Err(err) => &err.table,
            };
            names.iter().any(|name| name.eq_ignore_ascii_case(table))
        });
    }

    /// Forces one insert mode onto every table.
    pub fn override_insert_mode(&mut self, mode: InsertMode) {
        self.insert_mode = mode;
        for spec in self.tables.iter_mut().flatten() {
            spec.insert_mode = mode;
        }
    }

    pub fn specs(&self) -> impl Iterator<Item = &SyncSpec> {
        self.tables.iter().flatten()
    }
}

/// Reads and validates the settings file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<SyncConfig, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Loading configuration");
    load_from_str(&source)
}

pub fn load_from_str(source: &str) -> Result<SyncConfig, ConfigError> {
    let settings: AppSettings = serde_json::from_str(source)?;

    let source_conn = required(settings.connection_strings.postgres, "PostgreSQL")?;
    let target_conn = required(settings.connection_strings.mssql, "MS SQL")?;

    if settings.sync_tables_and_queries.is_empty() {
        return Err(ConfigError::NoTables);
    }

    let insert_mode = match settings.insert_mode.as_deref() {
        Some(mode) => mode
            .parse::<InsertMode>()
            .map_err(ConfigError::InvalidInsertMode)?,
        None => InsertMode::default(),
    };

    let tables: Vec<TableEntry> = settings
        .sync_tables_and_queries
        .into_iter()
        .map(|(name, section)| table_entry(name, section, insert_mode))
        .collect();

    info!(tables = tables.len(), "Loaded {} table sections", tables.len());
    Ok(SyncConfig {
        source_conn,
        target_conn,
        insert_mode,
        tables,
    })
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingConnectionString(name))
}

fn table_entry(name: String, section: serde_json::Value, default_mode: InsertMode) -> TableEntry {
    let section: TableSection = serde_json::from_value(section)
        .map_err(|e| TableConfigError::new(&name, format!("malformed section: {e}")))?;

    let tag = section.sync_type.as_deref().map(str::trim).unwrap_or_default();
    if tag.is_empty() {
        return Err(TableConfigError::new(&name, "SyncType is not configured"));
    }
    let (sync_type, recognised) = SyncType::from_tag(tag);
    if !recognised {
        warn!(table = %name, sync_type = tag, "Unrecognised SyncType, falling back to {}", SyncType::FullSync);
    }

    let insert_mode = match section.insert_mode.as_deref() {
        Some(mode) => mode
            .parse::<InsertMode>()
            .map_err(|e| TableConfigError::new(&name, e))?,
        None => default_mode,
    };

    let mut watermark = WatermarkColumns::default();
    if let Some(column) = section.watermark_column {
        watermark.end_time = ident(&name, &column)?;
    }
    if let Some(column) = section.watermark_id_column {
        watermark.id = ident(&name, &column)?;
    }

    let mut spec = SyncSpec::new(
        &name,
        sync_type,
        section.select_query.unwrap_or_default(),
        section.insert_query.unwrap_or_default(),
    )
    .with_watermark(watermark)
    .with_insert_mode(insert_mode);
    if let Some(delete_query) = section.delete_query {
        spec = spec.with_delete_query(delete_query);
    }

    Ok(spec)
}

fn ident(table: &str, column: &str) -> Result<SqlIdent, TableConfigError> {
    SqlIdent::new(column).map_err(|e| TableConfigError::new(table, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SETTINGS: &str = r#"{
        "ConnectionStrings": {
            "PostgreSqlConnection": "host=pbx user=reader dbname=database_single",
            "MsSqlConnection": "Server=tcp:dwh,1433;Database=telephony;User Id=sync;Password=secret"
        },
        "SyncTablesAndQueries": {
            "users": {
                "SyncType": "Delete_and_Insert",
                "SelectQuery": "SELECT id, name FROM users",
                "InsertQuery": "INSERT INTO users VALUES (@value1, @value2)",
                "DeleteQuery": "DELETE FROM users"
            },
            "calls": {
                "SyncType": "Insert_latest",
                "SelectQuery": "SELECT cdr_id, cdr_ended_at FROM cdroutput",
                "InsertQuery": "INSERT INTO calls VALUES (@P1, @P2)",
                "InsertMode": "Transactional"
            },
            "archive": {
                "SelectQuery": "SELECT 1",
                "InsertQuery": "INSERT INTO archive VALUES (@P1)"
            },
            "agents": {
                "SyncType": "Mirror",
                "SelectQuery": "SELECT 1",
                "InsertQuery": "INSERT INTO agents VALUES (@P1)",
                "DeleteQuery": "DELETE FROM agents"
            }
        }
    }"#;

    #[test]
    fn test_tables_keep_file_order() {
        let config = load_from_str(SETTINGS).unwrap();
        let names: Vec<&str> = config
            .tables
            .iter()
            .map(|entry| match entry {
                Ok(spec) => spec.table_name.as_str(),
                Err(err) => err.table.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["users", "calls", "archive", "agents"]);
    }

    #[test]
    fn test_sections_resolve_to_specs() {
        let config = load_from_str(SETTINGS).unwrap();
        assert_eq!(config.insert_mode, InsertMode::BestEffort);

        let users = config.tables[0].as_ref().unwrap();
        assert_eq!(users.sync_type, SyncType::DeleteAndInsert);
        assert_eq!(users.delete_query(), Some("DELETE FROM users"));

        let calls = config.tables[1].as_ref().unwrap();
        assert_eq!(calls.sync_type, SyncType::InsertLatest);
        assert_eq!(calls.insert_mode, InsertMode::Transactional);
        assert_eq!(calls.watermark, WatermarkColumns::default());
        assert_eq!(calls.delete_query(), None);

        let agents = config.tables[3].as_ref().unwrap();
        assert_eq!(agents.sync_type, SyncType::FullSync);
    }

    #[test]
    fn test_missing_sync_type_only_fails_that_table() {
        let config = load_from_str(SETTINGS).unwrap();
        let err = config.tables[2].as_ref().unwrap_err();
        assert_eq!(err.table, "archive");
        assert!(err.reason.contains("SyncType"));
        assert_eq!(config.specs().count(), 3);
    }

    #[test]
    fn test_missing_connection_string_is_fatal() {
        let err = load_from_str(
            r#"{ "ConnectionStrings": { "PostgreSqlConnection": "host=pbx" },
                 "SyncTablesAndQueries": { "t": { "SyncType": "Full_sync" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingConnectionString("MS SQL")));

        let err = load_from_str(
            r#"{ "ConnectionStrings": { "PostgreSqlConnection": " ", "MsSqlConnection": "Server=x" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingConnectionString("PostgreSQL")));
    }

    #[test]
    fn test_empty_table_list_is_fatal() {
        let err = load_from_str(
            r#"{ "ConnectionStrings": { "PostgreSqlConnection": "host=pbx", "MsSqlConnection": "Server=x" },
                 "SyncTablesAndQueries": {} }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NoTables));
    }

    #[test]
    fn test_invalid_watermark_column_fails_table() {
        let config = load_from_str(
            r#"{ "ConnectionStrings": { "PostgreSqlConnection": "host=pbx", "MsSqlConnection": "Server=x" },
                 "SyncTablesAndQueries": { "calls": {
                    "SyncType": "Insert_latest",
                    "SelectQuery": "SELECT 1",
                    "InsertQuery": "INSERT INTO calls VALUES (@P1)",
                    "WatermarkColumn": "ended_at; DROP TABLE calls"
                 } } }"#,
        )
        .unwrap();
        let err = config.tables[0].as_ref().unwrap_err();
        assert_eq!(err.table, "calls");
    }

    #[test]
    fn test_retain_and_override() {
        let mut config = load_from_str(SETTINGS).unwrap();
        config.retain_tables(&["CALLS".to_string(), "archive".to_string()]);
        assert_eq!(config.tables.len(), 2);

        config.override_insert_mode(InsertMode::Transactional);
        assert!(config.specs().all(|s| s.insert_mode == InsertMode::Transactional));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SETTINGS.as_bytes()).unwrap();
        let config = load(file.path()).unwrap();
        assert_eq!(config.tables.len(), 4);
        assert!(config.source_conn.starts_with("host=pbx"));

        let err = load(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
