use serde::Deserialize;

/// On-disk shape of the settings file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    #[serde(default)]
    pub connection_strings: ConnectionStrings,

    #[serde(default)]
    pub insert_mode: Option<String>,

    /// Table name to section, in file order.
    #[serde(default)]
    pub sync_tables_and_queries: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionStrings {
    #[serde(rename = "PostgreSqlConnection", default)]
    pub postgres: Option<String>,

    #[serde(rename = "MsSqlConnection", default)]
    pub mssql: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSection {
    pub sync_type: Option<String>,
    pub select_query: Option<String>,
    pub insert_query: Option<String>,
    pub delete_query: Option<String>,
    pub watermark_column: Option<String>,
    pub watermark_id_column: Option<String>,
    pub insert_mode: Option<String>,
}
