use crate::pagination::watermark::WatermarkColumns;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Synchronization strategy selected per table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncType {
    /// Run the configured delete, then copy every source row.
    DeleteAndInsert,
    /// Copy only source rows newer than the target's watermark.
    InsertLatest,
    /// Same steps as `DeleteAndInsert`; the fallback for unknown tags.
    #[default]
    FullSync,
}

impl SyncType {
    /// Resolves a configured tag. Unknown tags fall back to `FullSync`; the
    /// second element reports whether the tag was recognised.
    pub fn from_tag(tag: &str) -> (SyncType, bool) {
        match tag.trim() {
            "Delete_and_Insert" | "DeleteAndInsert" => (SyncType::DeleteAndInsert, true),
            "Insert_latest" | "InsertLatest" => (SyncType::InsertLatest, true),
            "Full_sync" | "FullSync" => (SyncType::FullSync, true),
            _ => (SyncType::FullSync, false),
        }
    }

    pub fn requires_delete(&self) -> bool {
        matches!(self, SyncType::DeleteAndInsert | SyncType::FullSync)
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncType::DeleteAndInsert => write!(f, "Delete_and_Insert"),
            SyncType::InsertLatest => write!(f, "Insert_latest"),
            SyncType::FullSync => write!(f, "Full_sync"),
        }
    }
}

/// How the target writer treats a failure part-way through a row batch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Rows before the failing one stay committed.
    #[default]
    BestEffort,
    /// The whole batch runs in one target transaction and is rolled back on
    /// the first failure.
    Transactional,
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "besteffort" => Ok(InsertMode::BestEffort),
            "transactional" => Ok(InsertMode::Transactional),
            other => Err(format!("Unknown insert mode: {other}")),
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::BestEffort => write!(f, "BestEffort"),
            InsertMode::Transactional => write!(f, "Transactional"),
        }
    }
}

/// Per-table synchronization settings, loaded once per run.
///
/// Query fields are kept verbatim from configuration; an empty string means
/// "not configured" and is rejected at dispatch time for the strategies that
/// need it, so one badly configured table never stops the others.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyncSpec {
    pub table_name: String,
    pub sync_type: SyncType,
    pub select_query: String,
    pub insert_query: String,
    pub delete_query: Option<String>,
    pub watermark: WatermarkColumns,
    pub insert_mode: InsertMode,
}

impl SyncSpec {
    pub fn new(
        table_name: impl Into<String>,
        sync_type: SyncType,
        select_query: impl Into<String>,
        insert_query: impl Into<String>,
    ) -> Self {
        SyncSpec {
            table_name: table_name.into(),
            sync_type,
            select_query: select_query.into(),
            insert_query: insert_query.into(),
            delete_query: None,
            watermark: WatermarkColumns::default(),
            insert_mode: InsertMode::default(),
        }
    }

    pub fn with_delete_query(mut self, delete_query: impl Into<String>) -> Self {
        self.delete_query = Some(delete_query.into());
        self
    }

    pub fn with_watermark(mut self, watermark: WatermarkColumns) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_insert_mode(mut self, insert_mode: InsertMode) -> Self {
        self.insert_mode = insert_mode;
        self
    }

    /// The delete statement, if one is configured and not blank.
    pub fn delete_query(&self) -> Option<&str> {
        self.delete_query
            .as_deref()
            .filter(|query| !query.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_type_tags() {
        assert_eq!(
            SyncType::from_tag("Delete_and_Insert"),
            (SyncType::DeleteAndInsert, true)
        );
        assert_eq!(
            SyncType::from_tag("Insert_latest"),
            (SyncType::InsertLatest, true)
        );
        assert_eq!(SyncType::from_tag("Full_sync"), (SyncType::FullSync, true));
        assert_eq!(SyncType::from_tag("Mirror"), (SyncType::FullSync, false));
    }

    #[test]
    fn test_requires_delete() {
        assert!(SyncType::DeleteAndInsert.requires_delete());
        assert!(SyncType::FullSync.requires_delete());
        assert!(!SyncType::InsertLatest.requires_delete());
    }

    #[test]
    fn test_insert_mode_parsing() {
        assert_eq!("best-effort".parse::<InsertMode>(), Ok(InsertMode::BestEffort));
        assert_eq!("Transactional".parse::<InsertMode>(), Ok(InsertMode::Transactional));
        assert!("atomic".parse::<InsertMode>().is_err());
    }

    #[test]
    fn test_blank_delete_query_is_absent() {
        let spec = SyncSpec::new("calls", SyncType::FullSync, "SELECT 1", "INSERT")
            .with_delete_query("   ");
        assert_eq!(spec.delete_query(), None);

        let spec = spec.with_delete_query("DELETE FROM calls");
        assert_eq!(spec.delete_query(), Some("DELETE FROM calls"));
    }
}
