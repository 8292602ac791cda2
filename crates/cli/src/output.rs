use crate::error::CliError;
use engine_config::SyncConfig;
use engine_core::{RunSummary, TableOutcome};
use serde_json::{Value, json};
use tracing::{error, info, warn};

fn plans_value(config: &SyncConfig) -> Result<Value, CliError> {
    let tables = config
        .tables
        .iter()
        .map(|entry| match entry {
            Ok(spec) => serde_json::to_value(spec),
            Err(err) => Ok(json!({ "table_name": err.table, "error": err.reason })),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(json!({
        "insert_mode": config.insert_mode,
        "tables": tables,
    }))
}

/// Resolved table plans as pretty JSON. Connection strings are left out.
pub fn plans_json(config: &SyncConfig) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&plans_value(config)?)?)
}

pub fn log_summary(summary: &RunSummary) {
    for report in &summary.tables {
        let table = report.table.as_str();
        match &report.outcome {
            TableOutcome::Synced(stats) => info!(
                table,
                deleted = stats.deleted,
                selected = stats.selected,
                inserted = stats.inserted,
                watermark = ?stats.watermark.and_then(|w| w.end_time()),
                "Table '{table}' synced"
            ),
            TableOutcome::Skipped { reason } => warn!(table, reason = %reason, "Table '{table}' skipped"),
            TableOutcome::Failed(err) => error!(table, kind = err.kind(), error = %err, "Table '{table}' failed"),
        }
    }
    info!(
        synced = summary.synced(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        inserted = summary.total_inserted(),
        "Run finished"
    );
}
