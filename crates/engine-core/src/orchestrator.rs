use crate::{
    error::SyncError,
    strategy,
    summary::{RunSummary, TableOutcome},
};
use connectors::{SourceReader, TargetWriter};
use model::execution::{errors::TableConfigError, spec::SyncSpec};
use tracing::{error, info, warn};

/// Runs every configured table, in order, against one source and one target.
pub struct SyncOrchestrator<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> SyncOrchestrator<R, W>
where
    R: SourceReader,
    W: TargetWriter,
{
    pub fn new(reader: R, writer: W) -> Self {
        SyncOrchestrator { reader, writer }
    }

    pub async fn run(&self, specs: &[SyncSpec]) -> RunSummary {
        self.run_entries(specs.iter().map(Ok)).await
    }

    /// Like [`run`](Self::run), but also takes tables whose configuration
    /// failed to load. Those are logged and reported as skipped.
    pub async fn run_entries<'a, I>(&self, entries: I) -> RunSummary
    where
        I: IntoIterator<Item = Result<&'a SyncSpec, &'a TableConfigError>>,
    {
        let mut summary = RunSummary::default();

        for entry in entries {
            match entry {
                Ok(spec) => {
                    let outcome = self.sync_table(spec).await;
                    summary.record(&spec.table_name, outcome);
                }
                Err(err) => {
                    error!(table = %err.table, reason = %err.reason, "{err}");
                    summary.record(
                        &err.table,
                        TableOutcome::Skipped {
                            reason: err.reason.clone(),
                        },
                    );
                }
            }
        }

        info!(
            synced = summary.synced(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            inserted = summary.total_inserted(),
            "##### Synchronization completed #####"
        );
        summary
    }

    async fn sync_table(&self, spec: &SyncSpec) -> TableOutcome {
        let table = spec.table_name.as_str();

        if let Err(err) = validate(spec) {
            error!(table, reason = %err.reason, "{err}");
            return TableOutcome::Skipped { reason: err.reason };
        }

        info!(
            table,
            sync_type = %spec.sync_type,
            "##### Syncing table '{table}' with SyncType '{}' #####",
            spec.sync_type
        );

        match strategy::execute(spec, &self.reader, &self.writer).await {
            Ok(stats) => TableOutcome::Synced(stats),
            Err(SyncError::TableConfig(err)) => {
                error!(table, reason = %err.reason, "{err}");
                TableOutcome::Skipped { reason: err.reason }
            }
            Err(err) => {
                if matches!(err, SyncError::PartialInsert(_)) {
                    warn!(table, "Rows written before the failure remain in the target");
                }
                error!(
                    table,
                    kind = err.kind(),
                    error = %err,
                    "An error occurred while syncing table '{table}': {err}"
                );
                TableOutcome::Failed(err)
            }
        }
    }
}

/// Every strategy needs a select and an insert statement.
fn validate(spec: &SyncSpec) -> Result<(), TableConfigError> {
    if spec.select_query.trim().is_empty() || spec.insert_query.trim().is_empty() {
        return Err(TableConfigError::new(
            &spec.table_name,
            "Missing queries for table",
        ));
    }
    Ok(())
}
