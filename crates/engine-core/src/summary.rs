use crate::error::SyncError;
use model::pagination::watermark::Watermark;

/// Row counts for a table that synced without error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Rows removed by the delete step; `None` for strategies without one.
    pub deleted: Option<u64>,
    pub selected: usize,
    pub inserted: usize,
    /// Target watermark read before selecting, for incremental tables.
    pub watermark: Option<Watermark>,
}

#[derive(Debug)]
pub enum TableOutcome {
    Synced(TableStats),
    /// The table's configuration was unusable; nothing was executed for it.
    Skipped { reason: String },
    Failed(SyncError),
}

#[derive(Debug)]
pub struct TableReport {
    pub table: String,
    pub outcome: TableOutcome,
}

/// Result of one pass over the configured tables, in configuration order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tables: Vec<TableReport>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, table: impl Into<String>, outcome: TableOutcome) {
        self.tables.push(TableReport {
            table: table.into(),
            outcome,
        });
    }

    pub fn synced(&self) -> usize {
        self.count(|outcome| matches!(outcome, TableOutcome::Synced(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, TableOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, TableOutcome::Failed(_)))
    }

    pub fn total_inserted(&self) -> usize {
        self.tables
            .iter()
            .filter_map(|report| match &report.outcome {
                TableOutcome::Synced(stats) => Some(stats.inserted),
                _ => None,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&TableOutcome) -> bool) -> usize {
        self.tables.iter().filter(|report| pred(&report.outcome)).count()
    }
}
