use crate::core::identifiers::SqlIdent;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_END_TIME_COLUMN: &str = "cdr_ended_at";
pub const DEFAULT_ID_COLUMN: &str = "cdr_id";

/// Ordering key of the most recently transferred record in a target table.
///
/// Both parts are present or both are absent; the constructors are the only
/// way to build one so the pair cannot drift.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Watermark {
    end_time: Option<DateTime<FixedOffset>>,
    id: Option<Uuid>,
}

impl Watermark {
    /// No watermark: the target table is empty.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(end_time: DateTime<FixedOffset>, id: Uuid) -> Self {
        Watermark {
            end_time: Some(end_time),
            id: Some(id),
        }
    }

    pub fn is_none(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn end_time(&self) -> Option<DateTime<FixedOffset>> {
        self.end_time
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }
}

/// Columns that carry the watermark in both the source projection and the
/// target table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WatermarkColumns {
    pub end_time: SqlIdent,
    pub id: SqlIdent,
}

impl Default for WatermarkColumns {
    fn default() -> Self {
        WatermarkColumns {
            end_time: SqlIdent::from_static(DEFAULT_END_TIME_COLUMN),
            id: SqlIdent::from_static(DEFAULT_ID_COLUMN),
        }
    }
}
