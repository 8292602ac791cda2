use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// One result row. Values are ordered exactly as the query projected them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Tabular result handed from a source read to a target write.
///
/// Binding is positional: column `i` of every row goes to parameter `i + 1`
/// of the insert statement. Column names are kept for reference only; they
/// never drive binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        RowSet { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns per row. Falls back to the first row's width when the
    /// driver did not report column metadata.
    pub fn column_count(&self) -> usize {
        if !self.columns.is_empty() {
            return self.columns.len();
        }
        self.rows.first().map_or(0, Row::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_without_metadata() {
        let rows = RowSet::new(
            vec![],
            vec![Row::new(vec![Value::Int(1), Value::Null, Value::String("x".into())])],
        );
        assert_eq!(rows.column_count(), 3);
        assert_eq!(RowSet::default().column_count(), 0);
    }
}
