use model::core::value::Value;
use std::borrow::Cow;
use tiberius::{ColumnData, ToSql};

/// Binds a [`Value`] as a typed TDS parameter.
///
/// Values travel as protocol-level parameters and are never spliced into
/// the statement text.
pub struct SqlParam<'a>(&'a Value);

impl<'a> SqlParam<'a> {
    pub fn new(value: &'a Value) -> Self {
        SqlParam(value)
    }
}

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> ColumnData<'_> {
        match self.0 {
            Value::Null => ColumnData::String(None),
            Value::Boolean(v) => ColumnData::Bit(Some(*v)),
            Value::SmallInt(v) => ColumnData::I16(Some(*v)),
            Value::Int(v) => ColumnData::I32(Some(*v)),
            Value::BigInt(v) => ColumnData::I64(Some(*v)),
            Value::Float(v) => ColumnData::F32(Some(*v)),
            Value::Double(v) => ColumnData::F64(Some(*v)),
            Value::Decimal(v) => v.to_sql(),
            Value::String(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
            Value::Uuid(v) => ColumnData::Guid(Some(*v)),
            Value::Bytes(v) => ColumnData::Binary(Some(Cow::Borrowed(v.as_slice()))),
            Value::Date(v) => v.to_sql(),
            Value::Time(v) => v.to_sql(),
            Value::Timestamp(v) => v.to_sql(),
            Value::TimestampTz(v) => v.to_sql(),
            Value::Json(v) => ColumnData::String(Some(Cow::Owned(v.to_string()))),
        }
    }
}

/// Wraps every value of a row, in column order.
pub fn row_params(values: &[Value]) -> Vec<SqlParam<'_>> {
    values.iter().map(SqlParam::new).collect()
}

pub fn param_refs<'a>(params: &'a [SqlParam<'a>]) -> Vec<&'a dyn ToSql> {
    params.iter().map(|p| p as &dyn ToSql).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    #[test]
    fn test_null_binds_as_null_parameter() {
        let value = Value::Null;
        assert!(matches!(SqlParam::new(&value).to_sql(), ColumnData::String(None)));
    }

    #[test]
    fn test_scalar_bindings() {
        let value = Value::Boolean(true);
        assert!(matches!(SqlParam::new(&value).to_sql(), ColumnData::Bit(Some(true))));
        let value = Value::Int(100_000);
        assert!(matches!(SqlParam::new(&value).to_sql(), ColumnData::I32(Some(100_000))));
        let value = Value::BigInt(1 << 40);
        assert!(matches!(SqlParam::new(&value).to_sql(), ColumnData::I64(Some(v)) if v == 1 << 40));
    }

    #[test]
    fn test_string_binding_is_not_escaped() {
        let value = Value::String("O'Brien'; DROP TABLE calls; --".to_string());
        match SqlParam::new(&value).to_sql() {
            ColumnData::String(Some(s)) => assert_eq!(s, "O'Brien'; DROP TABLE calls; --"),
            other => panic!("Expected String ColumnData, got {other:?}"),
        }
    }

    #[test]
    fn test_uuid_and_timestamptz_bindings() {
        let id = Uuid::new_v4();
        let value = Value::Uuid(id);
        assert!(matches!(SqlParam::new(&value).to_sql(), ColumnData::Guid(Some(v)) if v == id));

        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 5)
            .unwrap();
        let value = Value::TimestampTz(ts);
        assert!(matches!(
            SqlParam::new(&value).to_sql(),
            ColumnData::DateTimeOffset(Some(_))
        ));
    }

    #[test]
    fn test_row_params_keep_column_order() {
        let row = vec![Value::Int(1), Value::Null, Value::String("x".into())];
        let params = row_params(&row);
        let refs = param_refs(&params);
        assert_eq!(refs.len(), 3);
        assert!(matches!(refs[0].to_sql(), ColumnData::I32(Some(1))));
        assert!(matches!(refs[1].to_sql(), ColumnData::String(None)));
        assert!(matches!(refs[2].to_sql(), ColumnData::String(Some(_))));
    }
}
