use crate::error::DbError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use model::{
    core::value::Value,
    records::row::{Row, RowSet},
};
use rust_decimal::Decimal;
use tokio_postgres::{
    Row as PgRow,
    types::{FromSql, Json as PgJson, Type},
};
use uuid::Uuid;

/// How a source column is read into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    Boolean,
    SmallInt,
    Int,
    BigInt,
    Oid,
    Float,
    Double,
    Decimal,
    Text,
    Uuid,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Json,
}

/// Picks the decoder for a column type. Types with no lossless mapping
/// (intervals, enums, arrays, network types, ...) are a decode error so the
/// table fails instead of copying NULLs.
fn decoder_for(column: &str, ty: &Type) -> Result<Decoder, DbError> {
    let decoder = match ty.name() {
        "bool" => Decoder::Boolean,
        "int2" => Decoder::SmallInt,
        "int4" => Decoder::Int,
        "int8" => Decoder::BigInt,
        "oid" => Decoder::Oid,
        "float4" => Decoder::Float,
        "float8" => Decoder::Double,
        "numeric" => Decoder::Decimal,
        "uuid" => Decoder::Uuid,
        "bytea" => Decoder::Bytes,
        "date" => Decoder::Date,
        "time" => Decoder::Time,
        "timestamp" => Decoder::Timestamp,
        "timestamptz" => Decoder::TimestampTz,
        "json" | "jsonb" => Decoder::Json,
        // text, varchar, bpchar, name, citext and other text-like types
        _ if <String as FromSql<'_>>::accepts(ty) => Decoder::Text,
        other => {
            return Err(DbError::Decode(format!(
                "column '{column}' has unsupported type '{other}'"
            )));
        }
    };
    Ok(decoder)
}

/// Converts driver rows into a positional [`RowSet`].
pub fn to_row_set(columns: Vec<String>, rows: &[PgRow]) -> Result<RowSet, DbError> {
    let Some(first) = rows.first() else {
        return Ok(RowSet::new(columns, Vec::new()));
    };
    let decoders = first
        .columns()
        .iter()
        .map(|column| decoder_for(column.name(), column.type_()))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = rows
        .iter()
        .map(|row| to_row(row, &decoders))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RowSet::new(columns, rows))
}

fn to_row(row: &PgRow, decoders: &[Decoder]) -> Result<Row, DbError> {
    decoders
        .iter()
        .enumerate()
        .map(|(idx, decoder)| decode_value(row, idx, *decoder))
        .collect::<Result<Vec<_>, _>>()
        .map(Row::new)
}

fn decode_value(row: &PgRow, idx: usize, decoder: Decoder) -> Result<Value, DbError> {
    let value = match decoder {
        Decoder::Boolean => get::<bool>(row, idx)?.map(Value::Boolean),
        Decoder::SmallInt => get::<i16>(row, idx)?.map(Value::SmallInt),
        Decoder::Int => get::<i32>(row, idx)?.map(Value::Int),
        Decoder::BigInt => get::<i64>(row, idx)?.map(Value::BigInt),
        Decoder::Oid => get::<u32>(row, idx)?.map(|v| Value::BigInt(v as i64)),
        Decoder::Float => get::<f32>(row, idx)?.map(Value::Float),
        Decoder::Double => get::<f64>(row, idx)?.map(Value::Double),
        Decoder::Decimal => get::<Decimal>(row, idx)?.map(Value::Decimal),
        Decoder::Text => get::<String>(row, idx)?.map(Value::String),
        Decoder::Uuid => get::<Uuid>(row, idx)?.map(Value::Uuid),
        Decoder::Bytes => get::<Vec<u8>>(row, idx)?.map(Value::Bytes),
        Decoder::Date => get::<NaiveDate>(row, idx)?.map(Value::Date),
        Decoder::Time => get::<NaiveTime>(row, idx)?.map(Value::Time),
        Decoder::Timestamp => get::<NaiveDateTime>(row, idx)?.map(Value::Timestamp),
        Decoder::TimestampTz => get::<DateTime<FixedOffset>>(row, idx)?.map(Value::TimestampTz),
        Decoder::Json => {
            get::<PgJson<serde_json::Value>>(row, idx)?.map(|json| Value::Json(json.0))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn get<'a, T: FromSql<'a>>(row: &'a PgRow, idx: usize) -> Result<Option<T>, DbError> {
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        DbError::Decode(format!(
            "column '{}' ({}): {e}",
            row.columns()[idx].name(),
            row.columns()[idx].type_()
        ))
    })
}
