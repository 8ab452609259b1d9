//! Query execution and row materialization
//!
//! Submits validated SQL through the shared pool and decodes each row of
//! the unknown, query-dependent result shape into JSON. A result schema is
//! only known at execution time, so cell decoding is driven by the declared
//! Postgres type of each column.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Executor, PgPool, Row, TypeInfo, ValueRef};

use crate::error::GatewayError;

/// Result of an ad-hoc query: ordered column names plus one JSON object per
/// row. Every row object carries exactly the column key set, in column
/// order, with explicit nulls for NULL cells.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// Execute validated SQL and materialize the full result set in memory.
///
/// All rows are decoded before anything is returned; a decode failure on
/// any row fails the whole request rather than producing a partial result.
pub async fn run_query(pool: &PgPool, sql: &str) -> Result<QueryResult, GatewayError> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))?;

    // An empty result set carries no row to read the descriptor from, so
    // fall back to preparing the statement for its column metadata.
    let columns: Vec<String> = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => describe_columns(pool, sql).await?,
    };

    let mut materialized = Vec::with_capacity(rows.len());
    for row in &rows {
        materialized.push(materialize_row(row)?);
    }

    Ok(QueryResult {
        columns,
        rows: materialized,
    })
}

async fn describe_columns(pool: &PgPool, sql: &str) -> Result<Vec<String>, GatewayError> {
    let describe = pool
        .describe(sql)
        .await
        .map_err(|e| GatewayError::Execution(format!("failed to get columns: {e}")))?;
    Ok(describe
        .columns
        .iter()
        .map(|c| c.name().to_string())
        .collect())
}

/// Decode one row into a JSON object keyed by column name.
fn materialize_row(row: &PgRow) -> Result<Map<String, Value>, GatewayError> {
    let mut object = Map::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), decode_cell(row, idx)?);
    }
    Ok(object)
}

/// Decode a single cell by its declared Postgres type.
///
/// The mapping is a closed variant: null, bool, number, string, or a
/// textual rendering for types with no direct JSON equivalent. Types the
/// gateway does not know attempt a plain string decode and otherwise fail
/// the request.
fn decode_cell(row: &PgRow, idx: usize) -> Result<Value, GatewayError> {
    let raw = row
        .try_get_raw(idx)
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Bool(get::<bool>(row, idx)?),
        "INT2" => Value::Number(Number::from(get::<i16>(row, idx)?)),
        "INT4" => Value::Number(Number::from(get::<i32>(row, idx)?)),
        "INT8" => Value::Number(Number::from(get::<i64>(row, idx)?)),
        "FLOAT4" => float_value(get::<f32>(row, idx)? as f64),
        "FLOAT8" => float_value(get::<f64>(row, idx)?),
        "NUMERIC" => Value::String(get::<rust_decimal::Decimal>(row, idx)?.to_string()),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "UNKNOWN" => {
            Value::String(get::<String>(row, idx)?)
        }
        "BYTEA" => Value::String(BASE64.encode(get::<Vec<u8>>(row, idx)?)),
        "UUID" => Value::String(get::<uuid::Uuid>(row, idx)?.to_string()),
        "DATE" => Value::String(get::<chrono::NaiveDate>(row, idx)?.to_string()),
        "TIME" => Value::String(get::<chrono::NaiveTime>(row, idx)?.to_string()),
        "TIMESTAMP" => Value::String(get::<chrono::NaiveDateTime>(row, idx)?.to_string()),
        "TIMESTAMPTZ" => {
            Value::String(get::<chrono::DateTime<chrono::Utc>>(row, idx)?.to_rfc3339())
        }
        "JSON" | "JSONB" => get::<Value>(row, idx)?,
        "TEXT[]" => Value::Array(
            get::<Vec<String>>(row, idx)?
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        "INT4[]" => Value::Array(
            get::<Vec<i32>>(row, idx)?
                .into_iter()
                .map(|v| Value::Number(Number::from(v)))
                .collect(),
        ),
        "INT8[]" => Value::Array(
            get::<Vec<i64>>(row, idx)?
                .into_iter()
                .map(|v| Value::Number(Number::from(v)))
                .collect(),
        ),
        other => match row.try_get::<String, _>(idx) {
            Ok(s) => Value::String(s),
            Err(_) => {
                return Err(GatewayError::Decode(format!(
                    "unsupported column type {} for column {}",
                    other,
                    row.columns()[idx].name()
                )))
            }
        },
    };

    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, idx: usize) -> Result<T, GatewayError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<T, _>(idx)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

/// JSON numbers cannot carry NaN or infinity; render those textually.
fn float_value(v: f64) -> Value {
    Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_value_finite() {
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
        assert_eq!(float_value(0.0), serde_json::json!(0.0));
    }

    #[test]
    fn test_float_value_non_finite_falls_back_to_text() {
        assert_eq!(float_value(f64::NAN), Value::String("NaN".to_string()));
        assert_eq!(float_value(f64::INFINITY), Value::String("inf".to_string()));
    }

    #[test]
    fn test_query_result_serialization() {
        let mut row = Map::new();
        row.insert("x".to_string(), Value::Number(1.into()));
        row.insert("y".to_string(), Value::Null);

        let result = QueryResult {
            columns: vec!["x".to_string(), "y".to_string()],
            rows: vec![row],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "columns": ["x", "y"],
                "rows": [{"x": 1, "y": null}],
            })
        );
    }

    #[test]
    fn test_null_cell_is_present_not_absent() {
        let mut row = Map::new();
        row.insert("a".to_string(), Value::Null);

        let result = QueryResult {
            columns: vec!["a".to_string()],
            rows: vec![row],
        };

        let text = serde_json::to_string(&result).unwrap();
        assert!(text.contains(r#""a":null"#));
    }
}
