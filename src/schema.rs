//! Schema introspection endpoints
//!
//! Fixed catalog queries over `pg_database` and `information_schema`.
//! Table names arrive as path parameters and are always bound (`$1`),
//! never spliced into the SQL text. Catalog domain types are cast to
//! `text`/`int4` so the driver decodes them as plain values.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::GatewayState;

/// Basic table information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TableInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: String,
}

/// Column information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub is_nullable: String,
    #[serde(rename = "default")]
    pub default_value: Option<String>,
    pub max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
}

/// Foreign key information
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ForeignKeyInfo {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// Complete schema for one table
#[derive(Debug, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseList {
    pub databases: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableList {
    pub tables: Vec<TableInfo>,
}

#[derive(Debug, Serialize)]
pub struct TableColumns {
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Serialize)]
pub struct TablePrimaryKeys {
    pub table_name: String,
    pub primary_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableForeignKeys {
    pub table_name: String,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

#[derive(Debug, Serialize)]
pub struct FullSchema {
    pub schema: Vec<TableSchema>,
}

const DATABASES_SQL: &str = "\
SELECT datname
FROM pg_database
WHERE datistemplate = false
ORDER BY datname";

const TABLES_SQL: &str = "\
SELECT table_name::text AS name, table_type::text AS table_type
FROM information_schema.tables
WHERE table_schema = 'public'
ORDER BY table_name";

const TABLE_NAMES_SQL: &str = "\
SELECT table_name::text
FROM information_schema.tables
WHERE table_schema = 'public'
ORDER BY table_name";

const COLUMNS_SQL: &str = "\
SELECT
    column_name::text AS name,
    data_type::text AS data_type,
    is_nullable::text AS is_nullable,
    column_default::text AS default_value,
    character_maximum_length::int4 AS max_length,
    numeric_precision::int4 AS numeric_precision,
    numeric_scale::int4 AS numeric_scale
FROM information_schema.columns
WHERE table_schema = 'public' AND table_name = $1
ORDER BY ordinal_position";

const PRIMARY_KEYS_SQL: &str = "\
SELECT column_name::text
FROM information_schema.key_column_usage
WHERE table_schema = 'public'
    AND table_name = $1
    AND constraint_name IN (
        SELECT constraint_name
        FROM information_schema.table_constraints
        WHERE constraint_type = 'PRIMARY KEY'
    )
ORDER BY ordinal_position";

const FOREIGN_KEYS_SQL: &str = "\
SELECT
    kcu.column_name::text AS \"column\",
    ccu.table_name::text AS foreign_table,
    ccu.column_name::text AS foreign_column
FROM information_schema.key_column_usage kcu
JOIN information_schema.referential_constraints rc
    ON kcu.constraint_name = rc.constraint_name
JOIN information_schema.constraint_column_usage ccu
    ON rc.unique_constraint_name = ccu.constraint_name
WHERE kcu.table_schema = 'public'
    AND kcu.table_name = $1
ORDER BY kcu.column_name";

pub async fn list_databases(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<DatabaseList>, GatewayError> {
    let databases = sqlx::query_scalar::<_, String>(DATABASES_SQL)
        .fetch_all(&state.pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))?;
    Ok(Json(DatabaseList { databases }))
}

pub async fn list_tables(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<TableList>, GatewayError> {
    let tables = sqlx::query_as::<_, TableInfo>(TABLES_SQL)
        .fetch_all(&state.pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))?;
    Ok(Json(TableList { tables }))
}

pub async fn table_columns(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<TableColumns>, GatewayError> {
    let columns = fetch_columns(&state.pool, &name).await?;
    Ok(Json(TableColumns {
        table_name: name,
        columns,
    }))
}

pub async fn table_primary_keys(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<TablePrimaryKeys>, GatewayError> {
    let primary_keys = fetch_primary_keys(&state.pool, &name).await?;
    Ok(Json(TablePrimaryKeys {
        table_name: name,
        primary_keys,
    }))
}

pub async fn table_foreign_keys(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<TableForeignKeys>, GatewayError> {
    let foreign_keys = fetch_foreign_keys(&state.pool, &name).await?;
    Ok(Json(TableForeignKeys {
        table_name: name,
        foreign_keys,
    }))
}

/// Full schema for every public table. A table whose catalog reads fail is
/// skipped rather than failing the whole response.
pub async fn full_schema(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<FullSchema>, GatewayError> {
    let tables = sqlx::query_scalar::<_, String>(TABLE_NAMES_SQL)
        .fetch_all(&state.pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))?;

    let mut schema = Vec::with_capacity(tables.len());
    for table in tables {
        match load_table_schema(&state.pool, &table).await {
            Ok(table_schema) => schema.push(table_schema),
            Err(e) => {
                tracing::warn!("Skipping table '{}' in schema dump: {}", table, e);
            }
        }
    }

    Ok(Json(FullSchema { schema }))
}

async fn load_table_schema(pool: &PgPool, table: &str) -> Result<TableSchema, GatewayError> {
    Ok(TableSchema {
        name: table.to_string(),
        columns: fetch_columns(pool, table).await?,
        primary_keys: fetch_primary_keys(pool, table).await?,
        foreign_keys: fetch_foreign_keys(pool, table).await?,
    })
}

async fn fetch_columns(pool: &PgPool, table: &str) -> Result<Vec<ColumnInfo>, GatewayError> {
    sqlx::query_as::<_, ColumnInfo>(COLUMNS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))
}

async fn fetch_primary_keys(pool: &PgPool, table: &str) -> Result<Vec<String>, GatewayError> {
    sqlx::query_scalar::<_, String>(PRIMARY_KEYS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))
}

async fn fetch_foreign_keys(
    pool: &PgPool,
    table: &str,
) -> Result<Vec<ForeignKeyInfo>, GatewayError> {
    sqlx::query_as::<_, ForeignKeyInfo>(FOREIGN_KEYS_SQL)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| GatewayError::Execution(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_info_serialization() {
        let col = ColumnInfo {
            name: "id".to_string(),
            data_type: "integer".to_string(),
            is_nullable: "NO".to_string(),
            default_value: None,
            max_length: None,
            numeric_precision: Some(32),
            numeric_scale: Some(0),
        };

        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "id",
                "data_type": "integer",
                "is_nullable": "NO",
                "default": null,
                "max_length": null,
                "numeric_precision": 32,
                "numeric_scale": 0,
            })
        );
    }

    #[test]
    fn test_table_info_renames_type() {
        let table = TableInfo {
            name: "users".to_string(),
            table_type: "BASE TABLE".to_string(),
        };
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({"name": "users", "type": "BASE TABLE"}));
    }
}
