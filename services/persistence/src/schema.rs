//! `calendar` table provisioning
//!
//! Column order matches [`crate::clickhouse_writer::CalendarRow`]; RowBinary
//! inserts are positional.

use crate::error::StoreError;

pub const DEFAULT_TABLE: &str = "calendar";

/// Reject table names that would need quoting.
pub fn validate_table_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::Config(format!("invalid table name: {:?}", name)))
    }
}

/// Idempotent DDL for the calendar table.
pub fn create_table_sql(table: &str) -> Result<String, StoreError> {
    validate_table_name(table)?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            warehouse_name String,
            acceptance_type String,
            date DateTime('UTC'),
            coefficient Float64
        ) ENGINE = MergeTree()
        ORDER BY (warehouse_name, acceptance_type, date)"
    ))
}
