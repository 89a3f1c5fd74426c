//! ClickHouse-backed ingest writer
//!
//! One INSERT per batch over RowBinary. The `date` column is written as
//! midnight UTC of the calendar day.

use crate::error::StoreError;
use crate::schema::{create_table_sql, validate_table_name, DEFAULT_TABLE};
use crate::writer::IngestWriter;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::Serialize;
use tracing::{debug, info};
use types::entry::CalendarEntry;

/// Connection settings for the columnar store.
#[derive(Debug, Clone)]
pub struct ClickHouseConfig {
    pub url: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub table: String,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8123".to_string(),
            database: "default".to_string(),
            user: None,
            password: None,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

/// Wire row for the `calendar` table. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Row, Serialize)]
pub struct CalendarRow {
    pub warehouse_name: String,
    pub acceptance_type: String,
    /// `DateTime` is seconds since the epoch as `u32`.
    pub date: u32,
    pub coefficient: f64,
}

impl From<&CalendarEntry> for CalendarRow {
    fn from(entry: &CalendarEntry) -> Self {
        Self {
            warehouse_name: entry.warehouse_name.clone(),
            acceptance_type: entry.acceptance_type.clone(),
            date: entry.date.midnight_utc_secs(),
            coefficient: entry.coefficient.value(),
        }
    }
}

pub struct ClickHouseWriter {
    client: Client,
    table: String,
}

impl ClickHouseWriter {
    pub fn new(config: &ClickHouseConfig) -> Result<Self, StoreError> {
        validate_table_name(&config.table)?;

        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);
        if let Some(user) = &config.user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.password {
            client = client.with_password(password);
        }

        Ok(Self {
            client,
            table: config.table.clone(),
        })
    }

    /// Create the table if it does not exist yet.
    ///
    /// Also serves as the startup connectivity check.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let ddl = create_table_sql(&self.table)?;
        self.client.query(&ddl).execute().await?;
        info!(table = %self.table, "calendar table ready");
        Ok(())
    }
}

#[async_trait]
impl IngestWriter for ClickHouseWriter {
    async fn append(&self, entries: &[CalendarEntry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut insert = self.client.insert::<CalendarRow>(&self.table)?;
        for entry in entries {
            insert.write(&CalendarRow::from(entry)).await?;
        }
        insert.end().await?;

        debug!(table = %self.table, rows = entries.len(), "batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::date::CalendarDate;

    #[test]
    fn test_row_from_entry_truncates_to_midnight() {
        let date = CalendarDate::from_timestamp(1_704_067_200 + 45_000, 123).unwrap();
        let entry = CalendarEntry::new("Warehouse1", "TypeA", date, 1.23).unwrap();
        let row = CalendarRow::from(&entry);

        assert_eq!(
            row,
            CalendarRow {
                warehouse_name: "Warehouse1".into(),
                acceptance_type: "TypeA".into(),
                date: 1_704_067_200,
                coefficient: 1.23,
            }
        );
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let config = ClickHouseConfig {
            table: "calendar;--".into(),
            ..ClickHouseConfig::default()
        };
        assert!(matches!(
            ClickHouseWriter::new(&config),
            Err(StoreError::Config(_))
        ));
    }
}
