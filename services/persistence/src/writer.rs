//! Ingest writer contract and in-memory adapter
//!
//! Rows are immutable once appended. A batch is all-or-nothing from the
//! caller's point of view: an `Err` means no row of that batch is
//! guaranteed to be durable.

use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use types::entry::CalendarEntry;

#[async_trait]
pub trait IngestWriter: Send + Sync {
    /// Append a batch of rows. An empty batch is a no-op.
    async fn append(&self, entries: &[CalendarEntry]) -> Result<(), StoreError>;
}

/// Process-local append-only row log.
#[derive(Default)]
pub struct MemoryWriter {
    rows: Mutex<Vec<CalendarEntry>>,
    appends: AtomicU64,
    fail_appends: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `latency` inside every append, widening race windows.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Snapshot of every committed row in arrival order.
    pub fn rows(&self) -> Vec<CalendarEntry> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Number of `append` calls, including failed and empty ones.
    pub fn append_count(&self) -> u64 {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IngestWriter for MemoryWriter {
    async fn append(&self, entries: &[CalendarEntry]) -> Result<(), StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Store("injected append failure".into()));
        }
        if entries.is_empty() {
            return Ok(());
        }
        self.rows
            .lock()
            .map_err(|_| StoreError::Store("row log lock poisoned".into()))?
            .extend_from_slice(entries);
        Ok(())
    }
}
