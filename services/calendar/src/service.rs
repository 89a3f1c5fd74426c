//! Calendar upload orchestration
//!
//! Per request: authenticate → validate → lock key → cache lookup →
//! (unchanged: done) | (changed: store append + cache update) → unlock.
//! Nothing touches the cache or the store before authentication and
//! validation have both passed.

use crate::auth::{AuthGate, Identity};
use crate::error::ServiceError;
use crate::key_lock::KeyLocks;
use clap::ValueEnum;
use persistence::{DedupCache, IngestWriter};
use std::slice;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::date::CalendarDate;
use types::entry::CalendarEntry;
use types::errors::ValidationError;

/// Wire response text for every successful upload, changed or not.
pub const SUCCESS_MESSAGE: &str = "Calendar updated successfully";

/// Which side of a change is written first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WriteOrder {
    /// Append the row, then record it in the cache. A failed append leaves
    /// the cache untouched, so retries re-attempt the write.
    #[default]
    StoreFirst,
    /// Record in the cache, then append. A failed append leaves the cache
    /// ahead of the store and later identical submissions are skipped.
    CacheFirst,
}

/// UTC instant as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireTimestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// Raw, unvalidated upload fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub warehouse_name: String,
    pub acceptance_type: String,
    pub date: Option<WireTimestamp>,
    pub coefficient: f64,
}

impl UploadRequest {
    fn into_entry(self) -> Result<CalendarEntry, ValidationError> {
        let ts = self.date.ok_or(ValidationError::MissingDate)?;
        let date = CalendarDate::from_timestamp(ts.seconds, ts.nanos)?;
        CalendarEntry::new(self.warehouse_name, self.acceptance_type, date, self.coefficient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// New value: one row appended and the cache updated.
    Updated,
    /// Same canonical value already cached: nothing written.
    Unchanged,
}

pub struct CalendarService {
    auth: AuthGate,
    cache: Arc<dyn DedupCache>,
    writer: Arc<dyn IngestWriter>,
    locks: KeyLocks,
    write_order: WriteOrder,
}

impl CalendarService {
    pub fn new(
        auth: AuthGate,
        cache: Arc<dyn DedupCache>,
        writer: Arc<dyn IngestWriter>,
        write_order: WriteOrder,
    ) -> Self {
        Self {
            auth,
            cache,
            writer,
            locks: KeyLocks::new(),
            write_order,
        }
    }

    /// Record a coefficient submission if it differs from the last one
    /// committed for its key.
    pub async fn upload_calendar(
        &self,
        credential: Option<&str>,
        request: UploadRequest,
    ) -> Result<UploadOutcome, ServiceError> {
        let identity = self.auth.validate(credential).map_err(|e| {
            warn!(error = %e, "rejected unauthenticated upload");
            e
        })?;

        let entry = request.into_entry().map_err(|e| {
            warn!(user = %identity.user, error = %e, "rejected invalid upload");
            e
        })?;

        self.commit_if_changed(&identity, entry).await
    }

    async fn commit_if_changed(
        &self,
        identity: &Identity,
        entry: CalendarEntry,
    ) -> Result<UploadOutcome, ServiceError> {
        let key = entry.key().canonical();
        let value = entry.coefficient.canonical();

        let _guard = self.locks.lock(&key).await;

        let cached = self.cache.get(&key).await.map_err(|e| {
            warn!(key = %key, error = %e, "cache lookup failed");
            e
        })?;

        if cached
            .as_deref()
            .is_some_and(|c| entry.coefficient.matches_canonical(c))
        {
            debug!(user = %identity.user, key = %key, coefficient = %value, "Data is unchanged, skipping update");
            return Ok(UploadOutcome::Unchanged);
        }

        match self.write_order {
            WriteOrder::StoreFirst => {
                self.append(&key, &entry).await?;
                if let Err(e) = self.cache.set(&key, &value).await {
                    // Row is durable; a retry will append it again.
                    warn!(key = %key, error = %e, "row committed but cache update failed");
                    return Err(e.into());
                }
            }
            WriteOrder::CacheFirst => {
                self.cache.set(&key, &value).await.map_err(|e| {
                    warn!(key = %key, error = %e, "cache update failed");
                    e
                })?;
                if let Err(e) = self.append(&key, &entry).await {
                    warn!(key = %key, coefficient = %value, "cache is ahead of the store");
                    return Err(e);
                }
            }
        }

        info!(
            user = %identity.user,
            key = %key,
            previous = cached.as_deref().unwrap_or("<none>"),
            coefficient = %value,
            "calendar change committed"
        );
        Ok(UploadOutcome::Updated)
    }

    async fn append(&self, key: &str, entry: &CalendarEntry) -> Result<(), ServiceError> {
        self.writer
            .append(slice::from_ref(entry))
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "store append failed");
                ServiceError::from(e)
            })
    }
}
