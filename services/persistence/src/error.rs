use thiserror::Error;

/// Connectivity or operation failure in a backing service.
///
/// Retry policy belongs to the caller; nothing here retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cache unavailable: {0}")]
    Cache(String),

    #[error("store unavailable: {0}")]
    Store(String),

    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Cache(e.to_string())
    }
}

impl From<clickhouse::error::Error> for StoreError {
    fn from(e: clickhouse::error::Error) -> Self {
        StoreError::Store(e.to_string())
    }
}
