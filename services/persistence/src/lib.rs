//! Persistence collaborators for calendar ingestion
//!
//! Two contracts, each with a networked adapter and an in-memory one:
//! - [`DedupCache`]: last committed coefficient per calendar key
//!   ([`RedisCache`], [`MemoryCache`])
//! - [`IngestWriter`]: append-only, batched row sink
//!   ([`ClickHouseWriter`], [`MemoryWriter`])
//!
//! The in-memory adapters count operations and can inject failures, which
//! is what the service tests observe.

pub mod cache;
pub mod clickhouse_writer;
pub mod error;
pub mod redis_cache;
pub mod schema;
pub mod writer;

pub use cache::{DedupCache, MemoryCache};
pub use clickhouse_writer::{ClickHouseConfig, ClickHouseWriter};
pub use error::StoreError;
pub use redis_cache::RedisCache;
pub use writer::{IngestWriter, MemoryWriter};
