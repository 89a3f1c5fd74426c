use crate::auth::AuthGate;
use crate::config::{Backend, Config};
use crate::service::CalendarService;
use persistence::{
    ClickHouseWriter, DedupCache, IngestWriter, MemoryCache, MemoryWriter, RedisCache, StoreError,
};
use std::sync::Arc;

/// Process-lifetime service context.
///
/// Built once at startup; every request handler shares the same backends.
/// Backend connections close when the context and every handler holding
/// its service have been dropped.
pub struct AppState {
    service: Arc<CalendarService>,
}

impl AppState {
    /// Connect the configured backends and provision the store.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let (cache, writer): (Arc<dyn DedupCache>, Arc<dyn IngestWriter>) = match config.backend {
            Backend::RedisClickhouse => {
                let cache = RedisCache::connect(&config.redis_url).await?;
                let writer = ClickHouseWriter::new(&config.clickhouse())?;
                writer.ensure_table().await?;
                (Arc::new(cache), Arc::new(writer))
            }
            Backend::Memory => {
                tracing::warn!("using in-memory backends; data is lost on exit");
                (Arc::new(MemoryCache::new()), Arc::new(MemoryWriter::new()))
            }
        };

        let service = CalendarService::new(
            AuthGate::new(config.jwt_secret.as_bytes()),
            cache,
            writer,
            config.write_order,
        );

        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub fn service(&self) -> Arc<CalendarService> {
        Arc::clone(&self.service)
    }
}
