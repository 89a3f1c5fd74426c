//! Command-line and environment configuration

use crate::service::WriteOrder;
use clap::{Parser, ValueEnum};
use persistence::ClickHouseConfig;
use persistence::schema::DEFAULT_TABLE;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Redis dedup cache and ClickHouse row store.
    RedisClickhouse,
    /// Process-local cache and row log. Nothing survives a restart.
    Memory,
}

#[derive(Clone, Parser)]
#[command(name = "calendar-service", about = "Warehouse acceptance calendar ingestion service")]
pub struct Config {
    /// Address the gRPC server binds to.
    #[arg(long, env = "CALENDAR_LISTEN", default_value = "0.0.0.0:50051")]
    pub listen: SocketAddr,

    /// Shared HS256 secret for bearer tokens.
    #[arg(long, env = "CALENDAR_JWT_SECRET", hide_env_values = true, value_parser = non_empty)]
    pub jwt_secret: String,

    #[arg(long, env = "CALENDAR_BACKEND", value_enum, default_value_t = Backend::RedisClickhouse)]
    pub backend: Backend,

    #[arg(long, env = "CALENDAR_WRITE_ORDER", value_enum, default_value_t = WriteOrder::StoreFirst)]
    pub write_order: WriteOrder,

    #[arg(long, env = "CALENDAR_REDIS_URL", default_value = "redis://127.0.0.1:6379/0")]
    pub redis_url: String,

    #[arg(long, env = "CALENDAR_CLICKHOUSE_URL", default_value = "http://127.0.0.1:8123")]
    pub clickhouse_url: String,

    #[arg(long, env = "CALENDAR_CLICKHOUSE_DATABASE", default_value = "default")]
    pub clickhouse_database: String,

    #[arg(long, env = "CALENDAR_CLICKHOUSE_USER")]
    pub clickhouse_user: Option<String>,

    #[arg(long, env = "CALENDAR_CLICKHOUSE_PASSWORD", hide_env_values = true)]
    pub clickhouse_password: Option<String>,

    #[arg(long, env = "CALENDAR_CLICKHOUSE_TABLE", default_value = DEFAULT_TABLE)]
    pub clickhouse_table: String,

    /// Per-request deadline; requests still running are cancelled.
    #[arg(long, env = "CALENDAR_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn clickhouse(&self) -> ClickHouseConfig {
        ClickHouseConfig {
            url: self.clickhouse_url.clone(),
            database: self.clickhouse_database.clone(),
            user: self.clickhouse_user.clone(),
            password: self.clickhouse_password.clone(),
            table: self.clickhouse_table.clone(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("jwt_secret", &"<redacted>")
            .field("backend", &self.backend)
            .field("write_order", &self.write_order)
            .field("redis_url", &self.redis_url)
            .field("clickhouse_url", &self.clickhouse_url)
            .field("clickhouse_database", &self.clickhouse_database)
            .field("clickhouse_user", &self.clickhouse_user)
            .field("clickhouse_table", &self.clickhouse_table)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
