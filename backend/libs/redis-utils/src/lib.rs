//! Redis connection bootstrap
//!
//! Parses the Redis URL, opens a multiplexed `ConnectionManager` within a
//! bounded connect timeout and exposes a `PING` probe for readiness checks.
//! Credentials never reach the logs: only the endpoint label is reported.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, ConnectionAddr, ConnectionInfo, IntoConnectionInfo, RedisResult};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Connection settings for the Redis server backing a service.
#[derive(Clone)]
pub struct RedisSettings {
    pub url: String,
    pub connect_timeout: Duration,
}

impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("url", &"[REDACTED]")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }
}

impl RedisSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Read `REDIS_URL` and `REDIS_CONNECT_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let timeout_ms = std::env::var("REDIS_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);

        Self {
            url,
            connect_timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Open a connection manager for the configured server.
///
/// Fails if the URL is malformed, the server cannot be reached, or the
/// handshake does not finish within `connect_timeout`.
pub async fn connect(settings: &RedisSettings) -> Result<ConnectionManager> {
    let info: ConnectionInfo = settings
        .url
        .as_str()
        .into_connection_info()
        .context("failed to parse REDIS_URL connection string")?;
    let endpoint = endpoint_label(&info);

    debug!(endpoint = %endpoint, "Connecting to Redis");

    let client = Client::open(info).context("failed to construct Redis client")?;
    let manager = tokio::time::timeout(settings.connect_timeout, ConnectionManager::new(client))
        .await
        .with_context(|| {
            format!(
                "timed out after {}ms connecting to Redis at {}",
                settings.connect_timeout.as_millis(),
                endpoint
            )
        })?
        .with_context(|| format!("failed to initialize Redis connection manager for {endpoint}"))?;

    info!(endpoint = %endpoint, "Redis connection manager ready");
    Ok(manager)
}

/// Round-trip a `PING` through the connection.
pub async fn ping(conn: &mut ConnectionManager) -> RedisResult<()> {
    let _: String = redis::cmd("PING").query_async(conn).await?;
    Ok(())
}

/// Human readable `host:port/db` label without credentials.
pub fn endpoint_label(info: &ConnectionInfo) -> String {
    let db = info.redis.db;
    match &info.addr {
        ConnectionAddr::Tcp(host, port) => format!("{host}:{port}/{db}"),
        ConnectionAddr::TcpTls { host, port, .. } => format!("{host}:{port}/{db} (tls)"),
        ConnectionAddr::Unix(path) => format!("unix:{}/{db}", path.display()),
    }
}
