/// Configuration management for redis-lab-service
///
/// Loads configuration from environment variables with sensible defaults.
use db_pool::DbConfig;
use redis_utils::RedisSettings;

pub const SERVICE_NAME: &str = "redis-lab-service";

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub cache: RedisSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub pool: DbConfig,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("APP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8080),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                pool: DbConfig::from_env(SERVICE_NAME),
                run_migrations: std::env::var("RUN_MIGRATIONS")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(true),
            },
            cache: RedisSettings::from_env(),
            logging: LoggingConfig {
                format: match std::env::var("LOG_FORMAT")
                    .unwrap_or_default()
                    .to_ascii_lowercase()
                    .as_str()
                {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                },
                default_filter: "info,sqlx=warn".to_string(),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn parse_bool(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
