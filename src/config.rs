//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or unparsable values fall back
//! to defaults, except `LISTEN_ADDR`.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::StatsError;
use crate::source::GeneratorConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Broker channel carrying enriched events.
    pub event_channel: String,

    /// Capacity of each broker broadcast channel.
    pub broker_capacity: usize,

    /// Currency conversion endpoint. `None` uses identity rates.
    pub exchange_api_url: Option<String>,

    /// How long a fetched exchange rate stays valid.
    pub exchange_rate_ttl: Duration,

    /// Timeout for a single conversion request.
    pub exchange_http_timeout: Duration,

    /// PostgreSQL connection string. `None` uses an in-memory directory.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Cancel the pipeline after this long. `None` runs until the source
    /// is exhausted or a signal arrives.
    pub run_timeout: Option<Duration>,

    /// Events produced by the generator (0 = unbounded).
    pub generator_events: u64,

    /// Delay between generated events.
    pub generator_interval: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            event_channel: "casino_event".to_string(),
            broker_capacity: 10_000,
            exchange_api_url: None,
            exchange_rate_ttl: Duration::from_millis(1_000),
            exchange_http_timeout: Duration::from_millis(2_000),
            database_url: None,
            database_max_connections: 5,
            database_connect_timeout_secs: 5,
            run_timeout: None,
            generator_events: 0,
            generator_interval: Duration::from_millis(50),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Config`] if `LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, StatsError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| StatsError::Config(format!("invalid LISTEN_ADDR {raw:?}: {e}")))?,
            Err(_) => defaults.listen_addr,
        };

        let run_timeout_secs: u64 = parse_env("RUN_TIMEOUT_SECS", 0);

        Ok(Self {
            listen_addr,
            event_channel: non_empty_env("EVENT_CHANNEL").unwrap_or(defaults.event_channel),
            broker_capacity: parse_env("BROKER_CAPACITY", defaults.broker_capacity),
            exchange_api_url: non_empty_env("EXCHANGE_CONVERT_API_URL"),
            exchange_rate_ttl: Duration::from_millis(parse_env("EXCHANGE_RATE_TTL_MS", 1_000)),
            exchange_http_timeout: Duration::from_millis(parse_env(
                "EXCHANGE_HTTP_TIMEOUT_MS",
                2_000,
            )),
            database_url: non_empty_env("PSQL_CONNECTION_URL"),
            database_max_connections: parse_env(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            database_connect_timeout_secs: parse_env(
                "DATABASE_CONNECT_TIMEOUT_SECS",
                defaults.database_connect_timeout_secs,
            ),
            run_timeout: (run_timeout_secs > 0).then(|| Duration::from_secs(run_timeout_secs)),
            generator_events: parse_env("GENERATOR_EVENTS", defaults.generator_events),
            generator_interval: Duration::from_millis(parse_env("GENERATOR_INTERVAL_MS", 50)),
            log_format: parse_log_format(std::env::var("LOG_FORMAT").ok().as_deref()),
        })
    }

    /// Generator settings derived from this configuration.
    #[must_use]
    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            events: self.generator_events,
            interval: self.generator_interval,
            ..GeneratorConfig::default()
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `"json"` (case-insensitive); anything else is text.
fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
