//! Server configuration parsed from command-line flags and environment.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Default upstream service queried for the public IP.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.ipify.org";

/// Errors produced while parsing configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The duration string could not be parsed.
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    /// The listen address is not of the form `host:port` or `:port`.
    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),
}

impl ConfigError {
    fn duration(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuracion del servidor, inmutable despues del arranque.
#[derive(Debug, Clone, Parser)]
#[command(name = "ipcache-server")]
#[command(about = "Serves the host's public IP address behind a shared secret")]
#[command(version)]
pub struct ServerConfig {
    /// Password which will be required by the Authorization header
    #[arg(long, env = "IPCACHE_PASSWORD", default_value = "password", hide_env_values = true)]
    pub password: String,

    /// Duration of the cached response
    #[arg(
        long = "cacheDuration",
        env = "IPCACHE_CACHE_DURATION",
        default_value = "20m",
        value_parser = parse_duration
    )]
    pub cache_duration: Duration,

    /// Address to listen on (for example :8080 or 0.0.0.0:80)
    #[arg(
        long = "listenAddr",
        env = "IPCACHE_LISTEN_ADDR",
        default_value = ":8080",
        value_parser = parse_listen_addr
    )]
    pub listen_addr: String,

    /// Timeout for the HTTP client which calls the external API
    #[arg(
        long = "httpClientTimeout",
        env = "IPCACHE_HTTP_CLIENT_TIMEOUT",
        default_value = "10s",
        value_parser = parse_duration
    )]
    pub http_client_timeout: Duration,

    /// URL of the IP lookup service
    #[arg(long = "upstreamUrl", env = "IPCACHE_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Grace period given to in-flight requests on shutdown
    #[arg(
        long = "shutdownTimeout",
        env = "IPCACHE_SHUTDOWN_TIMEOUT",
        default_value = "5s",
        value_parser = parse_duration
    )]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            password: "password".to_string(),
            cache_duration: Duration::from_secs(20 * 60),
            listen_addr: "0.0.0.0:8080".to_string(),
            http_client_timeout: Duration::from_secs(10),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Parses a Go-style duration such as `20m`, `1h30m`, `1.5s` or `250ms`.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ConfigError::duration(input, "empty duration"));
    }
    if s.starts_with('-') {
        return Err(ConfigError::duration(input, "negative durations are not allowed"));
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num_str, tail) = rest.split_at(num_len);
        if num_str.is_empty() || num_str == "." {
            return Err(ConfigError::duration(input, "expected a number"));
        }
        let value: f64 = num_str
            .parse()
            .map_err(|_| ConfigError::duration(input, format!("invalid number {num_str:?}")))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(ConfigError::duration(input, "missing unit")),
            other => {
                return Err(ConfigError::duration(input, format!("unknown unit {other:?}")));
            },
        };

        total += value * nanos_per_unit;
        rest = next;
    }

    if !total.is_finite() || total > u64::MAX as f64 {
        return Err(ConfigError::duration(input, "duration out of range"));
    }
    Ok(Duration::from_nanos(total as u64))
}

/// Normalizes a Go-style listen address: `:8080` binds all interfaces.
pub fn parse_listen_addr(input: &str) -> Result<String, ConfigError> {
    let s = input.trim();
    let Some((host, port)) = s.rsplit_once(':') else {
        return Err(ConfigError::InvalidListenAddr(input.to_string()));
    };
    if port.parse::<u16>().is_err() {
        return Err(ConfigError::InvalidListenAddr(input.to_string()));
    }
    if host.is_empty() {
        Ok(format!("0.0.0.0:{port}"))
    } else {
        Ok(s.to_string())
    }
}
