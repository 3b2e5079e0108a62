use crate::auth::{
    DEFAULT_AUTH_TIMEOUT,
    circuit_breaker::{BreakerConfig, DEFAULT_FAILURE_THRESHOLD, DEFAULT_RECOVERY_TIMEOUT},
};
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt::Display, str::FromStr, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth_service_url: String,
    pub auth_timeout_secs: u64,
    pub breaker_failure_threshold: u32,
    pub breaker_recovery_secs: u64,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "User activity API: bookmarks, likes and reviews")]
pub struct Args {
    /// Host to bind to (overrides USER_ACTIVITY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides USER_ACTIVITY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides USER_ACTIVITY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Identity endpoint of the auth service (overrides USER_ACTIVITY_AUTH_SERVICE_URL)
    #[arg(long)]
    pub auth_service_url: Option<String>,

    /// Timeout for a single auth call, in seconds (overrides USER_ACTIVITY_AUTH_TIMEOUT_SECS)
    #[arg(long)]
    pub auth_timeout_secs: Option<u64>,

    /// Consecutive auth failures that open the circuit breaker
    /// (overrides USER_ACTIVITY_BREAKER_FAILURE_THRESHOLD)
    #[arg(long)]
    pub breaker_failure_threshold: Option<u32>,

    /// Seconds the breaker stays open before a trial call
    /// (overrides USER_ACTIVITY_BREAKER_RECOVERY_SECS)
    #[arg(long)]
    pub breaker_recovery_secs: Option<u64>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |name| env::var(name).ok())?;
        Ok((cfg, migrate))
    }

    /// CLI values win over `lookup` (the environment), which wins over defaults.
    fn merge(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());

        Ok(Self {
            host: args
                .host
                .unwrap_or_else(|| text("USER_ACTIVITY_HOST", "0.0.0.0")),
            port: match args.port {
                Some(port) => port,
                None => number(&lookup, "USER_ACTIVITY_PORT", 8000)?,
            },
            database_url: args.database_url.unwrap_or_else(|| {
                text("USER_ACTIVITY_DATABASE_URL", "sqlite://./data/user_activity.db")
            }),
            auth_service_url: args.auth_service_url.unwrap_or_else(|| {
                text(
                    "USER_ACTIVITY_AUTH_SERVICE_URL",
                    "http://127.0.0.1:8001/api/v1/users/me",
                )
            }),
            auth_timeout_secs: match args.auth_timeout_secs {
                Some(secs) => secs,
                None => number(
                    &lookup,
                    "USER_ACTIVITY_AUTH_TIMEOUT_SECS",
                    DEFAULT_AUTH_TIMEOUT.as_secs(),
                )?,
            },
            breaker_failure_threshold: match args.breaker_failure_threshold {
                Some(threshold) => threshold,
                None => number(
                    &lookup,
                    "USER_ACTIVITY_BREAKER_FAILURE_THRESHOLD",
                    DEFAULT_FAILURE_THRESHOLD,
                )?,
            },
            breaker_recovery_secs: match args.breaker_recovery_secs {
                Some(secs) => secs,
                None => number(
                    &lookup,
                    "USER_ACTIVITY_BREAKER_RECOVERY_SECS",
                    DEFAULT_RECOVERY_TIMEOUT.as_secs(),
                )?,
            },
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn breaker(&self) -> BreakerConfig {
        BreakerConfig {
            failure_threshold: self.breaker_failure_threshold,
            recovery_timeout: Duration::from_secs(self.breaker_recovery_secs),
        }
    }
}

fn number<T>(lookup: impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("parsing {name} value `{value}`")),
        None => Ok(default),
    }
}
