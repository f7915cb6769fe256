use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::AppError;
use crate::riot::{DEFAULT_MAX_ATTEMPTS, Platform};

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub riot_api_key: String,
    pub database_url: String,
    pub platform: Platform,
    pub polling_interval: Duration,
    pub sweep_timeout: Duration,
    /// Upper bound for refreshing one player inside a sweep.
    pub refresh_timeout: Duration,
    pub riot_request_timeout: Duration,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub riot_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        const DEFAULT_POLLING_INTERVAL_SECS: u64 = 600;
        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 60;
        const DEFAULT_RIOT_REQUEST_TIMEOUT_SECS: u64 = 10;

        let discord_token = var("DISCORD_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("DISCORD_TOKEN must be set".into()))?;

        let riot_api_key = var("RIOT_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url = var("DATABASE_URL").unwrap_or_else(|| "sqlite:rankwatch.db".into());

        let platform = match var("RIOT_PLATFORM") {
            Some(v) => v.parse()?,
            None => Platform::NA1,
        };

        let polling_interval_secs = var("POLLING_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLLING_INTERVAL_SECS);

        let sweep_timeout_secs = var("SWEEP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(polling_interval_secs);

        let refresh_timeout_secs = var("REFRESH_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REFRESH_TIMEOUT_SECS)
            .min(sweep_timeout_secs);

        let riot_request_timeout_secs = var("RIOT_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_RIOT_REQUEST_TIMEOUT_SECS);

        let riot_rate_limit_per_second = var("RIOT_RATE_LIMIT_PER_SECOND")
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let riot_max_attempts = var("RIOT_MAX_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);

        Ok(Self {
            discord_token,
            riot_api_key,
            database_url,
            platform,
            polling_interval: Duration::from_secs(polling_interval_secs),
            sweep_timeout: Duration::from_secs(sweep_timeout_secs),
            refresh_timeout: Duration::from_secs(refresh_timeout_secs),
            riot_request_timeout: Duration::from_secs(riot_request_timeout_secs),
            riot_rate_limit_per_second,
            riot_max_attempts,
        })
    }
}
