use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub listen_addr: SocketAddr,
    /// Global cap on simultaneously in-flight upstream calls.
    pub max_in_flight_requests: usize,
    /// Retries per upstream call on transient failures (429 backoff is not counted).
    pub request_retries: u32,
    /// Per-attempt HTTP timeout for upstream calls.
    pub request_timeout_secs: u64,
    /// Client-side request quota towards the Riot API.
    pub riot_rate_limit_per_second: NonZeroU32,
    pub ddragon_version: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
        const DEFAULT_MAX_IN_FLIGHT: usize = 20;
        const DEFAULT_REQUEST_RETRIES: u32 = 2;
        const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_DDRAGON_VERSION: &str = "15.20.1";

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into())
            .parse()
            .map_err(|_| AppError::Config("LISTEN_ADDR is not a valid socket address".into()))?;

        let max_in_flight_requests = env::var("MAX_IN_FLIGHT_REQUESTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT);

        let request_retries = env::var("REQUEST_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_RETRIES);

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let ddragon_version =
            env::var("DDRAGON_VERSION").unwrap_or_else(|_| DEFAULT_DDRAGON_VERSION.into());

        Ok(Self {
            riot_api_key,
            listen_addr,
            max_in_flight_requests,
            request_retries,
            request_timeout_secs,
            riot_rate_limit_per_second,
            ddragon_version,
        })
    }
}
