use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use reqwest::{header::RETRY_AFTER, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;

/// Sleep between generic retry attempts.
const RETRY_DELAY: Duration = Duration::from_secs(1);
/// Backoff applied on a 429 response carrying no `Retry-After` header.
const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);

const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide cap on simultaneously in-flight upstream calls.
///
/// One instance is shared by every caller of the upstream API; permits are
/// released on drop, so an abandoned call cannot leak capacity.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    permits: Semaphore,
}

impl ConcurrencyLimiter {
    pub fn new(max_in_flight: usize) -> Arc<Self> {
        Arc::new(Self {
            permits: Semaphore::new(max_in_flight),
        })
    }

    pub async fn acquire(&self) -> SemaphorePermit<'_> {
        // The semaphore is never closed.
        self.permits.acquire().await.expect("semaphore closed")
    }
}

/// HTTP client for the Riot API with a global in-flight cap, a client-side
/// request quota and transient-failure retries.
///
/// Behavior per call:
/// - 404 fails immediately with [`AppError::NotFound`] and is never retried.
/// - 429 sleeps for the `Retry-After` hint (2s when absent) and retries
///   without consuming a retry slot. The per-attempt HTTP timeout bounds how
///   long a single attempt can hang.
/// - Any other non-2xx or network failure is retried up to `retries` times
///   with a fixed delay, then surfaced.
pub struct RiotClient {
    http: reqwest::Client,
    limiter: Arc<ConcurrencyLimiter>,
    quota: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Riot API Key
    key: String,
    retries: u32,
}

enum Attempt<T> {
    Done(Result<T, AppError>),
    Backoff(Duration),
    Transient(AppError),
}

impl RiotClient {
    pub fn new(key: impl Into<String>, limiter: Arc<ConcurrencyLimiter>) -> Self {
        Self::with_settings(
            key.into(),
            limiter,
            DEFAULT_RETRIES,
            nonzero!(20_u32),
            DEFAULT_TIMEOUT,
        )
    }

    pub fn from_config(config: &Config, limiter: Arc<ConcurrencyLimiter>) -> Self {
        Self::with_settings(
            config.riot_api_key.clone(),
            limiter,
            config.request_retries,
            config.riot_rate_limit_per_second,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn with_settings(
        key: String,
        limiter: Arc<ConcurrencyLimiter>,
        retries: u32,
        rate_per_second: NonZeroU32,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        let q = Quota::per_second(rate_per_second).allow_burst(rate_per_second);

        Self {
            http,
            limiter,
            quota: RateLimiter::direct(q),
            key,
            retries,
        }
    }

    /// Execute one logical GET against the Riot API and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let started = Instant::now();
        let mut attempts: u32 = 1;
        let mut retries_left = self.retries;

        loop {
            match self.attempt(url).await {
                Attempt::Done(result) => {
                    debug!(
                        url,
                        attempts,
                        latency_ms = started.elapsed().as_millis() as u64,
                        ok = result.is_ok(),
                        "riot api call finished"
                    );
                    return result;
                }
                Attempt::Backoff(wait) => {
                    // Rate-limit backoff does not consume a retry slot.
                    warn!(url, wait_secs = wait.as_secs(), "rate limited, backing off");
                    tokio::time::sleep(wait).await;
                    attempts += 1;
                }
                Attempt::Transient(err) => {
                    if retries_left == 0 {
                        warn!(
                            url,
                            attempts,
                            latency_ms = started.elapsed().as_millis() as u64,
                            error = %err,
                            "riot api call failed, retries exhausted"
                        );
                        return Err(err);
                    }
                    retries_left -= 1;
                    attempts += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    /// One HTTP attempt. Holds an in-flight permit for the full round trip,
    /// body included, and never sleeps while holding it.
    async fn attempt<T: DeserializeOwned>(&self, url: &str) -> Attempt<T> {
        self.quota.until_ready().await;
        let _permit = self.limiter.acquire().await;

        let res = match self
            .http
            .get(url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => return Attempt::Transient(AppError::Http(e)),
        };

        match res.status() {
            status if status.is_success() => {
                Attempt::Done(res.json::<T>().await.map_err(AppError::Http))
            }
            StatusCode::NOT_FOUND => Attempt::Done(Err(AppError::NotFound)),
            StatusCode::TOO_MANY_REQUESTS => Attempt::Backoff(retry_after_hint(&res)),
            status => Attempt::Transient(AppError::RiotApi {
                status: status.as_u16(),
            }),
        }
    }
}

fn retry_after_hint(res: &Response) -> Duration {
    res.headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF)
}
