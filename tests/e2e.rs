use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use riftscope::config::Config;
use riftscope::error::AppError;
use riftscope::riot::{ConcurrencyLimiter, RiotClient};

fn test_config(retries: u32, max_in_flight: usize) -> Config {
    Config {
        riot_api_key: "RGAPI-TEST".into(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        max_in_flight_requests: max_in_flight,
        request_retries: retries,
        request_timeout_secs: 2,
        riot_rate_limit_per_second: NonZeroU32::new(100).unwrap(),
        ddragon_version: "15.20.1".into(),
    }
}

fn test_client(retries: u32, max_in_flight: usize) -> RiotClient {
    let config = test_config(retries, max_in_flight);
    RiotClient::from_config(&config, ConcurrencyLimiter::new(max_in_flight))
}

async fn spawn_mock(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

mod client_behavior {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use futures::future::join_all;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn not_found_fails_fast_without_retry() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = test_client(2, 4);
        let res: Result<Value, _> = client.get(&server.url("/missing")).await;

        assert!(matches!(res, Err(AppError::NotFound)));
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn upstream_errors_retry_then_surface() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/flaky");
                then.status(500);
            })
            .await;

        let client = test_client(2, 4);
        let res: Result<Value, _> = client.get(&server.url("/flaky")).await;

        assert!(matches!(res, Err(AppError::RiotApi { status: 500 })));
        // Initial attempt plus two retries.
        assert_eq!(mock.hits_async().await, 3);
    }

    #[tokio::test]
    async fn successful_json_is_decoded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ok").header("X-Riot-Token", "RGAPI-TEST");
                then.status(200).json_body(json!({ "puuid": "abc" }));
            })
            .await;

        let client = test_client(0, 4);
        let res: Value = client.get(&server.url("/ok")).await.unwrap();

        assert_eq!(res["puuid"], "abc");
    }

    #[tokio::test]
    async fn rate_limit_backoff_is_invisible_on_eventual_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();

        let app = Router::new().route(
            "/data",
            get(move || {
                let hits = seen.clone();
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                        (
                            StatusCode::TOO_MANY_REQUESTS,
                            [(header::RETRY_AFTER, "0")],
                            "",
                        )
                            .into_response()
                    } else {
                        Json(json!({ "ok": true })).into_response()
                    }
                }
            }),
        );
        let addr = spawn_mock(app).await;

        // Zero generic retries: the 429 handling alone must carry the call.
        let client = test_client(0, 4);
        let res: Value = client
            .get(&format!("http://{addr}/data"))
            .await
            .unwrap();

        assert_eq!(res["ok"], true);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn in_flight_calls_never_exceed_the_cap() {
        const CAP: usize = 3;

        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (gauge, high_water) = (in_flight.clone(), peak.clone());

        let app = Router::new().route(
            "/slow",
            get(move || {
                let gauge = gauge.clone();
                let high_water = high_water.clone();
                async move {
                    let now = gauge.fetch_add(1, Ordering::SeqCst) + 1;
                    high_water.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    gauge.fetch_sub(1, Ordering::SeqCst);
                    Json(json!({ "ok": true }))
                }
            }),
        );
        let addr = spawn_mock(app).await;

        let client = Arc::new(test_client(0, CAP));
        let url = format!("http://{addr}/slow");

        let calls = (0..16).map(|_| {
            let client = client.clone();
            let url = url.clone();
            async move { client.get::<Value>(&url).await }
        });
        let results = join_all(calls).await;

        assert!(results.iter().all(Result::is_ok));
        assert!(
            peak.load(Ordering::SeqCst) <= CAP,
            "cap breached: saw {} concurrent calls",
            peak.load(Ordering::SeqCst)
        );
    }
}
