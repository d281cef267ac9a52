//! A transport wrapper that simulates a slow, unreliable server.
//!
//! Every call sleeps for a fixed delay and then rolls a number in `[0, 100)`:
//!
//! * below `transport_failure_pct` the call fails outright with
//!   `"The server did not respond"` and the inner transport is never touched;
//! * otherwise the inner call runs, and if the roll is also below
//!   `server_error_pct` its reply is thrown away and replaced by a synthetic
//!   `500 Server Error`.
//!
//! Both thresholds are checked against the same roll, so with the defaults
//! (16 and 32) roughly one call in six fails each way.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use tracing::debug;

use super::{Reply, Transport};
use crate::config::FlakyConfig;
use crate::error::FetchError;

pub const NO_RESPONSE: &str = "The server did not respond";

pub struct FlakyTransport {
    inner: Arc<dyn Transport>,
    delay: Duration,
    transport_failure_pct: f64,
    server_error_pct: f64,
}

impl FlakyTransport {
    pub fn new(inner: Arc<dyn Transport>, config: &FlakyConfig) -> Self {
        Self {
            inner,
            delay: Duration::from_millis(config.delay_ms),
            transport_failure_pct: config.transport_failure_pct,
            server_error_pct: config.server_error_pct,
        }
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn get(&self, url: &str) -> Result<Box<dyn Reply>, FetchError> {
        tokio::time::sleep(self.delay).await;

        let roll: f64 = rand::thread_rng().gen_range(0.0..100.0);
        if roll < self.transport_failure_pct {
            debug!(url, roll, "simulating transport failure");
            return Err(FetchError::Transport(NO_RESPONSE.to_string()));
        }

        let reply = self.inner.get(url).await?;
        if roll < self.server_error_pct {
            debug!(url, roll, "simulating server error");
            return Ok(Box::new(SyntheticReply::server_error()));
        }
        Ok(reply)
    }
}

/// An in-memory reply with a fixed status and body.
#[derive(Debug, Clone)]
pub struct SyntheticReply {
    status: u16,
    status_text: String,
    body: Bytes,
}

impl SyntheticReply {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// `500 Server Error` with a JSON `{"error": "Server error"}` body.
    pub fn server_error() -> Self {
        let body = serde_json::json!({ "error": "Server error" });
        Self::new(500, "Server Error", body.to_string())
    }
}

#[async_trait]
impl Reply for SyntheticReply {
    fn status(&self) -> u16 {
        self.status
    }

    fn status_text(&self) -> &str {
        &self.status_text
    }

    async fn bytes(self: Box<Self>) -> Result<Bytes, FetchError> {
        Ok(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always answers `200 OK` with an empty array and counts calls.
    struct Healthy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Healthy {
        fn name(&self) -> &str {
            "healthy"
        }

        async fn get(&self, _url: &str) -> Result<Box<dyn Reply>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(SyntheticReply::new(200, "OK", "[]")))
        }
    }

    fn flaky(inner: Arc<Healthy>, transport_failure_pct: f64, server_error_pct: f64) -> FlakyTransport {
        let config = FlakyConfig {
            enabled: true,
            delay_ms: 0,
            transport_failure_pct,
            server_error_pct,
        };
        FlakyTransport::new(inner, &config)
    }

    fn healthy() -> Arc<Healthy> {
        Arc::new(Healthy { calls: AtomicUsize::new(0) })
    }

    #[tokio::test]
    async fn certain_transport_failure_skips_inner_call() {
        let inner = healthy();
        let transport = flaky(inner.clone(), 100.0, 0.0);

        let err = transport.get("http://x/users/1/posts").await.err().unwrap();
        assert_eq!(err.to_string(), NO_RESPONSE);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn certain_server_error_replaces_reply() {
        let inner = healthy();
        let transport = flaky(inner.clone(), 0.0, 100.0);

        let reply = transport.get("http://x/users/1/posts").await.unwrap();
        assert_eq!(reply.status(), 500);
        assert_eq!(reply.status_text(), "Server Error");
        assert!(!reply.ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1, "inner call still made");

        let body: serde_json::Value = serde_json::from_slice(&reply.bytes().await.unwrap()).unwrap();
        assert_eq!(body["error"], "Server error");
    }

    #[tokio::test]
    async fn zero_rates_pass_through() {
        let inner = healthy();
        let transport = flaky(inner.clone(), 0.0, 0.0);

        for _ in 0..20 {
            let reply = transport.get("http://x/users/1/posts").await.unwrap();
            assert!(reply.ok());
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied_before_the_call() {
        let inner = healthy();
        let config = FlakyConfig {
            enabled: true,
            delay_ms: 1_000,
            transport_failure_pct: 0.0,
            server_error_pct: 0.0,
        };
        let transport = FlakyTransport::new(inner.clone(), &config);

        let started = tokio::time::Instant::now();
        transport.get("http://x/users/1/posts").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1_000));
    }

    #[test]
    fn synthetic_reply_ok_range() {
        assert!(SyntheticReply::new(200, "OK", "").ok());
        assert!(SyntheticReply::new(299, "", "").ok());
        assert!(!SyntheticReply::new(199, "", "").ok());
        assert!(!SyntheticReply::new(300, "", "").ok());
        assert!(!SyntheticReply::new(404, "Not Found", "").ok());
    }
}
