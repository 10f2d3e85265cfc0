//! Request middleware: correlation IDs and simulated latency.

use crate::config::DelayConfig;
use crate::observability::{REQUEST_ID_HEADER, RequestContext, scope_request_context};
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Draws per-request delays uniformly from the configured bounds.
#[derive(Debug)]
pub struct LatencySimulator {
    delay: DelayConfig,
    rng: Mutex<StdRng>,
}

impl LatencySimulator {
    /// Creates a simulator with an OS-seeded RNG.
    #[must_use]
    pub fn new(delay: DelayConfig) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a simulator with a fixed seed.
    #[must_use]
    pub fn with_seed(delay: DelayConfig, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Picks the next delay in milliseconds (inclusive bounds).
    pub fn sample_ms(&self) -> u64 {
        if self.delay.is_disabled() {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(self.delay.min_ms..=self.delay.max_ms)
    }
}

/// Delays every request except CORS preflights.
#[allow(clippy::cast_precision_loss)]
pub async fn simulate_latency(
    State(latency): State<Arc<LatencySimulator>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let delay_ms = latency.sample_ms();
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    metrics::histogram!("docchat_simulated_delay_ms").record(delay_ms as f64);
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        delay_ms,
        "Request delayed"
    );

    next.run(request).await
}

/// Attaches a correlation ID to the request scope and echoes it on the response.
pub async fn propagate_request_id(request: Request, next: Next) -> Response {
    let context = RequestContext::from_header(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let request_id = context.request_id().to_string();

    let mut response = scope_request_context(context, next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
