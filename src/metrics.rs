//! Prometheus metrics
//!
//! Counters are incremented where requests and generations happen. Scraping
//! only reads the registry.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

use crate::api::AppState;

const DURATION_BUCKETS: [f64; 6] = [0.1, 0.3, 0.5, 1.0, 2.0, 5.0];

/// Outcome label for generation attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success,
    Failure,
}

impl GenerationOutcome {
    fn label(self) -> &'static str {
        match self {
            GenerationOutcome::Success => "success",
            GenerationOutcome::Failure => "failure",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    request_duration: Histogram,
    generations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("app_request_count", "Number of requests to the app"),
            &["method", "status"],
        )?;
        let request_duration = Histogram::with_opts(
            HistogramOpts::new("app_request_duration_seconds", "Request duration in seconds")
                .buckets(DURATION_BUCKETS.to_vec()),
        )?;
        let generations = IntCounterVec::new(
            Opts::new(
                "generate_button_clicks_total",
                "Total number of times the generate button was clicked.",
            ),
            &["status"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(generations.clone()))?;

        Ok(Self {
            registry,
            requests,
            request_duration,
            generations,
        })
    }

    pub fn record_request(&self, method: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.requests
            .with_label_values(&[method, status.as_str()])
            .inc();
        self.request_duration.observe(seconds);
    }

    pub fn record_generation(&self, outcome: GenerationOutcome) {
        self.generations.with_label_values(&[outcome.label()]).inc();
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }

    #[cfg(test)]
    pub(crate) fn generation_count(&self, outcome: GenerationOutcome) -> u64 {
        self.generations.with_label_values(&[outcome.label()]).get()
    }

    #[cfg(test)]
    pub(crate) fn request_count(&self, method: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.requests
            .with_label_values(&[method, status.as_str()])
            .get()
    }
}

/// Middleware recording count and latency of every API request
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();
    state.metrics.record_request(&method, status, elapsed);
    tracing::debug!(%method, status, "Recorded request in {:.3}s", elapsed);
    response
}
