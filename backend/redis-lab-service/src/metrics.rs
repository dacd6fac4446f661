//! Prometheus metrics for redis-lab-service

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "redis_lab_http_requests_total",
            "Total HTTP requests handled by redis-lab-service",
        ),
        &["method", "route", "status"],
    )
    .expect("valid metric definition");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register redis_lab_http_requests_total");
    counter
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "redis_lab_http_request_duration_seconds",
            "HTTP request latencies for redis-lab-service",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
        ]),
        &["method", "route", "status"],
    )
    .expect("valid metric definition");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register redis_lab_http_request_duration_seconds");
    histogram
});

static REDIS_COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "redis_lab_redis_commands_total",
            "Redis commands issued by the data structure facade",
        ),
        &["command", "outcome"],
    )
    .expect("valid metric definition");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register redis_lab_redis_commands_total");
    counter
});

static REDIS_COMMAND_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "redis_lab_redis_command_duration_seconds",
            "Round-trip latency of Redis commands",
        )
        .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5]),
        &["command"],
    )
    .expect("valid metric definition");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register redis_lab_redis_command_duration_seconds");
    histogram
});

pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, route, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, route, &status])
        .observe(duration_secs);
}

pub fn record_redis_command(command: &str, outcome: &str, duration_secs: f64) {
    REDIS_COMMANDS_TOTAL
        .with_label_values(&[command, outcome])
        .inc();
    REDIS_COMMAND_DURATION_SECONDS
        .with_label_values(&[command])
        .observe(duration_secs);
}

/// `GET /metrics`
pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
