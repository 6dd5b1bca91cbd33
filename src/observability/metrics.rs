//! # Metrics
//!
//! Prometheus metrics for monitoring resource operations.
//!
//! ## Metrics Exposed
//!
//! - `auth0_resource_operations_total` - Lifecycle operations by resource and operation
//! - `auth0_resource_operation_errors_total` - Failed lifecycle operations by resource and operation
//! - `auth0_resource_operation_duration_seconds` - Duration of lifecycle operations
//! - `auth0_hook_secret_changes_total` - Hook secrets added, updated or removed
//! - `auth0_unsupported_sink_types_total` - Log stream sinks skipped because their type is unknown
//! - `auth0_management_requests_total` - Management API requests by method and status

use anyhow::Result;
use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, Registry, TextEncoder};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RESOURCE_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "auth0_resource_operations_total",
            "Total number of resource lifecycle operations",
        ),
        &["resource", "operation"],
    )
    .expect("Failed to create RESOURCE_OPERATIONS_TOTAL metric - this should never happen")
});

static RESOURCE_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "auth0_resource_operation_errors_total",
            "Total number of failed resource lifecycle operations",
        ),
        &["resource", "operation"],
    )
    .expect("Failed to create RESOURCE_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static RESOURCE_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "auth0_resource_operation_duration_seconds",
            "Duration of resource lifecycle operations in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["resource", "operation"],
    )
    .expect("Failed to create RESOURCE_OPERATION_DURATION metric - this should never happen")
});

static HOOK_SECRET_CHANGES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "auth0_hook_secret_changes_total",
            "Total number of hook secrets added, updated or removed",
        ),
        &["action"],
    )
    .expect("Failed to create HOOK_SECRET_CHANGES_TOTAL metric - this should never happen")
});

static UNSUPPORTED_SINK_TYPES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "auth0_unsupported_sink_types_total",
        "Total number of log stream sinks skipped because their type is not supported",
    )
    .expect("Failed to create UNSUPPORTED_SINK_TYPES_TOTAL metric - this should never happen")
});

static MANAGEMENT_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "auth0_management_requests_total",
            "Total number of Management API requests by method and status",
        ),
        &["method", "status"],
    )
    .expect("Failed to create MANAGEMENT_REQUESTS_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
/// Register all metrics with the registry
///
/// Returns an error if a metric is registered twice.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RESOURCE_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RESOURCE_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RESOURCE_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(HOOK_SECRET_CHANGES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(UNSUPPORTED_SINK_TYPES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(MANAGEMENT_REQUESTS_TOTAL.clone()))?;

    Ok(())
}

/// Record a completed lifecycle operation
pub fn record_resource_operation(resource: &str, operation: &str, duration: f64) {
    RESOURCE_OPERATIONS_TOTAL
        .with_label_values(&[resource, operation])
        .inc();
    RESOURCE_OPERATION_DURATION
        .with_label_values(&[resource, operation])
        .observe(duration);
}

/// Increment failed lifecycle operations counter
pub fn increment_resource_operation_errors(resource: &str, operation: &str) {
    RESOURCE_OPERATION_ERRORS_TOTAL
        .with_label_values(&[resource, operation])
        .inc();
}

pub fn record_hook_secret_changes(action: &str, count: usize) {
    HOOK_SECRET_CHANGES_TOTAL
        .with_label_values(&[action])
        .inc_by(count as u64);
}

pub fn increment_unsupported_sink_types() {
    UNSUPPORTED_SINK_TYPES_TOTAL.inc();
}

pub fn record_management_request(method: &str, status: u16) {
    MANAGEMENT_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
}

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
/// Render every registered metric in the Prometheus text exposition format
///
/// Returns an error if encoding fails.
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
