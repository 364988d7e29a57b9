//! Driver metrics
//!
//! Counters for mount attempts, volume creations and management API calls,
//! kept in a crate-local Prometheus registry.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Error, Result};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn register_counter_vec(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let counter =
        IntCounterVec::new(Opts::new(name, help), labels).expect("static metric definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registered once");
    counter
}

/// Mount attempts by outcome (`success`, `failure`).
pub static MOUNTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_counter_vec(
        "gluster_volume_mounts_total",
        "Total number of mount attempts",
        &["status"],
    )
});

/// Volume creations by outcome (`success`, `failure`).
pub static CREATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_counter_vec(
        "gluster_volume_creations_total",
        "Total number of cluster volume creations",
        &["status"],
    )
});

/// Management API requests by operation and outcome.
pub static REST_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_counter_vec(
        "gluster_volume_rest_requests_total",
        "Total number of GlusterFS management API requests",
        &["operation", "status"],
    )
});

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

pub fn record_mount(success: bool) {
    MOUNTS_TOTAL.with_label_values(&[status_label(success)]).inc();
}

pub fn record_creation(success: bool) {
    CREATIONS_TOTAL.with_label_values(&[status_label(success)]).inc();
}

pub fn record_rest_request(operation: &str, success: bool) {
    REST_REQUESTS_TOTAL
        .with_label_values(&[operation, status_label(success)])
        .inc();
}

/// Render all driver metrics in the Prometheus text exposition format.
pub fn render() -> Result<String> {
    Lazy::force(&MOUNTS_TOTAL);
    Lazy::force(&CREATIONS_TOTAL);
    Lazy::force(&REST_REQUESTS_TOTAL);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| Error::Internal(format!("Failed to encode metrics: {}", e)))?;

    String::from_utf8(buffer)
        .map_err(|e| Error::Internal(format!("Metrics output is not UTF-8: {}", e)))
}
