use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static FLOW_OUTCOMES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() {
    let registry = Registry::new();

    let flow_outcomes = IntCounterVec::new(
        Opts::new(
            "flow_outcomes_total",
            "Terminal outcomes of identity flows",
        ),
        &["flow", "outcome"],
    )
    .expect("metric can be created");

    registry
        .register(Box::new(flow_outcomes.clone()))
        .expect("collector can be registered");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = FLOW_OUTCOMES_TOTAL.set(flow_outcomes);
}

/// Count a flow reaching a terminal outcome; a no-op before init_metrics.
pub fn record_flow_outcome(flow: &str, outcome: &str) {
    if let Some(counter) = FLOW_OUTCOMES_TOTAL.get() {
        counter.with_label_values(&[flow, outcome]).inc();
    }
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let registry = match REGISTRY.get() {
        Some(registry) => registry,
        None => return String::new(),
    };
    let metric_families = registry.gather();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
