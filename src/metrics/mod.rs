//! Metrics collection for observability

use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Matching metrics
    pub calibrations: CounterVec,
    pub primary_matches: CounterVec,

    // Session metrics
    pub chat_turns: CounterVec,
    pub phase_transitions: CounterVec,
    pub chain_fallbacks: Counter,

    // LLM metrics
    pub llm_requests: CounterVec,
    pub llm_fallbacks: Counter,
    pub llm_request_duration: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let calibrations = register_counter_vec_with_registry!(
            Opts::new("elara_calibrations_total", "Total calibration submissions"),
            &["status"],
            registry
        )?;

        let primary_matches = register_counter_vec_with_registry!(
            Opts::new("elara_primary_matches_total", "Primary tutor assignments"),
            &["tutor"],
            registry
        )?;

        let chat_turns = register_counter_vec_with_registry!(
            Opts::new("elara_chat_turns_total", "Total chat turns"),
            &["outcome"],
            registry
        )?;

        let phase_transitions = register_counter_vec_with_registry!(
            Opts::new("elara_phase_transitions_total", "Teaching chain phase transitions"),
            &["chain", "kind"],
            registry
        )?;

        let chain_fallbacks = register_counter_with_registry!(
            Opts::new(
                "elara_chain_fallbacks_total",
                "Turns that fell back to single-tutor mode"
            ),
            registry
        )?;

        let llm_requests = register_counter_vec_with_registry!(
            Opts::new("elara_llm_requests_total", "Total LLM completion requests"),
            &["status"],
            registry
        )?;

        let llm_fallbacks = register_counter_with_registry!(
            Opts::new("elara_llm_fallbacks_total", "Completions retried with the fallback prompt"),
            registry
        )?;

        let llm_request_duration = register_histogram_vec_with_registry!(
            "elara_llm_request_duration_seconds",
            "LLM completion duration in seconds",
            &["model"],
            registry
        )?;

        Ok(Self {
            registry,
            calibrations,
            primary_matches,
            chat_turns,
            phase_transitions,
            chain_fallbacks,
            llm_requests,
            llm_fallbacks,
            llm_request_duration,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a calibration attempt and, on success, its primary tutor
    pub fn record_calibration(&self, primary_tutor: Option<&str>) {
        match primary_tutor {
            Some(tutor) => {
                self.calibrations.with_label_values(&["success"]).inc();
                self.primary_matches.with_label_values(&[tutor]).inc();
            }
            None => self.calibrations.with_label_values(&["error"]).inc(),
        }
    }

    pub fn record_chat_turn(&self, outcome: &str) {
        self.chat_turns.with_label_values(&[outcome]).inc();
    }

    /// `kind` is `entered` or `completed`
    pub fn record_phase_transition(&self, chain_id: &str, kind: &str) {
        self.phase_transitions.with_label_values(&[chain_id, kind]).inc();
    }

    pub fn record_chain_fallback(&self) {
        self.chain_fallbacks.inc();
    }

    pub fn record_llm_request(&self, status: &str) {
        self.llm_requests.with_label_values(&[status]).inc();
    }

    pub fn record_llm_fallback(&self) {
        self.llm_fallbacks.inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
