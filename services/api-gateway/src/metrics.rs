//! Prometheus counters exposed at `/metrics`.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub uploads: IntCounterVec,
    pub extraction_failures: IntCounterVec,
    pub llm_fallbacks: IntCounterVec,
}

impl Metrics {
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let uploads = IntCounterVec::new(
            Opts::new("uploads_total", "Uploads analyzed, by content kind").namespace(namespace),
            &["kind"],
        )?;
        let extraction_failures = IntCounterVec::new(
            Opts::new("extraction_failures_total", "Uploads that could not be extracted")
                .namespace(namespace),
            &["format"],
        )?;
        let llm_fallbacks = IntCounterVec::new(
            Opts::new("llm_fallbacks_total", "Analyses answered by the local fallback")
                .namespace(namespace),
            &["operation"],
        )?;

        registry.register(Box::new(uploads.clone()))?;
        registry.register(Box::new(extraction_failures.clone()))?;
        registry.register(Box::new(llm_fallbacks.clone()))?;

        Ok(Self {
            registry,
            uploads,
            extraction_failures,
            llm_fallbacks,
        })
    }

    /// Text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
