//! Pull metrics for lazy streams
//!
//! A metrics probe counts the elements that pass through one point of a
//! pipeline. Attached directly after a source it reports how many elements
//! were actually pulled from that source, which is how short-circuiting
//! terminals are observed.

use std::time::{Duration, Instant};

/// Metrics collected at one point of a pipeline
#[derive(Debug, Clone, Default)]
pub struct StreamMetrics {
    pub name: Option<String>,
    pub items_pulled: u64,
    pub errors: u64,
    pub processing_time: Duration,
    pub started_at: Option<Instant>,
    pub exhausted: bool,
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn record_item(&mut self) {
        self.mark_started();
        self.items_pulled += 1;
    }

    pub fn record_error(&mut self) {
        self.mark_started();
        self.errors += 1;
    }

    /// Called once the observed sequence reports exhaustion
    pub fn finalize(&mut self) {
        if let Some(start) = self.started_at {
            self.processing_time = start.elapsed();
        }
        self.exhausted = true;
    }

    pub fn throughput_items_per_sec(&self) -> f64 {
        if self.processing_time.as_secs_f64() > 0.0 {
            self.items_pulled as f64 / self.processing_time.as_secs_f64()
        } else {
            0.0
        }
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }
}
