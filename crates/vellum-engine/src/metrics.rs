//! Reload metrics.
//!
//! Values go to whatever `metrics` recorder the host installed; without one
//! the macros are no-ops. Local counters are kept as well so the engine
//! can report them without a recorder.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::{counter, gauge, histogram};

use crate::engine::ReloadOutcome;

/// Describes the reload metrics to the current recorder.
///
/// [`Engine`](crate::Engine) calls this on construction, so a host that
/// installs its recorder first gets HELP text for every metric.
pub fn register_reload_metrics() {
    metrics::describe_counter!(
        "vellum_reloads_total",
        "Reload attempts by outcome (skipped, fresh, reloaded, superseded, failed)"
    );
    metrics::describe_histogram!(
        "vellum_reload_seconds",
        "Time spent building and publishing a snapshot"
    );
    metrics::describe_gauge!("vellum_blog_entries", "Entries in the published blog");
    metrics::describe_gauge!("vellum_snapshot_generation", "Generation of the published snapshot");
}

/// Reload outcome counters.
#[derive(Debug, Clone, Default)]
pub struct ReloadMetrics {
    reloaded: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl ReloadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed reload call.
    pub fn record_outcome(&self, outcome: &ReloadOutcome, duration: Duration) {
        counter!("vellum_reloads_total", "outcome" => outcome.label()).increment(1);

        if let ReloadOutcome::Reloaded { generation, entries, .. } = outcome {
            self.reloaded.fetch_add(1, Ordering::Relaxed);
            histogram!("vellum_reload_seconds").record(duration.as_secs_f64());
            gauge!("vellum_blog_entries").set(*entries as f64);
            gauge!("vellum_snapshot_generation").set(*generation as f64);
        }
    }

    /// Records a failed reload.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        counter!("vellum_reloads_total", "outcome" => "failed").increment(1);
    }

    /// Number of published snapshots.
    pub fn reloaded(&self) -> u64 {
        self.reloaded.load(Ordering::Relaxed)
    }

    /// Number of failed reloads.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
