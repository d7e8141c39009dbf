//! Reload bookkeeping for the refresh scheduler.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use vellum_core::RevisionId;

#[derive(Debug, Default)]
struct Inner {
    revision: Option<RevisionId>,
    last_success: Option<Instant>,
    last_error: Option<String>,
    failure_count: u32,
}

/// Tracks the last published revision and consecutive failures.
#[derive(Debug, Default)]
pub struct ReloadState {
    inner: RwLock<Inner>,
}

impl ReloadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful reload attempt. `revision` is the revision of
    /// the current snapshot, if any.
    pub fn record_success(&self, revision: Option<RevisionId>) {
        let mut inner = self.inner.write();
        if revision.is_some() {
            inner.revision = revision;
        }
        inner.last_success = Some(Instant::now());
        inner.last_error = None;
        inner.failure_count = 0;
    }

    /// Records a failed reload attempt.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.last_error = Some(error.into());
        inner.failure_count += 1;
    }

    /// Revision of the last published snapshot.
    pub fn revision(&self) -> Option<RevisionId> {
        self.inner.read().revision.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        self.inner.read().failure_count
    }

    /// Time since the last successful attempt.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.inner.read().last_success.map(|t| t.elapsed())
    }

    /// True once a snapshot was published and the last attempt succeeded.
    pub fn is_healthy(&self) -> bool {
        let inner = self.inner.read();
        inner.revision.is_some() && inner.last_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ReloadState::new();
        assert!(state.revision().is_none());
        assert!(!state.is_healthy());
        assert_eq!(state.failure_count(), 0);
        assert!(state.time_since_success().is_none());
    }

    #[test]
    fn test_failure_then_success() {
        let state = ReloadState::new();

        state.record_failure("config.yaml missing");
        state.record_failure("config.yaml missing");
        assert_eq!(state.failure_count(), 2);
        assert_eq!(state.last_error().as_deref(), Some("config.yaml missing"));

        state.record_success(Some(RevisionId::new("abc")));
        assert_eq!(state.failure_count(), 0);
        assert!(state.last_error().is_none());
        assert!(state.is_healthy());

        // a skipped reload keeps the known revision
        state.record_success(None);
        assert_eq!(state.revision(), Some(RevisionId::new("abc")));
    }
}
