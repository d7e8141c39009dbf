//! Background refresh scheduler.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::{Engine, ReloadOutcome};
use crate::error::{EngineError, Result};
use crate::state::ReloadState;

/// Timing of scheduled reloads.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Delay between two reloads while they succeed.
    pub interval: Duration,
    /// Consecutive failures after which the delay starts growing.
    pub max_failures: u32,
    /// Factor applied to the delay on each further failure.
    pub backoff_multiplier: f64,
    /// Upper bound for the delay.
    pub max_backoff: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::with_interval(Duration::from_secs(30))
    }
}

impl RefreshConfig {
    /// Standard backoff policy around `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            max_failures: 3,
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(300),
        }
    }

    /// Delay to wait after `failures` consecutive failures, given the
    /// delay used so far.
    fn next_delay(&self, current: Duration, failures: u32) -> Duration {
        if failures == 0 {
            return self.interval;
        }
        if failures < self.max_failures {
            return current;
        }
        current
            .mul_f64(self.backoff_multiplier)
            .min(self.max_backoff)
    }
}

/// Stops the scheduler when told to or when dropped.
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    state: Arc<ReloadState>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Reload bookkeeping shared with the scheduler.
    pub fn state(&self) -> &Arc<ReloadState> {
        &self.state
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Calls [`Engine::reload`] on the blocking pool at a fixed pace, slowing
/// down while reloads keep failing.
pub struct RefreshScheduler {
    engine: Arc<Engine>,
    state: Arc<ReloadState>,
    config: RefreshConfig,
    delay: Mutex<Duration>,
}

impl RefreshScheduler {
    pub fn new(engine: Arc<Engine>, config: RefreshConfig) -> Self {
        Self {
            engine,
            state: Arc::new(ReloadState::new()),
            delay: Mutex::new(config.interval),
            config,
        }
    }

    /// Scheduler paced by the engine's `refresh_secs` setting.
    pub fn for_engine(engine: Arc<Engine>) -> Self {
        let config = RefreshConfig::with_interval(engine.settings().refresh_interval());
        Self::new(engine, config)
    }

    pub fn state(&self) -> &Arc<ReloadState> {
        &self.state
    }

    /// Current delay between attempts.
    pub fn delay(&self) -> Duration {
        *self.delay.lock()
    }

    /// Spawns the reload loop. Must be called inside a tokio runtime; the
    /// first reload runs immediately.
    pub fn start(self) -> RefreshHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = RefreshHandle {
            stop_tx,
            state: Arc::clone(&self.state),
        };
        tokio::spawn(self.run(stop_rx));
        handle
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        info!(
            "Refreshing {} every {:?}",
            self.engine.settings().repo_path().display(),
            self.config.interval
        );

        loop {
            let _ = self.refresh().await;

            tokio::select! {
                _ = sleep(self.delay()) => {},
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Refresh of {} stopped", self.engine.settings().repo_path().display());
    }

    /// Runs one reload now and records its result.
    pub async fn refresh(&self) -> Result<ReloadOutcome> {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || engine.reload())
            .await
            .map_err(|e| EngineError::Task(e.to_string()))
            .and_then(|r| r);

        match &result {
            Ok(outcome) => {
                let revision = self.engine.current().map(|s| s.revision_id().clone());
                self.state.record_success(revision);
                debug!("Scheduled reload: {}", outcome.label());
            },
            Err(e) => {
                self.state.record_failure(e.to_string());
                warn!("Scheduled reload failed: {}", e);
            },
        }
        self.update_delay();

        result
    }

    fn update_delay(&self) {
        let mut delay = self.delay.lock();
        let next = self.config.next_delay(*delay, self.state.failure_count());
        if next != *delay {
            debug!("Reload delay is now {:?}", next);
            *delay = next;
        }
    }
}
