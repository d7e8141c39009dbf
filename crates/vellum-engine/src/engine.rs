//! Reload orchestration.
//!
//! The engine owns one repository handle and publishes immutable
//! [`Snapshot`]s. A reload compares the current snapshot against the
//! repository, builds a complete replacement when it is stale and swaps it
//! in with a compare-and-swap against the snapshot it started from. Readers
//! never observe a half-built triple.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use arc_swap::ArcSwapOption;
use tracing::{debug, info, warn};
use vellum_core::vcs::unix_now;
use vellum_core::{Blog, Repository, RevisionId};
use vellum_sources::BackendRegistry;

use crate::error::Result;
use crate::hooks::ReloadHooks;
use crate::metrics::{ReloadMetrics, register_reload_metrics};
use crate::settings::EngineSettings;
use crate::site_config;
use crate::snapshot::Snapshot;

/// What a call to [`Engine::reload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The repository root does not exist; nothing changed.
    Skipped,
    /// The current snapshot is up to date.
    Fresh,
    /// A new snapshot was published.
    Reloaded {
        generation: u64,
        revision: RevisionId,
        entries: usize,
    },
    /// Another reload published first; this one's work was discarded.
    Superseded,
}

impl ReloadOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Fresh => "fresh",
            Self::Reloaded { .. } => "reloaded",
            Self::Superseded => "superseded",
        }
    }

    pub fn is_reloaded(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

/// Keeps the current content snapshot of one repository.
pub struct Engine {
    settings: EngineSettings,
    registry: BackendRegistry,
    repository: OnceLock<Arc<dyn Repository>>,
    current: ArcSwapOption<Snapshot>,
    hooks: ReloadHooks,
    metrics: ReloadMetrics,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("current", &self.current.load_full())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Engine {
    /// Creates an engine using the default backends.
    pub fn new(settings: EngineSettings) -> Self {
        let registry = BackendRegistry::with_primary_branch(settings.primary_branch());
        Self::with_registry(settings, registry)
    }

    /// Creates an engine probing `registry` for the repository backend.
    pub fn with_registry(settings: EngineSettings, registry: BackendRegistry) -> Self {
        // descriptions reach the recorder installed at this point, if any
        register_reload_metrics();
        Self {
            settings,
            registry,
            repository: OnceLock::new(),
            current: ArcSwapOption::empty(),
            hooks: ReloadHooks::new(),
            metrics: ReloadMetrics::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The published snapshot, if any reload succeeded yet.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn hooks(&self) -> &ReloadHooks {
        &self.hooks
    }

    pub fn metrics(&self) -> &ReloadMetrics {
        &self.metrics
    }

    /// The shared repository handle, opened on first use.
    pub fn repository(&self) -> Result<Arc<dyn Repository>> {
        if let Some(repo) = self.repository.get() {
            return Ok(Arc::clone(repo));
        }
        let opened = self.registry.load_repo(self.settings.repo_path())?;
        // a concurrent opener may have won; keep whichever was stored first
        Ok(Arc::clone(self.repository.get_or_init(|| opened)))
    }

    /// True when there is no snapshot or the current one is stale.
    pub fn needs_reload(&self) -> bool {
        match self.current.load_full() {
            Some(snapshot) => snapshot.changectx().needs_reload(),
            None => true,
        }
    }

    /// Brings the published snapshot up to date.
    ///
    /// # Errors
    ///
    /// Backend failures, a missing `config.yaml` (`ConfigMissing`) or an
    /// invalid one. The previously published snapshot stays in place.
    pub fn reload(&self) -> Result<ReloadOutcome> {
        let started = Instant::now();
        match self.try_reload() {
            Ok(outcome) => {
                self.metrics.record_outcome(&outcome, started.elapsed());
                Ok(outcome)
            },
            Err(e) => {
                warn!("Reload of {} failed: {}", self.settings.repo_path().display(), e);
                self.metrics.record_failure();
                Err(e)
            },
        }
    }

    fn try_reload(&self) -> Result<ReloadOutcome> {
        let root = self.settings.repo_path();
        if !root.exists() {
            debug!("Repository root {} does not exist, skipping reload", root.display());
            return Ok(ReloadOutcome::Skipped);
        }

        let observed = self.current.load_full();
        if let Some(snapshot) = &observed {
            if !snapshot.changectx().needs_reload() {
                return Ok(ReloadOutcome::Fresh);
            }
        }

        let repository = self.repository()?;
        let changectx = repository.changectx(self.settings.revision())?;
        let config = site_config::load(changectx.as_ref(), self.settings.interactive())?;
        // future-dated entries stay visible while authoring
        let show_future = self.settings.debug() || self.settings.interactive();
        let options = site_config::content_options(&config, show_future);
        let blog = Blog::build(changectx.as_ref(), &options, unix_now());

        let generation = observed.as_ref().map_or(0, |s| s.generation()) + 1;
        let revision = changectx.revision_id().clone();
        let entries = blog.len();
        let snapshot = Arc::new(Snapshot::new(generation, changectx, config, blog));

        let previous = self
            .current
            .compare_and_swap(&observed, Some(Arc::clone(&snapshot)));
        let won = match ((*previous).as_ref(), observed.as_ref()) {
            (Some(prev), Some(seen)) => Arc::ptr_eq(prev, seen),
            (None, None) => true,
            _ => false,
        };
        if !won {
            debug!("Reload superseded, discarding generation {}", generation);
            return Ok(ReloadOutcome::Superseded);
        }

        info!(
            "Published snapshot {} of {} at {} ({} entries)",
            generation,
            root.display(),
            revision.short(),
            entries
        );
        self.hooks.run(&snapshot);

        Ok(ReloadOutcome::Reloaded {
            generation,
            revision,
            entries,
        })
    }
}
