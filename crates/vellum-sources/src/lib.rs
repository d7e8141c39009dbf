//! Vellum Sources - backend discovery
//!
//! A [`BackendRegistry`] holds the known VCS backends in priority order and
//! picks the one that recognises a repository path. Callers only ever see
//! the `vellum_core::vcs` traits.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use vellum_core::{Backend, Repository, Result, VellumError};
use vellum_git::GitBackend;
use vellum_hg::HgBackend;

/// Known backends, probed lowest priority first.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn Backend>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Git (primary branch `master`) and Mercurial.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Arc::new(GitBackend::default()))
            .with(Arc::new(HgBackend))
    }

    /// Git with the given primary branch, and Mercurial.
    pub fn with_primary_branch(branch: impl Into<String>) -> Self {
        Self::new()
            .with(Arc::new(GitBackend::new(branch)))
            .with(Arc::new(HgBackend))
    }

    /// Adds a backend; a backend with the same identifier is replaced.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.backends
            .retain(|b| b.identifier() != backend.identifier());
        self.backends.push(backend);
        // stable: equal priorities keep registration order
        self.backends.sort_by_key(|b| b.priority());
    }

    /// Builder-style [`BackendRegistry::register`].
    pub fn with(mut self, backend: Arc<dyn Backend>) -> Self {
        self.register(backend);
        self
    }

    /// Backends in probe order.
    pub fn backends(&self) -> &[Arc<dyn Backend>] {
        &self.backends
    }

    /// Looks a backend up by identifier.
    pub fn backend(&self, identifier: &str) -> Option<Arc<dyn Backend>> {
        self.backends
            .iter()
            .find(|b| b.identifier() == identifier)
            .cloned()
    }

    /// First backend that recognises `path`.
    pub fn detect(&self, path: &Path) -> Option<Arc<dyn Backend>> {
        self.backends.iter().find(|b| b.supported(path)).cloned()
    }

    /// Opens `path` with the first backend that supports it.
    pub fn load_repo(&self, path: &Path) -> Result<Arc<dyn Repository>> {
        let Some(backend) = self.detect(path) else {
            debug!("No backend recognises {}", path.display());
            return Err(VellumError::no_backend(path));
        };
        info!("Loading {} with the {} backend", path.display(), backend.name());
        backend.open(path)
    }

    /// Creates a repository at `path` with the backend named `identifier`.
    pub fn create_repo(&self, path: &Path, identifier: &str) -> Result<()> {
        let backend = self.backend(identifier).ok_or_else(|| {
            VellumError::validation("backend", format!("unknown backend '{}'", identifier))
        })?;
        backend.create_repo(path)
    }
}

/// Opens `path` with the default registry.
pub fn load_repo(path: &Path) -> Result<Arc<dyn Repository>> {
    BackendRegistry::with_defaults().load_repo(path)
}

/// Creates a repository at `path` with the default registry.
pub fn create_repo(path: &Path, identifier: &str) -> Result<()> {
    BackendRegistry::with_defaults().create_repo(path, identifier)
}
