//! Git backend implementation.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use vellum_core::{Backend, Repository, Result, VellumError};

use crate::config::{GitBackendConfig, default_primary_branch};
use crate::error::BACKEND;
use crate::repository::{self, GitRepository};

/// Discovery priority of the git backend.
pub const PRIORITY: u32 = 10;

/// Recognises, creates and opens git repositories.
///
/// Every repository opened through this backend uses the same primary
/// branch.
#[derive(Debug, Clone)]
pub struct GitBackend {
    primary_branch: String,
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new(default_primary_branch())
    }
}

impl GitBackend {
    /// Creates a backend using `primary_branch` as the default revision.
    pub fn new(primary_branch: impl Into<String>) -> Self {
        Self {
            primary_branch: primary_branch.into(),
        }
    }

    pub fn primary_branch(&self) -> &str {
        &self.primary_branch
    }

    fn config_for(&self, path: &Path) -> Result<GitBackendConfig> {
        GitBackendConfig::builder()
            .path(path)
            .primary_branch(self.primary_branch.as_str())
            .build()
            .map_err(|e| VellumError::validation("primary_branch", e))
    }
}

impl Backend for GitBackend {
    fn identifier(&self) -> &'static str {
        BACKEND
    }

    fn name(&self) -> &'static str {
        "Git"
    }

    fn priority(&self) -> u32 {
        PRIORITY
    }

    fn supported(&self, path: &Path) -> bool {
        let supported = repository::supported(path);
        debug!("git supported({}) = {}", path.display(), supported);
        supported
    }

    fn create_repo(&self, path: &Path) -> Result<()> {
        repository::create_repo(path, &self.primary_branch)
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn Repository>> {
        let repo = GitRepository::open(self.config_for(path)?)?;
        Ok(Arc::new(repo))
    }
}
