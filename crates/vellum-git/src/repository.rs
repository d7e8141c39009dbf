//! Opening, probing and creating git repositories.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use gix::ThreadSafeRepository;
use tracing::{debug, info};
use vellum_core::template::{ensure_uninitialized, write_starter_tree};
use vellum_core::{ChangeCtx, Repository, Result, Revision};

use crate::changectx::GitChangeCtx;
use crate::config::GitBackendConfig;
use crate::error::{BACKEND, git};

/// Ignore file written by `create_repo`.
pub const IGNORE_FILE: (&str, &str) = (".gitignore", "build\n");

/// An opened git repository.
pub struct GitRepository {
    config: GitBackendConfig,
    repo: ThreadSafeRepository,
    bare: bool,
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", self.config.path())
            .field("primary_branch", &self.config.primary_branch())
            .field("bare", &self.bare)
            .finish()
    }
}

impl GitRepository {
    /// Opens the repository described by `config`.
    pub fn open(config: GitBackendConfig) -> Result<Self> {
        let repo = gix::open(config.path())
            .map_err(|e| git(format!("open {}: {}", config.path().display(), e)))?;
        let bare = repo.is_bare();

        info!(
            "Opened git repository at {} (branch {}{})",
            config.path().display(),
            config.primary_branch(),
            if bare { ", bare" } else { "" }
        );

        Ok(Self {
            config,
            repo: repo.into_sync(),
            bare,
        })
    }

    pub fn config(&self) -> &GitBackendConfig {
        &self.config
    }

    pub fn is_bare(&self) -> bool {
        self.bare
    }
}

impl Repository for GitRepository {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn path(&self) -> &Path {
        self.config.path()
    }

    fn changectx(&self, revision: Revision) -> Result<Arc<dyn ChangeCtx>> {
        let ctx = match revision {
            Revision::Default => GitChangeCtx::default_revision(self.repo.clone(), self.config.clone())?,
            Revision::WorkingDir => GitChangeCtx::working_dir(self.repo.clone(), self.config.clone())?,
        };
        Ok(Arc::new(ctx))
    }
}

/// Returns true if `path` is a work tree with `.git` or a bare repository.
pub fn supported(path: &Path) -> bool {
    if path.join(".git").exists() {
        return true;
    }
    path.join("HEAD").is_file()
        && path.join("config").is_file()
        && path.join("objects").is_dir()
        && path.join("refs").is_dir()
}

/// Writes the starter tree into `path` and initialises a repository whose
/// HEAD names `primary_branch`. Nothing is committed.
pub fn create_repo(path: &Path, primary_branch: &str) -> Result<()> {
    ensure_uninitialized(path, ".git")?;

    // a failed write must not leave a repository behind
    write_starter_tree(path, IGNORE_FILE)?;
    let repo = gix::init(path).map_err(|e| git(format!("init {}: {}", path.display(), e)))?;
    if let Err(e) = point_head_at(repo.path(), primary_branch) {
        let _ = fs::remove_dir_all(repo.path());
        return Err(e);
    }

    info!("Created git repository at {}", path.display());
    Ok(())
}

/// Makes HEAD a symbolic reference to `refs/heads/<branch>`.
pub(crate) fn point_head_at(git_dir: &Path, branch: &str) -> Result<()> {
    debug!("Pointing HEAD of {} at {}", git_dir.display(), branch);
    fs::write(git_dir.join("HEAD"), format!("ref: refs/heads/{}\n", branch))?;
    Ok(())
}
