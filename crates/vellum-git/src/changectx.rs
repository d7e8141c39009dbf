//! Git snapshots.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use gix::bstr::ByteSlice;
use gix::{ObjectId, ThreadSafeRepository};
use tracing::{debug, warn};
use vellum_core::vcs::{normalize_path, unix_now};
use vellum_core::{ChangeCtx, FileCtx, Result, Revision, RevisionId, VellumError};
use walkdir::WalkDir;

use crate::config::GitBackendConfig;
use crate::error::{BACKEND, git};
use crate::filectx::GitFileCtx;
use crate::history::{self, CommitInfo};
use crate::ignore::IgnoreMatcher;
use crate::tree::{blob_data, collect_files, commit_tree, entry_at};

/// Resolves a reference to the commit it finally points at.
pub(crate) fn resolve_tip(repo: &gix::Repository, name: &str) -> Result<ObjectId> {
    repo.find_reference(name)
        .map_err(|e| VellumError::revision_not_found(name, e.to_string()))?
        .into_fully_peeled_id()
        .map(|id| id.detach())
        .map_err(|e| VellumError::revision_not_found(name, e.to_string()))
}

/// `name <email>` from the repository configuration.
fn configured_author(repo: &gix::Repository) -> Option<String> {
    let config = repo.config_snapshot();
    let name = config.string("user.name")?;
    match config.string("user.email") {
        Some(email) => Some(format!("{} <{}>", name, email)),
        None => Some(name.to_string()),
    }
}

/// One state of a git repository: the primary branch tip or the work tree.
pub struct GitChangeCtx {
    repo: ThreadSafeRepository,
    config: GitBackendConfig,
    revision: Revision,
    revision_id: RevisionId,
    /// Commit the snapshot was built from; history starts here.
    tip: Option<ObjectId>,
    files: Vec<String>,
    /// Tracked blob ids: tip tree for `Default`, the index for `WorkingDir`.
    blobs: BTreeMap<String, ObjectId>,
    history: OnceLock<Arc<Vec<CommitInfo>>>,
}

impl fmt::Debug for GitChangeCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitChangeCtx")
            .field("path", self.config.path())
            .field("revision", &self.revision)
            .field("revision_id", &self.revision_id)
            .field("files", &self.files.len())
            .finish()
    }
}

impl GitChangeCtx {
    /// Snapshot of the primary branch tip.
    pub fn default_revision(repo: ThreadSafeRepository, config: GitBackendConfig) -> Result<Self> {
        let local = repo.to_thread_local();
        let tip = resolve_tip(&local, &config.primary_ref())?;
        let tree = commit_tree(&local, tip)?;
        let blobs = collect_files(&local, tree)?;
        let files: Vec<String> = blobs.keys().cloned().collect();

        debug!(
            "Built git changectx {} for {} ({} files)",
            tip,
            config.path().display(),
            files.len()
        );

        Ok(Self {
            repo,
            config,
            revision: Revision::Default,
            revision_id: RevisionId::new(tip.to_string()),
            tip: Some(tip),
            files,
            blobs,
            history: OnceLock::new(),
        })
    }

    /// Snapshot of the work tree: the index plus untracked, unignored files.
    pub fn working_dir(repo: ThreadSafeRepository, config: GitBackendConfig) -> Result<Self> {
        let local = repo.to_thread_local();
        if local.is_bare() {
            return Err(VellumError::unsupported_revision(
                BACKEND,
                Revision::WorkingDir.as_str(),
                "bare repository has no working directory",
            ));
        }

        let head = local.head_id().ok().map(|id| id.detach());

        let index = local
            .index_or_empty()
            .map_err(|e| git(format!("index: {}", e)))?;
        let mut blobs = BTreeMap::new();
        for entry in index.entries() {
            let path = entry.path(&index).to_str_lossy().into_owned();
            blobs.insert(path, entry.id);
        }

        let matcher = IgnoreMatcher::for_worktree(config.path(), local.path());
        let mut files: Vec<String> = blobs.keys().cloned().collect();
        files.extend(scan_worktree(config.path(), &matcher));
        files.sort();
        files.dedup();

        let revision_id = match head {
            Some(id) => RevisionId::new(id.to_string()),
            None => RevisionId::new(RevisionId::WORKING_DIR),
        };

        debug!(
            "Built git working-dir changectx for {} ({} files)",
            config.path().display(),
            files.len()
        );

        Ok(Self {
            repo,
            config,
            revision: Revision::WorkingDir,
            revision_id,
            tip: head,
            files,
            blobs,
            history: OnceLock::new(),
        })
    }

    fn history(&self) -> Result<Arc<Vec<CommitInfo>>> {
        if let Some(history) = self.history.get() {
            return Ok(Arc::clone(history));
        }
        let loaded = match self.tip {
            Some(tip) => history::load(&self.repo.to_thread_local(), tip)?,
            None => Vec::new(),
        };
        Ok(Arc::clone(self.history.get_or_init(|| Arc::new(loaded))))
    }

    fn read_data(&self, local: &gix::Repository, path: &str) -> Result<(Vec<u8>, Option<ObjectId>)> {
        if self.revision.is_working_dir() {
            let disk = self.config.path().join(path);
            if disk.is_file() {
                return Ok((fs::read(disk)?, None));
            }
        }
        match self.blobs.get(path) {
            Some(&id) => Ok((blob_data(local, id)?, Some(id))),
            None => Err(VellumError::file_not_found(path)),
        }
    }

    fn current_tip(&self) -> Option<ObjectId> {
        let local = self.repo.to_thread_local();
        match resolve_tip(&local, &self.config.primary_ref()) {
            Ok(tip) => Some(tip),
            Err(e) => {
                warn!("Cannot resolve {}: {}", self.config.primary_ref(), e);
                None
            },
        }
    }
}

/// Untracked candidates below `root`, `.git` and ignored paths excluded.
fn scan_worktree(root: &Path, matcher: &IgnoreMatcher) -> Vec<String> {
    let relative = |path: &Path| {
        path.strip_prefix(root)
            .ok()
            .map(|p| normalize_path(&p.to_string_lossy()))
    };

    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.file_name() == ".git" {
                return false;
            }
            match relative(entry.path()) {
                Some(rel) => !matcher.is_ignored(&rel, entry.file_type().is_dir()),
                None => false,
            }
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| relative(entry.path()))
        .collect()
}

impl ChangeCtx for GitChangeCtx {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn revision_id(&self) -> &RevisionId {
        &self.revision_id
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn filectx(&self, path: &str) -> Result<Arc<dyn FileCtx>> {
        let path = normalize_path(path);
        if !self.contains(&path) {
            return Err(VellumError::file_not_found(path));
        }

        let local = self.repo.to_thread_local();
        let (data, blob) = self.read_data(&local, &path)?;

        let history = self.history()?;
        let (date, mdate, author) = match history::for_path(&local, &history, &path)? {
            Some(h) => (h.date, h.mdate, Some(h.author)),
            // untracked: not in any commit yet
            None => (unix_now(), None, configured_author(&local)),
        };

        Ok(Arc::new(GitFileCtx {
            path,
            data,
            date,
            mdate,
            author,
            blob: blob.map(|id| id.to_string()),
        }))
    }

    fn needs_reload(&self) -> bool {
        if self.revision.is_working_dir() {
            return true;
        }
        self.current_tip() != self.tip
    }

    fn filectx_needs_reload(&self, filectx: &dyn FileCtx) -> bool {
        if self.revision.is_working_dir() {
            return true;
        }
        let Some(tip) = self.current_tip() else {
            return true;
        };
        if Some(tip) == self.tip {
            return false;
        }

        let local = self.repo.to_thread_local();
        let current = commit_tree(&local, tip)
            .and_then(|tree| entry_at(&local, tree, filectx.path()));
        match current {
            Ok(Some(blob)) => Some(blob.to_string().as_str()) != filectx.content_id(),
            Ok(None) => true,
            Err(e) => {
                warn!("Cannot check {} at {}: {}", filectx.path(), tip, e);
                true
            },
        }
    }
}
