//! Opening, probing and creating Mercurial repositories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use vellum_core::template::{ensure_uninitialized, write_starter_tree};
use vellum_core::{ChangeCtx, Repository, Result, Revision};

use crate::changectx::HgChangeCtx;
use crate::command::Hg;
use crate::error::{BACKEND, hg};

/// Ignore file written by `create_repo`.
pub const IGNORE_FILE: (&str, &str) = (".hgignore", "^build/\n");

/// An opened Mercurial repository.
#[derive(Debug)]
pub struct HgRepository {
    path: PathBuf,
    hg: Hg,
}

impl HgRepository {
    /// Opens the repository at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !supported(&path) {
            return Err(hg(format!("no repository at {}", path.display())));
        }
        let hg = Hg::locate(&path)?;
        info!("Opened hg repository at {}", path.display());
        Ok(Self { path, hg })
    }
}

impl Repository for HgRepository {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn changectx(&self, revision: Revision) -> Result<Arc<dyn ChangeCtx>> {
        let ctx = match revision {
            Revision::Default => HgChangeCtx::default_revision(self.hg.clone())?,
            Revision::WorkingDir => HgChangeCtx::working_dir(self.hg.clone())?,
        };
        Ok(Arc::new(ctx))
    }
}

/// Returns true if `path` holds a `.hg` directory.
pub fn supported(path: &Path) -> bool {
    path.join(".hg").is_dir()
}

/// Writes the starter tree into `path` and initialises a repository there.
/// Nothing is committed.
pub fn create_repo(path: &Path) -> Result<()> {
    ensure_uninitialized(path, ".hg")?;
    let hg = Hg::locate(path)?;

    write_starter_tree(path, IGNORE_FILE)?;
    hg.run(&["init"])?;

    info!("Created hg repository at {}", path.display());
    Ok(())
}
