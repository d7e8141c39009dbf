//! Backend-agnostic contract over version-control systems.
//!
//! A [`Backend`] knows how to recognise, create and open one kind of
//! repository. An opened [`Repository`] hands out [`ChangeCtx`] snapshots,
//! and each snapshot hands out [`FileCtx`] values for the paths it contains.
//! Everything above this boundary talks to trait objects only.
//!
//! # Example
//!
//! ```ignore
//! use vellum_core::{Revision, vcs::Repository};
//!
//! let ctx = repo.changectx(Revision::Default)?;
//! for path in ctx.files() {
//!     let file = ctx.filectx(path)?;
//!     println!("{} {}", file.path(), ctx.etag(file.as_ref()));
//! }
//! assert!(!ctx.needs_reload());
//! ```

pub mod etag;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, VellumError};
use crate::types::{Revision, RevisionId};

pub use etag::{etag, unix_now};

/// A recognisable, creatable and openable kind of repository.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Short stable identifier ("git", "hg").
    fn identifier(&self) -> &'static str;

    /// Human readable name.
    fn name(&self) -> &'static str;

    /// Discovery priority; lower values are probed first.
    fn priority(&self) -> u32;

    /// Returns true if `path` holds a repository of this kind.
    ///
    /// Never fails: unreadable or missing directories are simply unsupported.
    fn supported(&self, path: &Path) -> bool;

    /// Populates `path` with the starter tree and initialises VCS metadata.
    ///
    /// Fails with [`VellumError::AlreadyInitialized`] without writing
    /// anything when `path` already holds a repository or starter files.
    fn create_repo(&self, path: &Path) -> Result<()>;

    /// Opens the repository at `path`.
    fn open(&self, path: &Path) -> Result<Arc<dyn Repository>>;
}

/// An opened repository; factory for snapshots.
pub trait Repository: Send + Sync + fmt::Debug {
    /// Identifier of the backend that opened this repository.
    fn backend(&self) -> &'static str;

    /// Root directory of the repository.
    fn path(&self) -> &Path;

    /// Builds a snapshot for the given revision mode.
    fn changectx(&self, revision: Revision) -> Result<Arc<dyn ChangeCtx>>;
}

/// One observable state of a repository.
///
/// A changectx never changes after construction. When the repository moves
/// on, a new changectx is built and this one is dropped.
pub trait ChangeCtx: Send + Sync + fmt::Debug {
    /// Revision mode this snapshot was built for.
    fn revision(&self) -> Revision;

    /// Backend identifier of the snapshot.
    fn revision_id(&self) -> &RevisionId;

    /// Sorted repository-relative paths, forward-slash separated.
    fn files(&self) -> &[String];

    /// Returns true if `path` is part of the snapshot.
    fn contains(&self, path: &str) -> bool {
        self.files()
            .binary_search_by(|p| p.as_str().cmp(path))
            .is_ok()
    }

    /// Loads a single file of the snapshot.
    fn filectx(&self, path: &str) -> Result<Arc<dyn FileCtx>>;

    /// Returns true if the repository moved past this snapshot.
    ///
    /// Only the tip is re-resolved; history and file contents are never
    /// read. Resolution failures count as stale.
    fn needs_reload(&self) -> bool;

    /// Returns true if `filectx` differs from the file at the current tip.
    fn filectx_needs_reload(&self, filectx: &dyn FileCtx) -> bool;

    /// Returns true if an entry dated `date` is visible at `now`.
    fn published(&self, date: i64, now: i64) -> bool {
        match self.revision() {
            Revision::Default => date <= now,
            Revision::WorkingDir => true,
        }
    }

    /// Opaque cache validator for `filectx`.
    fn etag(&self, filectx: &dyn FileCtx) -> String {
        etag(self.revision(), filectx, unix_now())
    }
}

/// A single file of one snapshot.
pub trait FileCtx: Send + Sync + fmt::Debug {
    /// Repository-relative path, forward-slash separated.
    fn path(&self) -> &str;

    /// Raw bytes.
    fn data(&self) -> &[u8];

    /// Decoded text.
    fn content(&self) -> Result<&str> {
        std::str::from_utf8(self.data())
            .map_err(|e| VellumError::parse_error_with_cause(self.path(), "invalid UTF-8", e))
    }

    /// Unix time of the earliest revision containing the path.
    fn date(&self) -> i64;

    /// Unix time of the latest revision that changed the path, if it
    /// changed after being introduced.
    fn mdate(&self) -> Option<i64>;

    /// Identity of whoever introduced the path.
    fn author(&self) -> Option<&str>;

    /// Backend identity of the content (blob id, file node), if known.
    fn content_id(&self) -> Option<&str>;
}

/// Normalises a path to forward slashes, without leading `./` or `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let trimmed = path.trim_start_matches("./").trim_start_matches('/');
    trimmed.to_string()
}
