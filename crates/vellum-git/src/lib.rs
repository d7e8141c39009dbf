//! # Vellum Git Backend
//!
//! Reads site content from Git repositories through `gix`, without a
//! system `git` binary.
//!
//! ## Features
//!
//! - Snapshots of the primary branch tip or of the working directory
//! - Per-file creation and modification dates from commit history
//! - Cheap staleness checks that only re-resolve the branch tip
//! - Bare repositories (primary branch only)
//! - `create_repo` writing the starter tree and an empty repository
//!
//! ## Example
//!
//! ```ignore
//! use vellum_core::{Backend, Revision};
//! use vellum_git::GitBackend;
//!
//! let backend = GitBackend::new("master");
//! let repo = backend.open(path)?;
//! let ctx = repo.changectx(Revision::Default)?;
//! let config = ctx.filectx("config.yaml")?;
//! ```

pub mod backend;
pub mod changectx;
pub mod config;
pub mod error;
pub mod filectx;
pub mod history;
pub mod ignore;
pub mod repository;
pub mod tree;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

// Re-exports
pub use backend::GitBackend;
pub use changectx::GitChangeCtx;
pub use config::GitBackendConfig;
pub use filectx::GitFileCtx;
pub use ignore::IgnoreMatcher;
pub use repository::GitRepository;

// Re-export vellum_core for consumers
pub use vellum_core;
