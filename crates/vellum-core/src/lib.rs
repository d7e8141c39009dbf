//! Vellum Core - domain types, VCS contract and content index
//!
//! This crate provides the backend-agnostic foundation of Vellum:
//!
//! - [`vcs`]: the `Backend`/`Repository`/`ChangeCtx`/`FileCtx` contract
//!   implemented by the git and mercurial adapters
//! - [`content`]: metadata parsing, pages, posts and the [`Blog`] index
//! - [`config`] and [`merge`]: layered site configuration
//! - [`template`]: the starter tree written by `create_repo`

pub mod config;
pub mod content;
pub mod error;
pub mod merge;
pub mod template;
pub mod types;
pub mod vcs;

pub use config::{ConfigLayer, ConfigMap, ConfigValue};
pub use content::{Blog, ContentOptions, Entry, EntryKind};
pub use error::{Result, VellumError};
pub use merge::{ConfigLayerList, deep_merge};
pub use types::{Revision, RevisionId};
pub use vcs::{Backend, ChangeCtx, FileCtx, Repository};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
