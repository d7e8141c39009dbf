//! # Vellum Engine
//!
//! Keeps the current content snapshot of a blog repository and reloads it
//! when the repository changes.
//!
//! A [`Snapshot`] bundles the change context, the merged site configuration
//! and the [`Blog`](vellum_core::Blog) index built from them. The
//! [`Engine`] publishes snapshots atomically; readers hold an `Arc` to the
//! snapshot they started with and are never affected by a reload.
//!
//! ## Example
//!
//! ```ignore
//! use vellum_engine::{Engine, EngineSettings};
//!
//! let settings = EngineSettings::load(None)?;
//! let engine = Engine::new(settings);
//! engine.reload()?;
//!
//! if let Some(snapshot) = engine.current() {
//!     for post in snapshot.blog().get_all(true) {
//!         println!("{}", post.title().unwrap_or(post.slug()));
//!     }
//! }
//! ```

pub mod assets;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod scheduler;
pub mod settings;
pub mod site_config;
pub mod snapshot;
pub mod state;
pub mod telemetry;
pub mod templates;

pub use assets::Asset;
pub use engine::{Engine, ReloadOutcome};
pub use error::{EngineError, Result};
pub use hooks::{ReloadHook, ReloadHooks};
pub use metrics::ReloadMetrics;
pub use scheduler::{RefreshConfig, RefreshHandle, RefreshScheduler};
pub use settings::{EngineSettings, EngineSettingsBuilder};
pub use snapshot::Snapshot;
pub use state::ReloadState;
pub use templates::TemplateSource;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
