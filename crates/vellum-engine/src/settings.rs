//! Process-level engine settings.
//!
//! Settings come from a builder or from an optional settings file overlaid
//! with `VELLUM_*` environment variables:
//!
//! | Variable                 | Field              | Default   |
//! |--------------------------|--------------------|-----------|
//! | `VELLUM_REPO_PATH`       | `repo_path`        | `.`       |
//! | `VELLUM_REVISION`        | `revision`         | `default` |
//! | `VELLUM_DEBUG`           | `debug`            | `false`   |
//! | `VELLUM_INTERACTIVE`     | `interactive`      | `false`   |
//! | `VELLUM_PRIMARY_BRANCH`  | `primary_branch`   | `master`  |
//! | `VELLUM_REFRESH_SECS`    | `refresh_secs`     | `30`      |

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vellum_core::{Revision, VellumError};

use crate::error::Result;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "VELLUM";

/// Settings of one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Repository root.
    repo_path: PathBuf,
    /// Revision mode served by the engine.
    revision: Revision,
    /// Shows future-dated entries.
    debug: bool,
    /// Authoring mode: shows future-dated entries, disables analytics and
    /// flags comments as development.
    interactive: bool,
    /// Git branch whose tip is the default revision.
    primary_branch: String,
    /// Seconds between scheduled reloads.
    refresh_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            revision: Revision::Default,
            debug: false,
            interactive: false,
            primary_branch: "master".to_string(),
            refresh_secs: 30,
        }
    }
}

impl EngineSettings {
    /// Creates a new builder for EngineSettings.
    pub fn builder() -> EngineSettingsBuilder {
        EngineSettingsBuilder::default()
    }

    /// Loads settings from `file` (if given and present) and the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, None)
    }

    /// Like [`EngineSettings::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_from(file: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            debug!("Reading engine settings from {}", file.display());
            builder = builder.add_source(File::from(file).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.primary_branch.trim().is_empty() {
            return Err(VellumError::validation("primary_branch", "cannot be empty").into());
        }
        if self.refresh_secs == 0 {
            return Err(VellumError::validation("refresh_secs", "must be positive").into());
        }
        Ok(())
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn primary_branch(&self) -> &str {
        &self.primary_branch
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

/// Builder for EngineSettings.
#[derive(Debug, Default)]
pub struct EngineSettingsBuilder {
    repo_path: Option<PathBuf>,
    revision: Option<Revision>,
    debug: bool,
    interactive: bool,
    primary_branch: Option<String>,
    refresh_interval: Option<Duration>,
}

impl EngineSettingsBuilder {
    /// Sets the repository root.
    pub fn repo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repo_path = Some(path.into());
        self
    }

    /// Sets the revision mode.
    pub fn revision(mut self, revision: Revision) -> Self {
        self.revision = Some(revision);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Sets the git primary branch.
    pub fn primary_branch(mut self, branch: impl Into<String>) -> Self {
        self.primary_branch = Some(branch.into());
        self
    }

    /// Sets the scheduled reload interval, rounded down to whole seconds.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the repository path is missing, the
    /// branch is empty or the interval is under one second.
    pub fn build(self) -> Result<EngineSettings> {
        let defaults = EngineSettings::default();
        let repo_path = self
            .repo_path
            .ok_or_else(|| VellumError::validation("repo_path", "is required"))?;

        let settings = EngineSettings {
            repo_path,
            revision: self.revision.unwrap_or(defaults.revision),
            debug: self.debug,
            interactive: self.interactive,
            primary_branch: self.primary_branch.unwrap_or(defaults.primary_branch),
            refresh_secs: self
                .refresh_interval
                .map_or(defaults.refresh_secs, |d| d.as_secs()),
        };
        settings.validate()?;
        Ok(settings)
    }
}
