//! Git backend configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for one Git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitBackendConfig {
    /// Repository root (work tree) or bare repository directory.
    path: PathBuf,

    /// Branch whose tip defines the default revision.
    #[serde(default = "default_primary_branch")]
    primary_branch: String,
}

pub(crate) fn default_primary_branch() -> String {
    "master".to_string()
}

impl GitBackendConfig {
    /// Creates a new builder for GitBackendConfig.
    pub fn builder() -> GitBackendConfigBuilder {
        GitBackendConfigBuilder::default()
    }

    /// Configuration for `path` with default settings.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            primary_branch: default_primary_branch(),
        }
    }

    /// Returns the repository path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the primary branch name.
    pub fn primary_branch(&self) -> &str {
        &self.primary_branch
    }

    /// Returns the full reference name of the primary branch.
    pub fn primary_ref(&self) -> String {
        format!("refs/heads/{}", self.primary_branch)
    }
}

/// Builder for GitBackendConfig.
#[derive(Debug, Default)]
pub struct GitBackendConfigBuilder {
    path: Option<PathBuf>,
    primary_branch: Option<String>,
}

impl GitBackendConfigBuilder {
    /// Sets the repository path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the primary branch.
    pub fn primary_branch(mut self, branch: impl Into<String>) -> Self {
        self.primary_branch = Some(branch.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing or the branch name is empty.
    pub fn build(self) -> Result<GitBackendConfig, &'static str> {
        let path = self.path.ok_or("path is required")?;
        let primary_branch = self.primary_branch.unwrap_or_else(default_primary_branch);
        let primary_branch = primary_branch.trim().trim_start_matches("refs/heads/").to_string();
        if primary_branch.is_empty() {
            return Err("primary_branch cannot be empty");
        }

        Ok(GitBackendConfig {
            path,
            primary_branch,
        })
    }
}
