//! Common type definitions and newtypes for Vellum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VellumError;

/// Which view of the repository a snapshot represents.
///
/// An engine is configured with exactly one of these; the two modes never
/// mix within one running index.
///
/// # Example
///
/// ```
/// use vellum_core::Revision;
///
/// let rev: Revision = "working_dir".parse().unwrap();
/// assert_eq!(rev, Revision::WorkingDir);
/// assert_eq!(Revision::default(), Revision::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    /// Last commit on the primary branch.
    #[default]
    Default,
    /// Live directory contents, untracked files included.
    #[serde(alias = "working-dir")]
    WorkingDir,
}

impl Revision {
    /// Returns the canonical name of the revision mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Revision::Default => "default",
            Revision::WorkingDir => "working_dir",
        }
    }

    /// Returns true for the live working directory mode.
    pub fn is_working_dir(&self) -> bool {
        matches!(self, Revision::WorkingDir)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Revision {
    type Err = VellumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Revision::Default),
            "working_dir" | "working-dir" | "workingdir" => Ok(Revision::WorkingDir),
            other => Err(VellumError::validation(
                "revision",
                format!("unknown revision mode '{}'", other),
            )),
        }
    }
}

/// Backend-specific identifier of a snapshot.
///
/// Opaque to everything above the adapters; only compared for equality.
///
/// # Example
///
/// ```
/// use vellum_core::RevisionId;
///
/// let id = RevisionId::new("3f2a9c0");
/// assert_eq!(id.as_str(), "3f2a9c0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    /// Marker used when a working directory has no committed parent yet.
    pub const WORKING_DIR: &'static str = "working-dir";

    /// Creates a new RevisionId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a shortened form suitable for log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RevisionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_parse() {
        assert_eq!("default".parse::<Revision>().unwrap(), Revision::Default);
        assert_eq!(
            "working-dir".parse::<Revision>().unwrap(),
            Revision::WorkingDir
        );
        assert_eq!(
            " WORKING_DIR ".parse::<Revision>().unwrap(),
            Revision::WorkingDir
        );
        assert!("tip".parse::<Revision>().is_err());
    }

    #[test]
    fn test_revision_display_roundtrip() {
        for rev in [Revision::Default, Revision::WorkingDir] {
            assert_eq!(rev.to_string().parse::<Revision>().unwrap(), rev);
        }
    }

    #[test]
    fn test_revision_serde() {
        let rev: Revision = serde_json::from_str("\"working_dir\"").unwrap();
        assert_eq!(rev, Revision::WorkingDir);

        let rev: Revision = serde_json::from_str("\"working-dir\"").unwrap();
        assert_eq!(rev, Revision::WorkingDir);

        assert_eq!(serde_json::to_string(&Revision::Default).unwrap(), "\"default\"");
    }

    #[test]
    fn test_revision_id_short() {
        let id = RevisionId::new("0123456789abcdef0123");
        assert_eq!(id.short(), "0123456789ab");

        let id = RevisionId::new("abc");
        assert_eq!(id.short(), "abc");
    }
}
