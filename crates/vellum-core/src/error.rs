//! The error type shared by every Vellum crate.
//!
//! Library code only returns errors; turning them into HTTP statuses or CLI
//! messages is up to the caller.
//!
//! - Backend resolution and snapshot construction errors are fatal for
//!   the operation that raised them, never for previously published state
//! - Content read errors are per-call not-found conditions
//! - Metadata problems inside a single entry are logged and recovered from
//!
//! # Example
//!
//! ```
//! use vellum_core::{Result, VellumError};
//!
//! fn read_page(path: &str) -> Result<String> {
//!     if path.is_empty() {
//!         return Err(VellumError::file_not_found(path));
//!     }
//!     Ok(format!("contents of {}", path))
//! }
//!
//! assert!(read_page("").unwrap_err().is_not_found());
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Vellum operations.
///
/// Each variant includes enough context to diagnose the failure
/// without access to the repository that produced it.
#[derive(Debug, Error)]
pub enum VellumError {
    /// No registered backend recognised the directory.
    #[error("No supported repository backend found at '{}'", path.display())]
    NoBackend {
        /// Directory that was probed
        path: PathBuf,
    },

    /// The revision could not be resolved (missing branch, empty repository).
    #[error("Revision '{revision}' not found: {reason}")]
    RevisionNotFound {
        /// Revision or ref that was requested
        revision: String,
        /// Why it could not be resolved
        reason: String,
    },

    /// The backend cannot provide the requested revision mode.
    #[error("Revision '{revision}' is not supported by {backend} repository: {reason}")]
    UnsupportedRevision {
        /// Backend identifier
        backend: String,
        /// Revision mode requested
        revision: String,
        /// Why it is not supported
        reason: String,
    },

    /// A path is not part of the snapshot.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Repository-relative path
        path: String,
    },

    /// `create_repo` was called on a directory that already holds a repository.
    #[error("Repository already initialized at '{}'", path.display())]
    AlreadyInitialized {
        /// Directory that was targeted
        path: PathBuf,
    },

    /// The snapshot has no configuration file.
    #[error("Configuration file '{path}' not found in revision {revision}")]
    ConfigMissing {
        /// Repository-relative path of the configuration file
        path: String,
        /// Revision that was inspected
        revision: String,
    },

    /// Error parsing content or configuration.
    #[error("Failed to parse '{source_name}': {message}")]
    Parse {
        /// File or field being parsed
        source_name: String,
        /// Description of the parse error
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A version-control operation failed.
    #[error("{backend} error: {message}")]
    Vcs {
        /// Backend identifier
        backend: String,
        /// Description of what went wrong
        message: String,
    },

    /// An external command exited unsuccessfully.
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    Command {
        /// Command line that was run
        command: String,
        /// Exit status, -1 when terminated by a signal
        status: i32,
        /// Captured standard error
        stderr: String,
    },

    /// Validation error for settings values.
    #[error("Validation error for field '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VellumError {
    /// Creates a NoBackend error.
    pub fn no_backend(path: impl Into<PathBuf>) -> Self {
        Self::NoBackend { path: path.into() }
    }

    /// Creates a RevisionNotFound error.
    pub fn revision_not_found(revision: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RevisionNotFound {
            revision: revision.into(),
            reason: reason.into(),
        }
    }

    /// Creates an UnsupportedRevision error.
    pub fn unsupported_revision(
        backend: impl Into<String>,
        revision: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedRevision {
            backend: backend.into(),
            revision: revision.into(),
            reason: reason.into(),
        }
    }

    /// Creates a FileNotFound error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an AlreadyInitialized error.
    pub fn already_initialized(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyInitialized { path: path.into() }
    }

    /// Creates a ConfigMissing error.
    pub fn config_missing(path: impl Into<String>, revision: impl Into<String>) -> Self {
        Self::ConfigMissing {
            path: path.into(),
            revision: revision.into(),
        }
    }

    /// Creates a Parse error without a cause.
    pub fn parse_error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Parse error with a cause.
    pub fn parse_error_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Vcs error for the given backend.
    pub fn vcs(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Vcs {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Creates a Command error.
    pub fn command(command: impl Into<String>, status: i32, stderr: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            status,
            stderr: stderr.into(),
        }
    }

    /// Creates a Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if a path or revision could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::RevisionNotFound { .. }
        )
    }

    /// Returns true if the error came from a VCS backend or its tooling.
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            Self::NoBackend { .. }
                | Self::Vcs { .. }
                | Self::Command { .. }
                | Self::UnsupportedRevision { .. }
        )
    }

    /// Returns true if the error concerns configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. } | Self::Validation { .. })
    }

    /// Returns true if this is a parse error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Type alias for Results with VellumError.
pub type Result<T> = std::result::Result<T, VellumError>;
