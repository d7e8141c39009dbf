//! Engine error types.

use thiserror::Error;
use vellum_core::VellumError;

/// Errors raised by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A backend, content or configuration failure.
    #[error(transparent)]
    Core(#[from] VellumError),

    /// Process settings could not be loaded.
    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    /// A background reload task panicked or was cancelled.
    #[error("reload task failed: {0}")]
    Task(String),
}

impl EngineError {
    /// Returns true if the snapshot has no `config.yaml`.
    pub fn is_config_missing(&self) -> bool {
        matches!(self, Self::Core(VellumError::ConfigMissing { .. }))
    }

    /// Returns the core error, if any.
    pub fn as_core(&self) -> Option<&VellumError> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}

/// Type alias for Results with EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;
