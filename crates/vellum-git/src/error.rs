//! Error helpers for the Git backend.
//!
//! gix error types differ per operation, so failures are flattened into
//! [`VellumError::Vcs`] with a message naming the step that failed.

use vellum_core::VellumError;

/// Backend identifier used in errors and by the registry.
pub const BACKEND: &str = "git";

/// Creates a Git backend error.
pub(crate) fn git(msg: impl Into<String>) -> VellumError {
    VellumError::vcs(BACKEND, msg)
}
