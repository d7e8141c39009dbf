//! Error helpers for the Mercurial backend.

use vellum_core::VellumError;

/// Backend identifier used in errors and by the registry.
pub const BACKEND: &str = "hg";

/// Creates a Mercurial backend error.
pub(crate) fn hg(msg: impl Into<String>) -> VellumError {
    VellumError::vcs(BACKEND, msg)
}
