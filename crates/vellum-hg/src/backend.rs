//! Mercurial backend implementation.

use std::path::Path;
use std::sync::Arc;

use vellum_core::{Backend, Repository, Result};

use crate::error::BACKEND;
use crate::repository::{self, HgRepository};

/// Discovery priority of the Mercurial backend.
pub const PRIORITY: u32 = 20;

/// Recognises, creates and opens Mercurial repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct HgBackend;

impl Backend for HgBackend {
    fn identifier(&self) -> &'static str {
        BACKEND
    }

    fn name(&self) -> &'static str {
        "Mercurial"
    }

    fn priority(&self) -> u32 {
        PRIORITY
    }

    fn supported(&self, path: &Path) -> bool {
        repository::supported(path)
    }

    fn create_repo(&self, path: &Path) -> Result<()> {
        repository::create_repo(path)
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn Repository>> {
        Ok(Arc::new(HgRepository::open(path)?))
    }
}
