//! Static files and attachments.

use std::sync::Arc;

use vellum_core::{FileCtx, Result};

use crate::snapshot::Snapshot;
use crate::templates::join_checked;

/// A file served as-is, with its cache validator.
#[derive(Debug, Clone)]
pub struct Asset {
    filectx: Arc<dyn FileCtx>,
    etag: String,
}

impl Asset {
    /// Repository-relative path.
    pub fn path(&self) -> &str {
        self.filectx.path()
    }

    pub fn data(&self) -> &[u8] {
        self.filectx.data()
    }

    pub fn len(&self) -> usize {
        self.filectx.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.filectx.data().is_empty()
    }

    /// Last modification time, falling back to the creation time.
    pub fn modified(&self) -> i64 {
        self.filectx.mdate().unwrap_or_else(|| self.filectx.date())
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }
}

fn load(snapshot: &Snapshot, dir_key: &str, default_dir: &str, name: &str) -> Result<Asset> {
    let dir = snapshot.config().get_str_or(dir_key, default_dir).trim_matches('/');
    let path = join_checked(dir, name)?;
    let changectx = snapshot.changectx();
    let filectx = changectx.filectx(&path)?;
    let etag = changectx.etag(filectx.as_ref());
    Ok(Asset { filectx, etag })
}

/// Loads `name` from the static directory (`STATIC_DIR`).
pub fn static_file(snapshot: &Snapshot, name: &str) -> Result<Asset> {
    load(snapshot, "STATIC_DIR", "static", name)
}

/// Loads `name` from the attachment directory (`ATTACHMENT_DIR`).
pub fn attachment(snapshot: &Snapshot, name: &str) -> Result<Asset> {
    load(snapshot, "ATTACHMENT_DIR", "content/attachments", name)
}
