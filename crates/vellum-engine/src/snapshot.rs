//! The published (changectx, config, blog) triple.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use vellum_core::{Blog, ChangeCtx, ConfigMap, RevisionId};

/// One consistent view of the repository.
///
/// Built completely before publication and never modified afterwards;
/// readers holding an `Arc<Snapshot>` keep seeing the same triple.
pub struct Snapshot {
    generation: u64,
    changectx: Arc<dyn ChangeCtx>,
    config: ConfigMap,
    blog: Blog,
    loaded_at: SystemTime,
}

impl Snapshot {
    pub fn new(generation: u64, changectx: Arc<dyn ChangeCtx>, config: ConfigMap, blog: Blog) -> Self {
        Self {
            generation,
            changectx,
            config,
            blog,
            loaded_at: SystemTime::now(),
        }
    }

    /// Position in the engine's publication sequence, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn changectx(&self) -> &Arc<dyn ChangeCtx> {
        &self.changectx
    }

    pub fn revision_id(&self) -> &RevisionId {
        self.changectx.revision_id()
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("revision", &self.changectx.revision())
            .field("revision_id", self.changectx.revision_id())
            .field("entries", &self.blog.len())
            .finish()
    }
}
