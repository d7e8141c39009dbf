//! Named callbacks run after each published snapshot.
//!
//! Extensions register under a unique name; registering the same name again
//! replaces the previous callback in place.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::snapshot::Snapshot;

/// Callback invoked with the newly published snapshot.
pub type ReloadHook = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Ordered table of reload hooks.
#[derive(Default)]
pub struct ReloadHooks {
    hooks: RwLock<Vec<(String, ReloadHook)>>,
}

impl ReloadHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` under `name`. Returns true if a hook was replaced.
    pub fn register<F>(&self, name: impl Into<String>, hook: F) -> bool
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let name = name.into();
        let hook: ReloadHook = Arc::new(hook);
        let mut hooks = self.hooks.write();

        if let Some(slot) = hooks.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = hook;
            debug!("Replaced reload hook {}", name);
            return true;
        }
        debug!("Registered reload hook {}", name);
        hooks.push((name, hook));
        false
    }

    /// Removes the hook named `name`. Returns true if it existed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut hooks = self.hooks.write();
        let before = hooks.len();
        hooks.retain(|(n, _)| n != name);
        hooks.len() != before
    }

    /// Hook names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.hooks.read().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Calls every hook with `snapshot`, in registration order.
    ///
    /// The table is not locked while hooks run, so a hook may register or
    /// remove hooks; the change applies from the next run.
    pub fn run(&self, snapshot: &Snapshot) {
        let hooks: Vec<(String, ReloadHook)> = self.hooks.read().clone();
        for (name, hook) in hooks {
            debug!("Running reload hook {} for generation {}", name, snapshot.generation());
            hook(snapshot);
        }
    }
}

impl fmt::Debug for ReloadHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadHooks")
            .field("names", &self.names())
            .finish()
    }
}
