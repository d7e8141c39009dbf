//! The content index of one snapshot.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ContentOptions, Entry};
use crate::vcs::ChangeCtx;

/// Where an alias redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// HTTP status of the redirect.
    pub status: u16,
    /// Slug of the target entry.
    pub slug: String,
}

/// All visible entries of one snapshot, with tag and alias tables.
///
/// A blog is built once per snapshot and never modified; a changed
/// repository produces a new blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    entries: Vec<Entry>,
    tags: Vec<String>,
    aliases: IndexMap<String, AliasTarget>,
    options: ContentOptions,
}

impl Blog {
    /// Scans `ctx` and builds the index.
    ///
    /// Entries that cannot be read are skipped with a warning. Outside debug
    /// mode, entries not yet published at `now` are left out. The result is
    /// a pure function of the snapshot, the options and `now`.
    pub fn build(ctx: &dyn ChangeCtx, options: &ContentOptions, now: i64) -> Self {
        let mut entries = Vec::new();

        for path in ctx.files() {
            let Some(kind) = options.classify(path) else {
                continue;
            };
            let Some(slug) = options.slug(path) else {
                continue;
            };

            let entry = match ctx
                .filectx(path)
                .and_then(|file| Entry::from_filectx(file.as_ref(), kind, slug))
            {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping {}: {}", path, e);
                    continue;
                },
            };

            if !options.debug && !ctx.published(entry.date(), now) {
                debug!("Hiding unpublished entry {} (date {})", path, entry.date());
                continue;
            }

            entries.push(entry);
        }

        Self::from_entries(entries, options.clone())
    }

    /// Builds the tag and alias tables over already parsed entries, given in
    /// scan order.
    pub fn from_entries(mut entries: Vec<Entry>, options: ContentOptions) -> Self {
        let mut aliases = IndexMap::new();
        let mut tags = BTreeSet::new();

        for entry in &entries {
            for alias in entry.aliases() {
                let target = AliasTarget {
                    status: alias.status,
                    slug: entry.slug().to_string(),
                };
                // later entries replace earlier ones for the same path
                if let Some(previous) = aliases.insert(alias.path.clone(), target) {
                    debug!(
                        "Alias {} now points to {} instead of {}",
                        alias.path,
                        entry.slug(),
                        previous.slug
                    );
                }
            }
            tags.extend(entry.tags().iter().cloned());
        }

        // stable: equal dates keep scan order
        entries.sort_by(|a, b| b.date().cmp(&a.date()));

        debug!(
            "Built blog with {} entries, {} tags, {} aliases",
            entries.len(),
            tags.len(),
            aliases.len()
        );

        Self {
            entries,
            tags: tags.into_iter().collect(),
            aliases,
            options,
        }
    }

    /// Returns the entry with the given slug.
    pub fn get(&self, slug: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.slug() == slug)
    }

    /// Returns every entry, newest first, or only posts.
    pub fn get_all(&self, only_posts: bool) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| !only_posts || e.is_post())
            .collect()
    }

    /// Returns posts carrying every tag of `tags`, newest first.
    pub fn get_by_tag<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.is_post())
            .filter(|e| tags.iter().all(|t| e.has_tag(t.as_ref())))
            .collect()
    }

    /// Sorted, deduplicated tags of all posts.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Alias path to redirect target.
    pub fn aliases(&self) -> &IndexMap<String, AliasTarget> {
        &self.aliases
    }

    /// Looks up the redirect for `path`.
    pub fn resolve_alias(&self, path: &str) -> Option<&AliasTarget> {
        self.aliases.get(path)
    }

    /// Options the blog was built with.
    pub fn options(&self) -> &ContentOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}
