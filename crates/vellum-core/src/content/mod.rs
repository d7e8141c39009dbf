//! Content index: pages, posts and the blog built from a snapshot.
//!
//! Content files live under a content directory and share one extension.
//! Files whose first segment below the content directory is `post` are
//! posts; everything else is a page. The slug of an entry is its path with
//! the content directory and the extension stripped.

pub mod blog;
pub mod entry;
pub mod metadata;

use serde::{Deserialize, Serialize};

pub use blog::{AliasTarget, Blog};
pub use entry::{Entry, EntryKind};
pub use metadata::{Alias, Metadata};

/// Reserved first segment below the content directory for posts.
pub const POST_SEGMENT: &str = "post";

/// Content layout and build switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOptions {
    /// Directory holding content files, relative to the repository root.
    pub content_dir: String,
    /// Extension of content files, leading dot included.
    pub post_ext: String,
    /// Top section level used by renderers.
    pub header_level: u32,
    /// Shows entries dated in the future.
    pub debug: bool,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            post_ext: ".rst".to_string(),
            header_level: 3,
            debug: false,
        }
    }
}

impl ContentOptions {
    /// Creates options for the given layout with debug off.
    pub fn new(content_dir: impl Into<String>, post_ext: impl Into<String>) -> Self {
        Self {
            content_dir: content_dir.into(),
            post_ext: post_ext.into(),
            ..Self::default()
        }
    }

    /// Sets the debug switch.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the header level.
    pub fn with_header_level(mut self, header_level: u32) -> Self {
        self.header_level = header_level;
        self
    }

    fn content_prefix(&self) -> String {
        format!("{}/", self.content_dir.trim_matches('/'))
    }

    /// Returns the slug of `path`, or `None` when `path` is not content.
    ///
    /// # Example
    ///
    /// ```
    /// use vellum_core::content::ContentOptions;
    ///
    /// let options = ContentOptions::default();
    /// assert_eq!(options.slug("content/post/hello.rst").as_deref(), Some("post/hello"));
    /// assert_eq!(options.slug("static/screen.css"), None);
    /// ```
    pub fn slug(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(&self.content_prefix())?;
        let slug = rest.strip_suffix(&self.post_ext)?;
        if slug.is_empty() || slug.ends_with('/') {
            return None;
        }
        Some(slug.to_string())
    }

    /// Classifies `path`, or returns `None` when `path` is not content.
    pub fn classify(&self, path: &str) -> Option<EntryKind> {
        let slug = self.slug(path)?;
        match slug.split_once('/') {
            Some((POST_SEGMENT, rest)) if !rest.is_empty() => Some(EntryKind::Post),
            _ => Some(EntryKind::Page),
        }
    }
}
