//! `.gitignore` matching for the working directory view.
//!
//! Only the root `.gitignore` and `.git/info/exclude` are honoured. Nested
//! ignore files and global excludes are not consulted.

use std::path::Path;

use gix::bstr::{BString, ByteSlice};
use gix::glob::pattern::Mode;
use gix::glob::wildmatch;

/// Ordered ignore patterns; the last matching pattern decides.
///
/// Built from at most two sources, `.git/info/exclude` and the root
/// `.gitignore`, so an ignore file in a subdirectory has no effect.
#[derive(Debug, Default, Clone)]
pub struct IgnoreMatcher {
    patterns: Vec<(BString, Mode)>,
}

impl IgnoreMatcher {
    /// Parses the contents of one ignore file.
    pub fn new(source: &[u8]) -> Self {
        let mut matcher = Self::default();
        matcher.extend(source);
        matcher
    }

    /// Loads `.git/info/exclude` followed by the root `.gitignore` of a
    /// work tree. Missing files contribute nothing.
    pub fn for_worktree(worktree: &Path, git_dir: &Path) -> Self {
        let mut matcher = Self::default();
        for file in [git_dir.join("info").join("exclude"), worktree.join(".gitignore")] {
            if let Ok(bytes) = std::fs::read(&file) {
                matcher.extend(&bytes);
            }
        }
        matcher
    }

    fn extend(&mut self, source: &[u8]) {
        self.patterns.extend(
            gix::ignore::parse(source).map(|(pattern, _, _)| (pattern.text, pattern.mode)),
        );
    }

    /// Returns true if `path` (relative, forward slashes) is ignored.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let basename = path.rsplit_once('/').map_or(path, |(_, name)| name);
        let mut ignored = false;

        for (text, mode) in &self.patterns {
            if mode.contains(Mode::MUST_BE_DIR) && !is_dir {
                continue;
            }

            // Patterns without a slash match the basename at any depth.
            let anchored = mode.contains(Mode::ABSOLUTE) || !mode.contains(Mode::NO_SUB_DIR);
            let candidate = if anchored { path } else { basename };

            if wildmatch(
                text.as_bstr(),
                candidate.into(),
                wildmatch::Mode::NO_MATCH_SLASH_LITERAL,
            ) {
                ignored = !mode.contains(Mode::NEGATIVE);
            }
        }

        ignored
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
