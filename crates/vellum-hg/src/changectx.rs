//! Mercurial snapshots.

use std::fs;
use std::sync::Arc;

use tracing::{debug, warn};
use vellum_core::vcs::{normalize_path, unix_now};
use vellum_core::{ChangeCtx, FileCtx, Result, Revision, RevisionId, VellumError};

use crate::command::{Hg, revset_quote};
use crate::filectx::HgFileCtx;

const NULL_NODE: &str = "0000000000000000000000000000000000000000";

/// Template for one changeset per line: node, unix time, author.
const LOG_TEMPLATE: &str = "{node}\\t{date|hgdate}\\t{author}\\n";

/// One changeset of a file history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Change {
    pub node: String,
    pub time: i64,
    pub author: String,
}

/// Parses `LOG_TEMPLATE` output, skipping malformed lines.
pub(crate) fn parse_log(text: &str) -> Vec<Change> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let node = fields.next()?.to_string();
            // hgdate is "<unix seconds> <offset>"
            let time = fields.next()?.split_whitespace().next()?.parse().ok()?;
            let author = fields.next().unwrap_or_default().to_string();
            Some(Change { node, time, author })
        })
        .collect()
}

/// Creation time, modification time and author of a file, from its history
/// in revset order (oldest first). The modification time is only set once
/// the file changed after the changeset that added it.
pub(crate) fn summarize_history(history: &[Change]) -> Option<(i64, Option<i64>, String)> {
    let first = history.first()?;
    let last = history.last()?;
    let mdate = (history.len() > 1).then_some(last.time);
    Some((first.time, mdate, first.author.clone()))
}

/// Node of the `default` branch head.
pub(crate) fn resolve_default(hg: &Hg) -> Result<String> {
    let node = hg
        .run_text(&["log", "-r", "default", "-T", "{node}"])
        .map_err(|e| VellumError::revision_not_found("default", e.to_string()))?;
    let node = node.trim();
    if node.is_empty() {
        return Err(VellumError::revision_not_found("default", "no changeset"));
    }
    Ok(node.to_string())
}

fn parse_paths(text: &str) -> Vec<String> {
    let mut files: Vec<String> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(normalize_path)
        .collect();
    files.sort();
    files.dedup();
    files
}

fn configured_author(hg: &Hg) -> Option<String> {
    let name = hg.run_text_allow_empty(&["config", "ui.username"]).ok()?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// One state of a Mercurial repository.
#[derive(Debug)]
pub struct HgChangeCtx {
    hg: Hg,
    revision: Revision,
    revision_id: RevisionId,
    /// Changeset the snapshot was built from; `None` before the first commit.
    node: Option<String>,
    files: Vec<String>,
}

impl HgChangeCtx {
    /// Snapshot of the `default` branch head.
    pub fn default_revision(hg: Hg) -> Result<Self> {
        let node = resolve_default(&hg)?;
        let files = parse_paths(&hg.run_text_allow_empty(&["files", "-r", &node])?);

        debug!(
            "Built hg changectx {} for {} ({} files)",
            node,
            hg.root().display(),
            files.len()
        );

        Ok(Self {
            hg,
            revision: Revision::Default,
            revision_id: RevisionId::new(node.clone()),
            node: Some(node),
            files,
        })
    }

    /// Snapshot of the working directory: modified, added, clean and
    /// unknown files.
    pub fn working_dir(hg: Hg) -> Result<Self> {
        let parent = hg.run_text(&["log", "-r", ".", "-T", "{node}"])?;
        let parent = parent.trim();
        let node = (!parent.is_empty() && parent != NULL_NODE).then(|| parent.to_string());

        let files = parse_paths(&hg.run_text(&["status", "-n", "-m", "-a", "-c", "-u"])?);

        debug!(
            "Built hg working-dir changectx for {} ({} files)",
            hg.root().display(),
            files.len()
        );

        Ok(Self {
            hg,
            revision: Revision::WorkingDir,
            revision_id: RevisionId::new(node.clone().unwrap_or_else(|| RevisionId::WORKING_DIR.to_string())),
            node,
            files,
        })
    }

    fn read_data(&self, path: &str) -> Result<Vec<u8>> {
        if self.revision.is_working_dir() {
            let disk = self.hg.root().join(path);
            if disk.is_file() {
                return Ok(fs::read(disk)?);
            }
        }
        match &self.node {
            Some(node) => self.hg.run(&["cat", "-r", node, &format!("path:{}", path)]),
            None => Err(VellumError::file_not_found(path)),
        }
    }

    fn history(&self, path: &str) -> Result<Vec<Change>> {
        let Some(node) = &self.node else {
            return Ok(Vec::new());
        };
        let revset = format!("follow({}, {})", revset_quote(&format!("path:{}", path)), node);
        let log = self.hg.run_text(&["log", "-r", &revset, "-T", LOG_TEMPLATE]);
        match log {
            Ok(text) => Ok(parse_log(&text)),
            // untracked working directory files have no history yet
            Err(e) if self.revision.is_working_dir() => {
                debug!("No history for {}: {}", path, e);
                Ok(Vec::new())
            },
            Err(e) => Err(e),
        }
    }

    fn current_tip(&self) -> Option<String> {
        match resolve_default(&self.hg) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Cannot resolve default in {}: {}", self.hg.root().display(), e);
                None
            },
        }
    }
}

impl ChangeCtx for HgChangeCtx {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn revision_id(&self) -> &RevisionId {
        &self.revision_id
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn filectx(&self, path: &str) -> Result<Arc<dyn FileCtx>> {
        let path = normalize_path(path);
        if !self.contains(&path) {
            return Err(VellumError::file_not_found(path));
        }

        let data = self.read_data(&path)?;
        let history = self.history(&path)?;

        let (date, mdate, author) = match summarize_history(&history) {
            Some((date, mdate, author)) => (date, mdate, Some(author)),
            None => (unix_now(), None, configured_author(&self.hg)),
        };

        Ok(Arc::new(HgFileCtx {
            path,
            data,
            date,
            mdate,
            author,
        }))
    }

    fn needs_reload(&self) -> bool {
        if self.revision.is_working_dir() {
            return true;
        }
        self.current_tip() != self.node
    }

    fn filectx_needs_reload(&self, filectx: &dyn FileCtx) -> bool {
        if self.revision.is_working_dir() {
            return true;
        }
        let Some(tip) = self.current_tip() else {
            return true;
        };
        if Some(&tip) == self.node.as_ref() {
            return false;
        }

        let path = format!("path:{}", filectx.path());
        match self.hg.run(&["cat", "-r", &tip, &path]) {
            Ok(data) => data != filectx.data(),
            Err(e) => {
                debug!("{} not readable at {}: {}", filectx.path(), tip, e);
                true
            },
        }
    }
}
