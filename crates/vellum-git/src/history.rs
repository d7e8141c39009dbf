//! Commit history of a snapshot and per-path dates.

use gix::bstr::ByteSlice;
use gix::{ObjectId, Repository};
use tracing::debug;
use vellum_core::Result;

use crate::error::git;
use crate::tree::{commit_tree, entry_at};

/// One commit reachable from the snapshot tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: ObjectId,
    pub tree: ObjectId,
    /// Committer time, unix seconds.
    pub time: i64,
    /// `name <email>` of the author.
    pub author: String,
}

/// Dates and author of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHistory {
    pub date: i64,
    pub mdate: Option<i64>,
    pub author: String,
}

/// All commits reachable from `tip`, newest first.
///
/// Commits with equal times keep traversal order, so with merges the first
/// encountered commit wins.
pub fn load(repo: &Repository, tip: ObjectId) -> Result<Vec<CommitInfo>> {
    let walk = repo
        .rev_walk([tip])
        .all()
        .map_err(|e| git(format!("walk from {}: {}", tip, e)))?;

    let mut commits = Vec::new();
    for info in walk {
        let info = info.map_err(|e| git(format!("walk from {}: {}", tip, e)))?;
        let commit = repo
            .find_object(info.id)
            .map_err(|e| git(format!("commit {}: {}", info.id, e)))?
            .try_into_commit()
            .map_err(|e| git(format!("commit {}: {}", info.id, e)))?;

        let time = commit
            .time()
            .map_err(|e| git(format!("commit {}: {}", info.id, e)))?
            .seconds;
        let author = commit
            .author()
            .map(|sig| format!("{} <{}>", sig.name.to_str_lossy(), sig.email.to_str_lossy()))
            .map_err(|e| git(format!("commit {}: {}", info.id, e)))?;

        commits.push(CommitInfo {
            id: info.id,
            tree: commit_tree(repo, info.id)?,
            time,
            author,
        });
    }

    commits.sort_by(|a, b| b.time.cmp(&a.time));
    debug!("Loaded {} commits from {}", commits.len(), tip);
    Ok(commits)
}

/// Computes the history of `path` over `commits` (newest first).
///
/// Returns `None` when no commit contains the path.
pub fn for_path(
    repo: &Repository,
    commits: &[CommitInfo],
    path: &str,
) -> Result<Option<PathHistory>> {
    let mut blobs = Vec::with_capacity(commits.len());
    for commit in commits {
        blobs.push(entry_at(repo, commit.tree, path)?);
    }
    Ok(summarize(commits, &blobs))
}

/// `blobs[i]` is the blob of the path at `commits[i]`.
fn summarize(commits: &[CommitInfo], blobs: &[Option<ObjectId>]) -> Option<PathHistory> {
    let created = blobs.iter().rposition(Option::is_some)?;

    let modified = (0..created).find(|&i| blobs[i].is_some() && blobs[i] != blobs[i + 1]);

    Some(PathHistory {
        date: commits[created].time,
        mdate: modified.map(|i| commits[i].time),
        author: commits[created].author.clone(),
    })
}
