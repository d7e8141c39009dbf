//! Tree and blob lookups.

use std::collections::BTreeMap;

use gix::bstr::ByteSlice;
use gix::objs::tree::EntryKind;
use gix::{ObjectId, Repository};
use vellum_core::Result;

use crate::error::git;

/// Resolves `path` inside the tree `tree_id` to a blob id.
///
/// Returns `None` when any component is missing or the path names a tree.
pub fn entry_at(repo: &Repository, tree_id: ObjectId, path: &str) -> Result<Option<ObjectId>> {
    let mut current = tree_id;
    let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();

    while let Some(component) = components.next() {
        let tree = repo
            .find_object(current)
            .map_err(|e| git(format!("tree {}: {}", current, e)))?
            .try_into_tree()
            .map_err(|e| git(format!("tree {}: {}", current, e)))?;
        let decoded = tree
            .decode()
            .map_err(|e| git(format!("tree {}: {}", current, e)))?;

        let Some(entry) = decoded
            .entries
            .iter()
            .find(|e| e.filename.as_bytes() == component.as_bytes())
        else {
            return Ok(None);
        };

        let last = components.peek().is_none();
        match (last, entry.mode.is_tree()) {
            (true, false) => return Ok(Some(entry.oid.to_owned())),
            (false, true) => current = entry.oid.to_owned(),
            _ => return Ok(None),
        }
    }

    Ok(None)
}

/// Collects every blob below `tree_id`, keyed by slash-separated path.
pub fn collect_files(repo: &Repository, tree_id: ObjectId) -> Result<BTreeMap<String, ObjectId>> {
    let mut files = BTreeMap::new();
    collect_into(repo, tree_id, "", &mut files)?;
    Ok(files)
}

fn collect_into(
    repo: &Repository,
    tree_id: ObjectId,
    prefix: &str,
    files: &mut BTreeMap<String, ObjectId>,
) -> Result<()> {
    let tree = repo
        .find_object(tree_id)
        .map_err(|e| git(format!("tree {}: {}", tree_id, e)))?
        .try_into_tree()
        .map_err(|e| git(format!("tree {}: {}", tree_id, e)))?;
    let decoded = tree
        .decode()
        .map_err(|e| git(format!("tree {}: {}", tree_id, e)))?;

    for entry in &decoded.entries {
        let name = entry.filename.to_str_lossy();
        let path = if prefix.is_empty() {
            name.into_owned()
        } else {
            format!("{}/{}", prefix, name)
        };

        if entry.mode.is_tree() {
            collect_into(repo, entry.oid.to_owned(), &path, files)?;
        } else if matches!(entry.mode.kind(), EntryKind::Blob | EntryKind::BlobExecutable) {
            files.insert(path, entry.oid.to_owned());
        }
        // submodules and symlinks are not content
    }

    Ok(())
}

/// Reads the bytes of a blob.
pub fn blob_data(repo: &Repository, id: ObjectId) -> Result<Vec<u8>> {
    let object = repo
        .find_object(id)
        .map_err(|e| git(format!("blob {}: {}", id, e)))?;
    Ok(object.detach().data)
}

/// Tree id of a commit.
pub fn commit_tree(repo: &Repository, commit_id: ObjectId) -> Result<ObjectId> {
    let commit = repo
        .find_object(commit_id)
        .map_err(|e| git(format!("commit {}: {}", commit_id, e)))?
        .try_into_commit()
        .map_err(|e| git(format!("commit {}: {}", commit_id, e)))?;
    commit
        .tree_id()
        .map(|id| id.detach())
        .map_err(|e| git(format!("commit {}: {}", commit_id, e)))
}
