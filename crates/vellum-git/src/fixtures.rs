//! Repository fixtures for tests.
//!
//! Enabled for this crate's own tests and, through the `test-support`
//! feature, for downstream crates that need real git history.

use std::fs;
use std::path::Path;

use gix::bstr::BString;
use gix::index::State;
use gix::index::entry::{Flags, Mode, Stat};
use gix::index::fs::Metadata;
use gix::objs::{Tree, tree};
use gix::ObjectId;
use vellum_core::{Result, VellumError};

use crate::error::git;
use crate::ignore::IgnoreMatcher;
use crate::repository::point_head_at;

/// Identity used for fixture commits.
pub const FIXTURE_NAME: &str = "Vellum Test";
pub const FIXTURE_EMAIL: &str = "test@vellum.invalid";

/// Initialises an empty repository at `path` with `master` as primary
/// branch and a local committer identity.
pub fn init_repo(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    let repo = gix::init(path).map_err(|e| git(e.to_string()))?;
    point_head_at(repo.path(), "master")?;

    let config = repo.path().join("config");
    let mut text = fs::read_to_string(&config).unwrap_or_default();
    text.push_str(&format!(
        "[user]\n\tname = {}\n\temail = {}\n",
        FIXTURE_NAME, FIXTURE_EMAIL
    ));
    fs::write(config, text)?;
    Ok(())
}

/// Commits the whole work tree, honouring the root `.gitignore`, and
/// returns the new commit id. The index is rewritten to match.
pub fn commit_all(path: &Path, message: &str) -> Result<ObjectId> {
    if message.trim().is_empty() {
        return Err(VellumError::validation("message", "commit message cannot be empty"));
    }

    let repo = gix::open(path).map_err(|e| git(e.to_string()))?;
    let matcher = IgnoreMatcher::for_worktree(path, repo.path());

    let mut index = State::new(repo.object_hash());
    let tree = build_tree(&repo, &matcher, path, path, &mut index)?;
    index.sort_entries();

    let mut index_file = gix::index::File::from_state(index, repo.index_path());
    index_file
        .write(gix::index::write::Options::default())
        .map_err(|e| git(e.to_string()))?;

    let tree_id = repo.write_object(&tree).map_err(|e| git(e.to_string()))?;
    let parents: Vec<ObjectId> = repo.head_id().ok().map(|id| id.detach()).into_iter().collect();
    let commit = repo
        .commit("HEAD", message, tree_id, parents)
        .map_err(|e| git(e.to_string()))?;

    Ok(commit.detach())
}

fn build_tree(
    repo: &gix::Repository,
    matcher: &IgnoreMatcher,
    root: &Path,
    dir: &Path,
    index: &mut State,
) -> Result<Tree> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let rel_path = path
            .strip_prefix(root)
            .map_err(|e| VellumError::internal(e.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        let is_dir = path.is_dir();

        if name == ".git" || matcher.is_ignored(&rel_path, is_dir) {
            continue;
        }

        if is_dir {
            let sub_tree = build_tree(repo, matcher, root, &path, index)?;
            if sub_tree.entries.is_empty() {
                continue;
            }
            let oid = repo.write_object(&sub_tree).map_err(|e| git(e.to_string()))?.detach();
            entries.push(tree::Entry {
                mode: tree::EntryKind::Tree.into(),
                oid,
                filename: BString::from(name),
            });
        } else if path.is_file() {
            let oid = repo
                .write_blob(fs::read(&path)?)
                .map_err(|e| git(e.to_string()))?
                .detach();
            let metadata = Metadata::from_path_no_follow(&path)?;
            let stat = Stat::from_fs(&metadata).map_err(|e| git(e.to_string()))?;
            let full_path = BString::from(rel_path);
            index.dangerously_push_entry(stat, oid, Flags::empty(), Mode::FILE, full_path.as_ref());
            entries.push(tree::Entry {
                mode: tree::EntryKind::Blob.into(),
                oid,
                filename: BString::from(name),
            });
        }
    }

    sort_tree_entries(&mut entries);
    Ok(Tree { entries })
}

/// Git orders directories as if their name ended with a slash.
fn sort_tree_entries(entries: &mut [tree::Entry]) {
    let tree_mode: tree::EntryMode = tree::EntryKind::Tree.into();
    entries.sort_by_key(|e| {
        let mut key = e.filename.to_vec();
        if e.mode == tree_mode {
            key.push(b'/');
        }
        key
    });
}
