#![allow(dead_code)]
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use vellum_core::{Backend, Repository};
use vellum_git::GitBackend;
use vellum_git::fixtures;

/// Writes `contents` to `path` below `root`, creating parent directories.
pub fn write(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(target, contents).unwrap();
}

/// A repository with a config file, one page and one post in one commit.
pub fn blog_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    fixtures::init_repo(dir.path()).unwrap();
    write(dir.path(), ".gitignore", "build\n");
    write(dir.path(), "config.yaml", "TITLE: Test blog\n");
    write(dir.path(), "content/about.rst", "About\n=====\n\nHello.\n");
    write(
        dir.path(),
        "content/post/first.rst",
        ".. tags: rust\n\nFirst\n=====\n\nBody.\n",
    );
    fixtures::commit_all(dir.path(), "initial").unwrap();
    dir
}

pub fn open(path: &Path) -> Arc<dyn Repository> {
    GitBackend::default().open(path).unwrap()
}
