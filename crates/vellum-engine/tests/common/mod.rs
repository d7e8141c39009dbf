#![allow(dead_code)]
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vellum_core::Revision;
use vellum_core::template::write_starter_tree;
use vellum_engine::{Engine, EngineSettings};
use vellum_git::fixtures;

/// Writes `contents` to `path` below `root`, creating parent directories.
pub fn write(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(target, contents).unwrap();
}

pub fn commit(root: &Path, message: &str) {
    fixtures::commit_all(root, message).unwrap();
}

/// A git repository holding the starter tree in one commit.
pub fn starter_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    fixtures::init_repo(dir.path()).unwrap();
    write_starter_tree(dir.path(), (".gitignore", "build\n")).unwrap();
    commit(dir.path(), "initial");
    dir
}

pub fn settings(root: &Path) -> EngineSettings {
    EngineSettings::builder().repo_path(root).build().unwrap()
}

pub fn engine(root: &Path) -> Engine {
    Engine::new(settings(root))
}

pub fn working_dir_engine(root: &Path) -> Engine {
    let settings = EngineSettings::builder()
        .repo_path(root)
        .revision(Revision::WorkingDir)
        .build()
        .unwrap();
    Engine::new(settings)
}
