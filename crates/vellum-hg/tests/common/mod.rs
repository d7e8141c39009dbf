#![allow(dead_code)]
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vellum_hg::Hg;

pub const AUTHOR: &str = "Vellum Test <test@vellum.invalid>";

pub fn write(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(target, contents).unwrap();
}

/// Records every change of the working directory as one commit.
pub fn commit(root: &Path, message: &str) {
    Hg::locate(root)
        .unwrap()
        .run(&["commit", "-A", "-m", message, "-u", AUTHOR])
        .unwrap();
}

/// A repository with a config file, one page and one post in one commit.
pub fn blog_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    Hg::locate(dir.path()).unwrap().run(&["init"]).unwrap();
    write(dir.path(), ".hgignore", "^build/\n");
    write(dir.path(), "config.yaml", "TITLE: Test blog\n");
    write(dir.path(), "content/about.rst", "About\n=====\n\nHello.\n");
    write(dir.path(), "content/post/first.rst", ".. tags: hg\n\nFirst\n=====\n");
    commit(dir.path(), "initial");
    dir
}
