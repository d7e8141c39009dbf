//! Starter tree written by `create_repo`.
//!
//! The file list is fixed and embedded at compile time, so every backend
//! produces byte-identical repositories.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, VellumError};

/// A file of the starter tree.
#[derive(Debug, Clone, Copy)]
pub struct StarterFile {
    /// Repository-relative path, forward-slash separated.
    pub path: &'static str,
    /// File contents.
    pub contents: &'static [u8],
}

macro_rules! starter_file {
    ($path:literal) => {
        StarterFile {
            path: $path,
            contents: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/template/", $path)),
        }
    };
}

/// The starter tree, sorted by path.
pub const STARTER_FILES: &[StarterFile] = &[
    starter_file!("config.yaml"),
    starter_file!("content/about.rst"),
    starter_file!("content/attachments/vellum.png"),
    starter_file!("content/post/example-post.rst"),
    starter_file!("content/post/lorem-ipsum.rst"),
    starter_file!("static/screen.css"),
    starter_file!("templates/base.html"),
    starter_file!("templates/post_list.html"),
    starter_file!("templates/posts.html"),
];

/// Fixed name of the site configuration file.
pub const CONFIG_FILE: &str = "config.yaml";

/// Top-level entries of the starter tree.
pub fn root_entries() -> Vec<&'static str> {
    let mut roots: Vec<&'static str> = STARTER_FILES
        .iter()
        .map(|f| f.path.split('/').next().unwrap_or(f.path))
        .collect();
    roots.dedup();
    roots
}

/// Fails with `AlreadyInitialized` if `path` holds `marker` or any
/// top-level entry of the starter tree.
pub fn ensure_uninitialized(path: &Path, marker: &str) -> Result<()> {
    if path.join(marker).exists() {
        debug!("{} already present in {}", marker, path.display());
        return Err(VellumError::already_initialized(path));
    }
    for name in root_entries() {
        if path.join(name).exists() {
            debug!("{} already present in {}", name, path.display());
            return Err(VellumError::already_initialized(path));
        }
    }
    Ok(())
}

/// Writes the starter tree and the ignore file into `path`.
///
/// The caller checks [`ensure_uninitialized`] first.
pub fn write_starter_tree(path: &Path, ignore_file: (&str, &str)) -> Result<()> {
    fs::create_dir_all(path)?;
    for file in STARTER_FILES {
        let target = path.join(file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, file.contents)?;
    }
    let (name, contents) = ignore_file;
    fs::write(path.join(name), contents)?;
    Ok(())
}
