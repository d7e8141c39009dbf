#![allow(dead_code)]
use std::sync::Arc;

use vellum_core::{ChangeCtx, ConfigMap, FileCtx, Result, Revision, RevisionId, VellumError};

/// Helper to create a ConfigMap from a YAML string slice.
/// Panics if the YAML is invalid (intended for tests).
pub fn config_from_yaml(yaml: &str) -> ConfigMap {
    ConfigMap::from_yaml(yaml).expect("Failed to create test config from YAML")
}

/// A file held in memory with fixed history values.
#[derive(Debug, Clone)]
pub struct MemFile {
    pub path: String,
    pub data: Vec<u8>,
    pub date: i64,
    pub mdate: Option<i64>,
    pub author: Option<String>,
}

impl FileCtx for MemFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn date(&self) -> i64 {
        self.date
    }

    fn mdate(&self) -> Option<i64> {
        self.mdate
    }

    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    fn content_id(&self) -> Option<&str> {
        None
    }
}

/// A snapshot held in memory; files are kept sorted by path.
#[derive(Debug)]
pub struct MemCtx {
    pub revision: Revision,
    pub id: RevisionId,
    pub paths: Vec<String>,
    pub files: Vec<MemFile>,
}

impl MemCtx {
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            id: RevisionId::new("mem-1"),
            paths: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Adds a file dated `date` with the given text.
    pub fn with_file(mut self, path: &str, date: i64, text: &str) -> Self {
        self.files.push(MemFile {
            path: path.to_string(),
            data: text.as_bytes().to_vec(),
            date,
            mdate: None,
            author: Some("Tester <tester@example.com>".to_string()),
        });
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.paths = self.files.iter().map(|f| f.path.clone()).collect();
        self
    }

    /// Adds raw bytes, e.g. invalid UTF-8.
    pub fn with_bytes(mut self, path: &str, data: &[u8]) -> Self {
        self.files.push(MemFile {
            path: path.to_string(),
            data: data.to_vec(),
            date: 0,
            mdate: None,
            author: None,
        });
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.paths = self.files.iter().map(|f| f.path.clone()).collect();
        self
    }
}

impl ChangeCtx for MemCtx {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn revision_id(&self) -> &RevisionId {
        &self.id
    }

    fn files(&self) -> &[String] {
        &self.paths
    }

    fn filectx(&self, path: &str) -> Result<Arc<dyn FileCtx>> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| Arc::new(f.clone()) as Arc<dyn FileCtx>)
            .ok_or_else(|| VellumError::file_not_found(path))
    }

    fn needs_reload(&self) -> bool {
        self.revision.is_working_dir()
    }

    fn filectx_needs_reload(&self, _filectx: &dyn FileCtx) -> bool {
        self.revision.is_working_dir()
    }
}

/// A post body with the given date and tags.
pub fn post(date: i64, tags: &str) -> String {
    format!(".. title: Post {}\n.. date: {}\n.. tags: {}\n\nBody.\n", date, date, tags)
}
