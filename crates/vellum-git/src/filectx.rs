use vellum_core::FileCtx;

/// A file loaded from a git snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFileCtx {
    pub(crate) path: String,
    pub(crate) data: Vec<u8>,
    pub(crate) date: i64,
    pub(crate) mdate: Option<i64>,
    pub(crate) author: Option<String>,
    /// Hex blob id; unset for untracked working directory files.
    pub(crate) blob: Option<String>,
}

impl FileCtx for GitFileCtx {
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
        self.blob.as_deref()
    }
}
