//! Template lookup for rendering engines.
//!
//! Templates are read from the snapshot, so a template edited in the
//! repository becomes visible with the next published snapshot.

use std::fmt;
use std::sync::Arc;

use vellum_core::{ChangeCtx, FileCtx, Result, VellumError};

use crate::snapshot::Snapshot;

/// Text of one template plus what is needed to check it for changes.
pub struct TemplateSource {
    name: String,
    changectx: Arc<dyn ChangeCtx>,
    filectx: Arc<dyn FileCtx>,
}

impl TemplateSource {
    /// Name relative to the templates directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository-relative path.
    pub fn path(&self) -> &str {
        self.filectx.path()
    }

    pub fn text(&self) -> Result<&str> {
        self.filectx.content()
    }

    /// False once the repository holds different content for the template.
    pub fn is_up_to_date(&self) -> bool {
        !self.changectx.filectx_needs_reload(self.filectx.as_ref())
    }
}

impl fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSource")
            .field("name", &self.name)
            .field("path", &self.path())
            .finish()
    }
}

/// Directory holding templates, from the site configuration.
pub fn templates_dir(snapshot: &Snapshot) -> &str {
    snapshot
        .config()
        .get_str_or("TEMPLATES_DIR", "templates")
        .trim_matches('/')
}

/// Joins `dir` and a caller-supplied `name`, refusing to leave `dir`.
pub(crate) fn join_checked(dir: &str, name: &str) -> Result<String> {
    let name = name.trim_start_matches('/');
    if name.is_empty() || name.split('/').any(|c| c == ".." || c == ".") {
        return Err(VellumError::file_not_found(format!("{}/{}", dir, name)));
    }
    Ok(format!("{}/{}", dir, name))
}

/// Loads the template `name` from `snapshot`.
pub fn get_source(snapshot: &Snapshot, name: &str) -> Result<TemplateSource> {
    let path = join_checked(templates_dir(snapshot), name)?;
    let changectx = Arc::clone(snapshot.changectx());
    let filectx = changectx.filectx(&path)?;
    Ok(TemplateSource {
        name: name.trim_start_matches('/').to_string(),
        changectx,
        filectx,
    })
}

/// Names of all templates in `snapshot`, sorted.
pub fn list_templates(snapshot: &Snapshot) -> Vec<String> {
    let prefix = format!("{}/", templates_dir(snapshot));
    snapshot
        .changectx()
        .files()
        .iter()
        .filter_map(|path| path.strip_prefix(&prefix))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_checked() {
        assert_eq!(join_checked("templates", "base.html").unwrap(), "templates/base.html");
        assert_eq!(
            join_checked("templates", "/partials/nav.html").unwrap(),
            "templates/partials/nav.html"
        );
        assert!(join_checked("templates", "../config.yaml").is_err());
        assert!(join_checked("templates", "a/./b").is_err());
        assert!(join_checked("templates", "").is_err());
    }
}
