//! Running the `hg` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};
use vellum_core::{Result, VellumError};

use crate::error::hg;

/// An `hg` executable bound to a repository root.
#[derive(Debug, Clone)]
pub struct Hg {
    binary: PathBuf,
    root: PathBuf,
}

impl Hg {
    /// Locates `hg` on `PATH`.
    pub fn locate(root: impl Into<PathBuf>) -> Result<Self> {
        let binary = which::which("hg").map_err(|e| hg(format!("hg executable not found: {}", e)))?;
        Ok(Self {
            binary,
            root: root.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs `hg <args>` in the repository root and returns stdout.
    pub fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(VellumError::command(
                format!("hg {}", args.join(" ")),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }
        Ok(output.stdout)
    }

    /// Like [`Hg::run`], decoding stdout as UTF-8 text.
    pub fn run_text(&self, args: &[&str]) -> Result<String> {
        let stdout = self.run(args)?;
        String::from_utf8(stdout).map_err(|e| {
            VellumError::parse_error_with_cause(format!("hg {}", args.join(" ")), "invalid UTF-8", e)
        })
    }

    /// Like [`Hg::run_text`], but an exit status of 1 means "no match" and
    /// yields empty output.
    pub fn run_text_allow_empty(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            code => Err(VellumError::command(
                format!("hg {}", args.join(" ")),
                code.unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim(),
            )),
        }
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output> {
        trace!("hg {} (in {})", args.join(" "), self.root.display());
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.root)
            .env("HGPLAIN", "1")
            .output()?;
        if !output.status.success() {
            debug!("hg {} exited with {}", args.join(" "), output.status);
        }
        Ok(output)
    }
}

/// Quotes a value for use inside a revset string literal.
pub fn revset_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revset_quote() {
        assert_eq!(revset_quote("path:content/a.rst"), "'path:content/a.rst'");
        assert_eq!(revset_quote("it's"), "'it\\'s'");
        assert_eq!(revset_quote("a\\b"), "'a\\\\b'");
    }

    #[test]
    #[ignore = "requires hg"]
    fn test_run_reports_failures() {
        let dir = tempfile::TempDir::new().unwrap();
        let hg = Hg::locate(dir.path()).unwrap();

        let err = hg.run(&["log", "-r", "default"]).unwrap_err();
        assert!(matches!(err, VellumError::Command { .. }));
    }
}
