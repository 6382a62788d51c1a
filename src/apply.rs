//! File-level application of rewrite rules.
//!
//! Reads a file, runs each rule as its own pass over the text (re-scanning
//! the previous pass's output, so rules never rewrite text out from under
//! each other's offsets), and persists the result atomically when anything
//! changed.

use crate::rewrite::{apply_rule, RewriteError};
use crate::rules::RewriteRule;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("file is not valid UTF-8: {file}")]
    MalformedInput { file: PathBuf },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Counts for one rule's pass over one file.
#[derive(Debug, Clone, Serialize)]
pub struct RulePass {
    pub rule: &'static str,
    pub rewritten: usize,
    pub skipped: usize,
}

/// Outcome of running all rules against one file.
#[derive(Debug, Serialize)]
#[must_use = "FileReport should be checked for changes and counts"]
pub struct FileReport {
    pub file: PathBuf,
    pub passes: Vec<RulePass>,
    pub changed: bool,
    /// File text before any pass.
    #[serde(skip)]
    pub original: String,
    /// File text after the final pass.
    #[serde(skip)]
    pub patched: String,
}

impl FileReport {
    /// Total sites rewritten across all passes.
    pub fn rewritten(&self) -> usize {
        self.passes.iter().map(|p| p.rewritten).sum()
    }

    /// Total candidate sites skipped for missing captures.
    pub fn skipped(&self) -> usize {
        self.passes.iter().map(|p| p.skipped).sum()
    }
}

/// Run each rule as its own pass over the source text, in order.
pub fn rewrite_source(
    source: &str,
    rules: &[Box<dyn RewriteRule>],
) -> Result<(String, Vec<RulePass>), RewriteError> {
    let mut text = source.to_string();
    let mut passes = Vec::with_capacity(rules.len());

    for rule in rules {
        let result = apply_rule(&text, rule.as_ref())?;
        passes.push(RulePass {
            rule: rule.name(),
            rewritten: result.rewritten,
            skipped: result.skipped,
        });
        text = result.text;
    }

    Ok((text, passes))
}

/// Run all rules against a file without writing anything back.
pub fn check_file(
    path: impl AsRef<Path>,
    rules: &[Box<dyn RewriteRule>],
) -> Result<FileReport, ApplyError> {
    let path = path.as_ref();
    let original = read_source(path)?;
    let (patched, passes) = rewrite_source(&original, rules)?;
    let changed = patched != original;

    Ok(FileReport {
        file: path.to_path_buf(),
        passes,
        changed,
        original,
        patched,
    })
}

/// Run all rules against a file and atomically persist the result.
///
/// An unchanged file is not rewritten, so re-running over already-patched
/// sources is a no-op on disk.
pub fn patch_file(
    path: impl AsRef<Path>,
    rules: &[Box<dyn RewriteRule>],
) -> Result<FileReport, ApplyError> {
    let path = path.as_ref();
    let report = check_file(path, rules)?;

    if report.changed {
        atomic_write(path, report.patched.as_bytes())?;
    }

    Ok(report)
}

fn read_source(path: &Path) -> Result<String, ApplyError> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| ApplyError::MalformedInput {
        file: path.to_path_buf(),
    })
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is left intact.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ApplyError> {
    // Create the tempfile in the same directory to stay on one filesystem
    let parent = path.parent().ok_or_else(|| {
        ApplyError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| ApplyError::Io(e.error))?;

    Ok(())
}
