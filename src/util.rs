#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use which::which;

use crate::config;

/// Finds and returns the path to the Python interpreter.
///
/// Honors the `AUTOGRADE_PYTHON` override, then falls back to `python3` and
/// `python` on the PATH.
pub fn python_path() -> Result<OsString> {
    if let Some(overridden) = config::get().python.as_ref() {
        return Ok(overridden.clone().into_os_string());
    }

    which("python3")
        .or_else(|_| which("python"))
        .map(PathBuf::into_os_string)
        .context("Cannot find a Python interpreter on path (python3)")
}

/// Returns the logical unit name for a source file: the base name with
/// everything after the first `.` removed.
///
/// `foo/bar/baz.py` becomes `baz`; `archive.tar.gz` becomes `archive`.
pub fn unit_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match base.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => base,
    }
}

/// Returns the first non-empty line of a block of text, trimmed.
pub fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}
