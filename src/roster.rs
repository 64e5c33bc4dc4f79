#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The student roster, the mapping of students to submission directories,
//! and manual extra deductions.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::deduct::Deduction;

/// Errors raised while reading the student roster. Fatal: the run aborts
/// before any student is processed.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The roster file has no header row.
    #[error("students file {path} is empty")]
    Empty {
        /// Path of the roster file.
        path: String,
    },

    /// A required column is absent from the header row.
    #[error("students file {path} is missing required column `{column}`")]
    MissingColumn {
        /// Path of the roster file.
        path:   String,
        /// The missing column name.
        column: String,
    },

    /// Two rows share an identifier.
    #[error("duplicate student identifier `{id}`")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },
}

/// One student. `id` and `repo` are required roster columns; any further
/// columns are carried through to the grade record untouched.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    /// Unique identifier within a run.
    pub id:    String,
    /// Locator of the student's source repository; its base name is the
    /// submission directory under the work directory.
    pub repo:  String,
    /// Remaining roster columns.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Student {
    /// Returns the path to the local copy of this student's repository.
    pub fn local_repo(&self, workdir: &Path) -> PathBuf {
        let base = self
            .repo
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(self.repo.as_str());
        workdir.join(base)
    }
}

/// Reads a tab-separated file of students. The header row must contain `id`
/// and `repo` columns; rows with an empty `repo` are kept but flagged,
/// mirroring how provisioning treats them.
pub fn read_students(path: &Path) -> Result<Vec<Student>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read students file {}", path.display()))?;

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| RosterError::Empty {
            path: path.display().to_string(),
        })?
        .split('\t')
        .map(str::trim)
        .collect();

    for required in ["id", "repo"] {
        if !header.contains(&required) {
            return Err(RosterError::MissingColumn {
                path:   path.display().to_string(),
                column: required.to_string(),
            }
            .into());
        }
    }

    let mut students = Vec::new();
    let mut seen = HashSet::new();

    for line in lines {
        let cells: Vec<&str> = line.split('\t').map(str::trim).collect();

        let mut id = String::new();
        let mut repo = String::new();
        let mut extra = BTreeMap::new();

        for (index, column) in header.iter().enumerate() {
            let value = cells.get(index).copied().unwrap_or_default();
            match *column {
                "id" => id = value.to_string(),
                "repo" => repo = value.to_string(),
                _ => {
                    extra.insert(column.to_string(), value.to_string());
                }
            }
        }

        if repo.is_empty() {
            warn!("missing repo for {id}");
        }
        if !seen.insert(id.clone()) {
            return Err(RosterError::DuplicateId { id }.into());
        }

        students.push(Student { id, repo, extra });
    }

    Ok(students)
}

/// Reads a file containing additional deductions for a student, e.g. for
/// late points, or when a small fix by the grader was needed to run the
/// rest of the tests. Format: `id \t points \t reason`, one per line.
/// Identifiers that never appear in the roster are tolerated.
pub fn read_extra_deductions(path: &Path) -> Result<HashMap<String, Vec<Deduction>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read extra deductions file {}", path.display()))?;

    let mut extras: HashMap<String, Vec<Deduction>> = HashMap::new();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, '\t');
        let id = parts.next().unwrap_or_default().trim();
        let points = parts
            .next()
            .unwrap_or_default()
            .trim()
            .parse::<f64>()
            .with_context(|| {
                format!(
                    "Malformed points value on line {} of {}",
                    number + 1,
                    path.display()
                )
            })?;
        let reason = parts.next().unwrap_or_default();

        extras
            .entry(id.to_string())
            .or_default()
            .push(Deduction::manual(points, reason));
    }

    Ok(extras)
}
