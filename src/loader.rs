#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Per-student evaluation contexts.
//!
//! Subject code never runs inside this process. Each student gets a fresh
//! worker interpreter whose namespace dies with it, so the context carries
//! no loader state beyond the paths the worker needs: creating a context,
//! running its worker, and dropping it brackets exactly one student's
//! evaluation, and no two workers exist at once.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{roster::Student, suite::TestSuite, util::unit_name};

/// A subject file could not be loaded. Recovered per student: the student
/// receives a zero-credit grade record and the run continues.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The subject file does not exist under the student's submission root.
    #[error("cannot import {subject}: {path} does not exist")]
    Missing {
        /// Relative path of the subject, as declared by `@name=`.
        subject: String,
        /// The absolute path that was probed.
        path:    PathBuf,
    },
}

impl LoadError {
    /// The `@name=` subpath the error refers to.
    pub fn subject(&self) -> &str {
        match self {
            LoadError::Missing { subject, .. } => subject,
        }
    }
}

/// The scoped loader state for one student's evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Identifier of the student under evaluation.
    student_id: String,
    /// Root of the student's submission tree.
    root:       PathBuf,
    /// Subject subpaths relative to `root`, in declaration order.
    subjects:   Vec<String>,
    /// Absolute path of the test-specification file.
    test_path:  PathBuf,
}

impl EvaluationContext {
    /// Creates the context for one student, resolving their submission root
    /// through the work directory.
    pub fn new(student: &Student, workdir: &Path, suite: &TestSuite) -> Self {
        Self {
            student_id: student.id.clone(),
            root:       student.local_repo(workdir),
            subjects:   suite.metadata().files_to_test.clone(),
            test_path:  suite.path().to_path_buf(),
        }
    }

    /// Identifier of the student under evaluation.
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Root of the student's submission tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Logical unit names of the subjects, derived from their base names.
    pub fn unit_names(&self) -> Vec<String> {
        self.subjects
            .iter()
            .map(|subject| unit_name(Path::new(subject)))
            .collect()
    }

    /// Checks that every subject file exists before a worker is spawned.
    /// A missing file is the cheapest load failure there is; no interpreter
    /// is started for it.
    pub fn probe(&self) -> Result<(), LoadError> {
        for subject in &self.subjects {
            let path = self.root.join(subject);
            if !path.is_file() {
                return Err(LoadError::Missing {
                    subject: subject.clone(),
                    path,
                });
            }
        }
        Ok(())
    }

    /// Arguments for the worker interpreter: read the harness from stdin
    /// with bytecode caching off, then the submission root, the test file,
    /// and the subjects. The submission tree stays read-only.
    pub fn worker_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-B".into(), "-".into()];
        args.push(self.root.as_os_str().to_os_string());
        args.push(self.test_path.as_os_str().to_os_string());
        for subject in &self.subjects {
            args.push(subject.into());
        }
        args
    }
}
