#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The test-specification artifact: assignment metadata plus a static
//! registration table of test cases.
//!
//! Point values are declared in each case's docstring (`@points=4`). The
//! table is built once, when the suite file is read, by inspecting the
//! source with tree-sitter; nothing about point values is discovered at
//! run time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::{
    constants::{CASE_DOC_QUERY, POINTS_TAG, TEST_CASE_QUERY},
    metadata::{AssignmentMetadata, read_assignment_metadata},
    parser::Parser,
};

/// One registered test case.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Name of the class the case is defined in.
    pub class_name: String,
    /// Method name, as `unittest` reports it.
    pub name:       String,
    /// Cleaned docstring text, if the case has one.
    pub doc:        Option<String>,
    /// Point value declared via `@points=` in the docstring.
    pub points:     Option<f64>,
    /// Full source text of the method definition, kept so graders can see
    /// what a failing case was checking.
    pub source:     String,
}

/// The parsed suite: metadata and the ordered case table. Immutable for the
/// rest of the run.
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Path of the test-specification file.
    path:     PathBuf,
    /// Assignment metadata from the header comments.
    metadata: AssignmentMetadata,
    /// Registered cases, in source order.
    cases:    Vec<TestCase>,
}

/// Strips string prefixes and quote delimiters from a docstring literal and
/// trims the result.
fn clean_docstring(literal: &str) -> String {
    let trimmed = literal.trim();
    let body = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic());

    let body = if let Some(inner) = body
        .strip_prefix(r#"""""#)
        .and_then(|s| s.strip_suffix(r#"""""#))
    {
        inner
    } else if let Some(inner) = body.strip_prefix("'''").and_then(|s| s.strip_suffix("'''")) {
        inner
    } else if let Some(inner) = body.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        inner
    } else if let Some(inner) = body.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        inner
    } else {
        body
    };

    body.trim().to_string()
}

impl TestSuite {
    /// Reads and inspects a test-specification file, building the metadata
    /// and the case registration table in one pass.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read test specification {}", path.display()))?;

        let metadata = read_assignment_metadata(&text)
            .with_context(|| format!("Invalid test specification {}", path.display()))?;

        let cases = Self::register_cases(&text)?;

        Ok(Self {
            path,
            metadata,
            cases,
        })
    }

    /// Inspects the suite source and registers every `test*` method of every
    /// class, binding each to its docstring and declared point value.
    fn register_cases(text: &str) -> Result<Vec<TestCase>> {
        let parser = Parser::new(text.to_string())?;

        let mut docs = std::collections::HashMap::new();
        for m in parser.query(CASE_DOC_QUERY)? {
            if let (Some(name), Some(doc)) = (m.get("case-name"), m.get("case-doc")) {
                docs.insert(name.clone(), doc.clone());
            }
        }

        let mut cases = Vec::new();
        for m in parser.query(TEST_CASE_QUERY)? {
            let name = match m.get("case-name") {
                Some(name) if name.starts_with("test") => name.clone(),
                _ => continue,
            };
            let class_name = m.get("class-name").cloned().unwrap_or_default();
            let source = m.get("case-def").cloned().unwrap_or_default();

            let raw_doc = docs.get(&name);
            let points = raw_doc
                .and_then(|doc| POINTS_TAG.captures(doc))
                .and_then(|captures| captures[1].parse::<f64>().ok());
            let doc = raw_doc.map(|doc| clean_docstring(doc)).filter(|doc| !doc.is_empty());

            cases.push(TestCase {
                class_name,
                name,
                doc,
                points,
                source,
            });
        }

        Ok(cases)
    }

    /// Path of the suite file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The assignment metadata.
    pub fn metadata(&self) -> &AssignmentMetadata {
        &self.metadata
    }

    /// The registered cases, in source order.
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Looks up a registered case by method name.
    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Rejects the suite if any registered case lacks a declared point
    /// value. Used by the strict point policy, before any student is graded.
    pub fn require_declared_points(&self) -> Result<()> {
        let undeclared: Vec<&str> = self
            .cases
            .iter()
            .filter(|case| case.points.is_none())
            .map(|case| case.name.as_str())
            .collect();

        if !undeclared.is_empty() {
            bail!(
                "test specification {} declares no @points for: {}",
                self.path.display(),
                undeclared.join(", ")
            );
        }

        Ok(())
    }
}
