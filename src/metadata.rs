#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Assignment metadata extracted from the header comments of the
//! test-specification file, e.g.:
//!
//! ```text
//! @name=asg0/asg0.py
//! @possible_points=20
//! ```

use thiserror::Error;

use crate::constants::{NAME_TAG, POSSIBLE_POINTS_TAG};

/// Errors raised while extracting assignment metadata. All of these are
/// fatal: no student is processed until the specification parses cleanly.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// No `@name=` header was found.
    #[error("test specification is missing a @name=<path>[,<path>...] header")]
    MissingName,

    /// No `@possible_points=` header was found.
    #[error("test specification is missing a @possible_points=<number> header")]
    MissingPossiblePoints,

    /// The `@possible_points=` value did not parse as a number.
    #[error("cannot parse @possible_points value `{value}`")]
    MalformedPoints {
        /// The offending header value.
        value: String,
    },

    /// Two `@name=` headers disagree. Last-wins resolution would silently
    /// grade the wrong files, so disagreement is an authoring error.
    #[error("conflicting @name headers: `{first}` then `{second}`")]
    ConflictingName {
        /// The value seen first.
        first:  String,
        /// The later, disagreeing value.
        second: String,
    },

    /// Two `@possible_points=` headers disagree.
    #[error("conflicting @possible_points headers: {first} then {second}")]
    ConflictingPoints {
        /// The value seen first.
        first:  f64,
        /// The later, disagreeing value.
        second: f64,
    },
}

/// Fully validated assignment metadata. Parsed once per run, immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct AssignmentMetadata {
    /// Relative paths of the files under test, in declaration order.
    pub files_to_test:   Vec<String>,
    /// Maximum number of points for the assignment.
    pub possible_points: f64,
}

/// Accumulates header fields while scanning the specification text line by
/// line. Fields stay unset until their tag is seen.
#[derive(Debug, Default)]
pub struct MetadataScan {
    /// Files named by `@name=`, if seen.
    files_to_test:   Option<Vec<String>>,
    /// Point total named by `@possible_points=`, if seen.
    possible_points: Option<f64>,
}

impl MetadataScan {
    /// Applies one line of the specification to the scan. A repeated header
    /// carrying an identical value is accepted; a disagreeing repeat is an
    /// error.
    pub fn parse_line(&mut self, line: &str) -> Result<(), MetadataError> {
        if let Some(captures) = NAME_TAG.captures(line) {
            let files: Vec<String> = captures[1]
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();

            match self.files_to_test.as_ref() {
                Some(existing) if *existing != files => {
                    return Err(MetadataError::ConflictingName {
                        first:  existing.join(","),
                        second: files.join(","),
                    });
                }
                _ => self.files_to_test = Some(files),
            }
        }

        if let Some(captures) = POSSIBLE_POINTS_TAG.captures(line) {
            let raw = &captures[1];
            let points = raw
                .parse::<f64>()
                .map_err(|_| MetadataError::MalformedPoints {
                    value: raw.to_string(),
                })?;

            match self.possible_points {
                Some(existing) if existing != points => {
                    return Err(MetadataError::ConflictingPoints {
                        first:  existing,
                        second: points,
                    });
                }
                _ => self.possible_points = Some(points),
            }
        }

        Ok(())
    }

    /// Finishes the scan, requiring both headers to have been seen.
    pub fn finish(self) -> Result<AssignmentMetadata, MetadataError> {
        let files_to_test = self.files_to_test.ok_or(MetadataError::MissingName)?;
        if files_to_test.is_empty() {
            return Err(MetadataError::MissingName);
        }
        let possible_points = self
            .possible_points
            .ok_or(MetadataError::MissingPossiblePoints)?;

        Ok(AssignmentMetadata {
            files_to_test,
            possible_points,
        })
    }
}

/// Extracts assignment metadata from the whole specification text.
pub fn read_assignment_metadata(text: &str) -> Result<AssignmentMetadata, MetadataError> {
    let mut scan = MetadataScan::default();
    for line in text.lines() {
        scan.parse_line(line)?;
    }
    scan.finish()
}
