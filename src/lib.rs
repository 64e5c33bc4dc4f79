//! # autograde
//!
//! An autograder and similarity checker for Python assignments. Evaluates
//! each student's submission against an instructor-authored `unittest` file
//! in an isolated worker process, converts failing cases into itemized point
//! deductions, and writes one grade record per student as line-delimited
//! JSON. A separate path ranks submission pairs by content similarity to
//! surface likely plagiarism.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Runtime configuration sourced from the environment
pub mod config;
/// A module defining constant values and compiled patterns used throughout
pub mod constants;
/// For mapping test outcomes and load failures to point deductions
pub mod deduct;
/// For combining deductions into per-student grade records
pub mod grade;
/// For per-student evaluation contexts and subject loading
pub mod loader;
/// For extracting assignment metadata from the test-specification file
pub mod metadata;
/// For stripping comments from source text prior to comparison
pub mod normalize;
/// Tree-sitter parser wrapper for Python source
pub mod parser;
/// Subprocess plumbing for worker execution
pub mod process;
/// For reading the student roster and manual deductions
pub mod roster;
/// For driving the evaluation worker and collecting case outcomes
pub mod runner;
/// For pairwise submission similarity
pub mod similarity;
/// For the static test-case registration table
pub mod suite;
/// Utility functions for convenience
pub mod util;

/// Defined for convenience
pub type Dict = std::collections::HashMap<String, String>;
