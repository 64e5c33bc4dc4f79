#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches a `@name=<path>[,<path>...]` header line in the test-specification file.
    pub static ref NAME_TAG: Regex = Regex::new(r"@name\s*=\s*(\S+(?:\s*,\s*\S+)*)").unwrap();

    /// Matches a `@possible_points=<number>` header line in the test-specification file.
    pub static ref POSSIBLE_POINTS_TAG: Regex =
        Regex::new(r"@possible_points\s*=\s*([0-9.]+)").unwrap();

    /// Matches a `@points=<number>` tag inside a test case's docstring.
    pub static ref POINTS_TAG: Regex = Regex::new(r"@points\s*=\s*([0-9.]+)").unwrap();

    /// Matches a `"""..."""` block, across lines.
    pub static ref DOUBLE_QUOTE_BLOCK: Regex = Regex::new(r#"(?s)"{3}.+?"{3}"#).unwrap();

    /// Matches a `'''...'''` block, across lines.
    pub static ref SINGLE_QUOTE_BLOCK: Regex = Regex::new(r"(?s)'{3}.+?'{3}").unwrap();

    /// Matches a `#` comment through the end of its line.
    pub static ref LINE_COMMENT: Regex = Regex::new(r"#.+").unwrap();

    /// Matches a run of blank lines following a newline.
    pub static ref BLANK_RUN: Regex = Regex::new(r"\n[\n\s]+").unwrap();

    /// Word tokenizer used when vectorizing submissions.
    pub static ref WORD_TOKEN: Regex = Regex::new(r"(?u)\b\w+\b").unwrap();
}

/// Tree-sitter query that returns every method of a class
/// * `class-name`: name of the enclosing class
/// * `case-name`: name of the method
/// * `case-def`: the whole method definition
pub const TEST_CASE_QUERY: &str = include_str!("queries/test_cases.scm");

/// Tree-sitter query that returns methods carrying a docstring
/// * `case-name`: name of the method
/// * `case-doc`: the docstring literal, delimiters included
pub const CASE_DOC_QUERY: &str = include_str!("queries/case_docs.scm");

/// Python harness fed to the worker interpreter over stdin
pub const WORKER_HARNESS: &str = include_str!("harness/worker.py");

/// Worker deadline applied when `AUTOGRADE_TIMEOUT_SECS` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
