#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Comment stripping for similarity comparison.

use crate::constants::{BLANK_RUN, DOUBLE_QUOTE_BLOCK, LINE_COMMENT, SINGLE_QUOTE_BLOCK};

/// Strips triple-quoted blocks and `#` comments from Python source and
/// collapses runs of blank lines.
///
/// Textual, not syntax-aware: a string literal that happens to contain a
/// comment delimiter is stripped like a comment.
pub fn strip(source: &str) -> String {
    let src = DOUBLE_QUOTE_BLOCK.replace_all(source, " ");
    let src = SINGLE_QUOTE_BLOCK.replace_all(&src, " ");
    let src = LINE_COMMENT.replace_all(&src, " ");
    let src = BLANK_RUN.replace_all(&src, "\n");
    src.into_owned()
}
