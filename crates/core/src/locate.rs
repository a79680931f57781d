//! Comment scanning.
//!
//! This module finds every comment in a piece of OverpassQL source and reports it as a
//! [`CommentSpan`]. Both transforms in [`crate::strip`] run the scanner fresh on each call.
//!
//! Comment shapes:
//!
//! - Line comment: `//` up to (not including) the next line terminator (`\n`, `\r`, U+2028 or
//!   U+2029).
//! - Block comment: `/*` up to and including the nearest following `*/`. A `/*` without a
//!   closing `*/` is not a comment and is left alone as ordinary text.
//!
//! Every span also owns the run of spaces/tabs directly in front of its opener and the run of
//! `\r`/`\n` bytes directly after it. Those bytes travel with the comment, so removing a comment
//! removes its indentation and its line break, and keeping a comment keeps both verbatim.
//!
//! The scanner is a single left-to-right pass. When a search for `*/` fails, no later `/*` can
//! close either, so the failure position is remembered and the whole scan stays linear in the
//! input length.

use tracing::{debug, instrument};

use crate::{
    StripError,
    strip::{StripConfig, check_size},
};

/// Marker that keeps a comment alive through [`crate::strip_comments`].
pub const PRESERVE_MARKER: &str = "@preserve";

/// Which delimiter opened a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...` up to the end of the line.
    Line,
    /// `/* ... */`.
    Block,
}

/// A comment found in the input, including the whitespace that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan<'a> {
    /// Start byte offset (inclusive), at the first leading space/tab if any.
    pub start: usize,
    /// End byte offset (exclusive), after any trailing `\r`/`\n` run.
    pub end: usize,
    pub kind: CommentKind,
    /// Exactly `source[start..end]`.
    pub text: &'a str,
    /// True iff `text` contains [`PRESERVE_MARKER`].
    pub preserved: bool,
}

impl CommentSpan<'_> {
    /// Returns true if the span's last byte is a line break.
    pub fn ends_with_line_break(&self) -> bool {
        matches!(self.text.as_bytes().last(), Some(b'\n' | b'\r'))
    }
}

/// Locate every comment in `source`, enforcing the content-size guard first.
#[instrument(skip_all, fields(len = source.len()))]
pub fn locate_comments<'a>(
    source: &'a str,
    config: &StripConfig,
) -> Result<Vec<CommentSpan<'a>>, StripError> {
    check_size(source, config)?;
    let spans = scan_comments(source);
    debug!(count = spans.len(), "located comments");
    Ok(spans)
}

/// Scan `source` for comments without any size check.
///
/// Returned spans are non-empty, non-overlapping and in ascending order.
pub(crate) fn scan_comments(source: &str) -> Vec<CommentSpan<'_>> {
    let bytes = source.as_bytes();
    let len = bytes.len();

    let mut spans = Vec::new();
    let mut i = 0usize;
    // Start of the current run of spaces/tabs, if the previous byte was one.
    let mut indent_start: Option<usize> = None;
    // Any `*/` search starting at or after this offset is known to fail.
    let mut unclosed_from = usize::MAX;

    while i < len {
        let b = bytes[i];
        if b == b' ' || b == b'\t' {
            indent_start.get_or_insert(i);
            i += 1;
            continue;
        }

        let found = match (b, bytes.get(i + 1)) {
            (b'/', Some(b'*')) => find_block_close(source, i + 2, &mut unclosed_from)
                .map(|close| (close, CommentKind::Block)),
            (b'/', Some(b'/')) => Some((find_line_end(source, i + 2), CommentKind::Line)),
            _ => None,
        };

        match found {
            Some((body_end, kind)) => {
                let start = indent_start.take().unwrap_or(i);
                let end = skip_line_breaks(bytes, body_end);
                let text = &source[start..end];
                spans.push(CommentSpan {
                    start,
                    end,
                    kind,
                    text,
                    preserved: text.contains(PRESERVE_MARKER),
                });
                i = end;
            }
            None => {
                indent_start = None;
                i += 1;
            }
        }
    }

    spans
}

/// Returns the offset just past the nearest `*/` at or after `from`.
fn find_block_close(source: &str, from: usize, unclosed_from: &mut usize) -> Option<usize> {
    if from >= *unclosed_from {
        return None;
    }
    match source.get(from..).and_then(|rest| rest.find("*/")) {
        Some(rel) => Some(from + rel + 2),
        None => {
            *unclosed_from = from;
            None
        }
    }
}

/// Returns the offset of the first line terminator at or after `from`, or the input length.
fn find_line_end(source: &str, from: usize) -> usize {
    source[from..]
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .map_or(source.len(), |rel| from + rel)
}

fn skip_line_breaks(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b'\n' | b'\r')) {
        pos += 1;
    }
    pos
}
