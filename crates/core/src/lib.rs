//! OverpassQL comment and whitespace stripping library (with WASM bindings).
//!
//! This crate canonicalizes OverpassQL source text in two independent ways: collapsing redundant
//! whitespace while leaving comments byte-for-byte intact, or removing comments except those
//! marked with `@preserve`.
//!
//! Entry points:
//!
//! - [`strip`] contains the core Rust APIs ([`strip_whitespace`], [`strip_comments`] and the
//!   combined [`strip::strip`] pipeline) plus [`StripConfig`].
//! - [`locate`] exposes the comment scanner both transforms are built on.
//!
//! Internals:
//!
//! - [`edit`] holds the byte-range edit model used to rebuild the output.
//! - [`utf16`] provides UTF-16 length and offset support for JavaScript consumers.
//!
//! Comment detection works on raw text only: a `//` or `/*` inside an OverpassQL string literal
//! is treated as a comment, the same way the loader this crate serves always has.

pub mod edit;
pub mod locate;
pub mod strip;
pub mod utf16;

pub use locate::{CommentKind, CommentSpan};
pub use strip::{
    LengthUnit, MAX_CONTENT_SIZE, StripConfig, StripOptions, strip_comments, strip_whitespace,
};

/// Errors that can occur during stripping.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StripError {
    #[error("content is too big, length of {length} is larger than limit of {limit}")]
    SizeLimitExceeded { length: usize, limit: usize },

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("overlapping edits: [{a_start},{a_end}) overlaps [{b_start},{b_end})")]
    OverlappingEdits {
        a_start: usize,
        a_end: usize,
        b_start: usize,
        b_end: usize,
    },
}
