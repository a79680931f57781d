//! Edit model.
//!
//! This module defines [`Edit`], a byte-range replacement over the original source. Both
//! transforms describe their result as a list of edits instead of rewriting the string in place:
//! comment spans are never touched by an edit, so their bytes are copied to the output verbatim
//! by construction, and no placeholder text ever has to round-trip through the whitespace pass.
//!
//! Invariants:
//!
//! - `edits` must be sorted by ascending `start` and must not overlap ([`validate_edits`]).
//! - Edit boundaries fall on UTF-8 character boundaries of the input.

use crate::StripError;

/// A replacement of `source[start..end]` with `replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive) in the input.
    pub start: usize,
    /// End byte offset (exclusive) in the input.
    pub end: usize,
    /// Replacement text inserted into the output.
    pub replacement: &'static str,
}

impl Edit {
    /// An edit that deletes `start..end`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            replacement: "",
        }
    }

    /// Net change in length this edit causes, in bytes.
    fn delta(&self) -> isize {
        self.replacement.len() as isize - (self.end - self.start) as isize
    }
}

/// Check that `edits` are well-formed for an input of `input_len` bytes.
///
/// Requirements:
///
/// - `start <= end <= input_len` for each edit.
/// - Edits are in ascending order and do not overlap (touching is fine).
pub fn validate_edits(input_len: usize, edits: &[Edit]) -> Result<(), StripError> {
    let mut prev_end: usize = 0;
    for (idx, e) in edits.iter().enumerate() {
        if e.start > e.end {
            return Err(StripError::InvalidEdit(format!(
                "start > end at index {idx}: start={}, end={}",
                e.start, e.end
            )));
        }
        if e.end > input_len {
            return Err(StripError::InvalidEdit(format!(
                "edit out of bounds at index {idx}: end={} > input_len={}",
                e.end, input_len
            )));
        }
        if idx > 0 && e.start < prev_end {
            return Err(StripError::OverlappingEdits {
                a_start: edits[idx - 1].start,
                a_end: edits[idx - 1].end,
                b_start: e.start,
                b_end: e.end,
            });
        }
        prev_end = e.end;
    }
    Ok(())
}

/// Validate `edits` and rebuild the output, copying unchanged bytes between them.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, StripError> {
    validate_edits(source.len(), edits)?;

    let delta: isize = edits.iter().map(Edit::delta).sum();
    let mut out = String::with_capacity(source.len().saturating_add_signed(delta));
    let mut cursor = 0usize;
    for edit in edits {
        let unchanged = source.get(cursor..edit.start).ok_or_else(|| {
            StripError::InvalidEdit(format!(
                "edit start {} is not on a char boundary",
                edit.start
            ))
        })?;
        out.push_str(unchanged);
        out.push_str(edit.replacement);
        cursor = edit.end;
    }

    // Copy any remaining unchanged bytes after the last edit.
    let tail = source.get(cursor..).ok_or_else(|| {
        StripError::InvalidEdit(format!("edit end {cursor} is not on a char boundary"))
    })?;
    out.push_str(tail);

    Ok(out)
}
