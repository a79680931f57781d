//! UTF-16 measurement utilities.
//!
//! The rest of the crate is byte-based (Rust `str` model). JavaScript strings, which the WASM
//! bindings receive and return, index and measure in **UTF-16 code units**. This module bridges
//! the two:
//!
//! - [`utf16_len`] is the equivalent of JavaScript's `String.prototype.length`.
//! - [`Utf16Offsets`] converts ascending byte offsets to UTF-16 offsets in a single forward pass.
//!
//! Offsets that fall inside a multi-byte UTF-8 sequence are clamped to the start of the
//! containing Unicode scalar value.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    // Every scalar value is one code unit, except those outside the BMP (4 UTF-8 bytes) which
    // need a surrogate pair.
    s.chars().map(char::len_utf16).sum()
}

/// Forward-only byte offset to UTF-16 offset converter.
///
/// Queries are expected in non-decreasing byte order (as comment spans are produced). A query
/// behind the cursor restarts the walk from the beginning, so it stays correct, just slower.
#[derive(Debug, Clone)]
pub struct Utf16Offsets<'a> {
    s: &'a str,
    /// Byte offset of the cursor (always a char boundary).
    byte: usize,
    /// UTF-16 offset of the cursor.
    utf16: usize,
}

impl<'a> Utf16Offsets<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            s,
            byte: 0,
            utf16: 0,
        }
    }

    /// Convert an absolute byte offset into a UTF-16 code unit offset.
    ///
    /// Offsets beyond the end of the string clamp to the string's UTF-16 length.
    pub fn utf16_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.utf16 = 0;
        }

        let target = byte.min(self.s.len());
        for (rel, c) in self.s[self.byte..].char_indices() {
            let at = self.byte + rel;
            if at + c.len_utf8() > target {
                self.byte = at;
                return self.utf16;
            }
            self.utf16 += c.len_utf16();
        }

        self.byte = self.s.len();
        self.utf16
    }
}
