//! OverpassQL whitespace and comment stripping.
//!
//! Two independent transforms share the comment scanner in [`crate::locate`]:
//!
//! - [`strip_whitespace`] collapses whitespace in the code between comments and leaves every
//!   comment (with the indentation and line breaks it owns) byte-for-byte intact.
//! - [`strip_comments`] deletes every comment that does not contain `@preserve` and touches
//!   nothing else.
//!
//! [`strip`] chains them the way the webpack loader does: comments first, then whitespace.
//!
//! Whitespace rules, applied only to the text between comment spans (“gaps”):
//!
//! 1. A run of spaces/tabs becomes a single space.
//! 2. A run that starts with `\r` or `\n` (and everything whitespace after it) becomes a single
//!    `\n`.
//! 3. Whitespace at the very start and very end of the document is trimmed.
//! 4. Whitespace at the start of a gap that follows a comment ending in a line break is removed:
//!    the comment's own line break already separates it from the next token.
//!
//! Every transform first enforces the content-size guard ([`StripConfig::max_content_size`]).

use std::borrow::Cow;

use tracing::{debug, instrument, warn};

use crate::{
    StripError,
    edit::{Edit, apply_edits},
    locate::{CommentSpan, scan_comments},
    utf16::utf16_len,
};

/// Default ceiling on the input length, in [`LengthUnit`]s.
pub const MAX_CONTENT_SIZE: usize = 100_000_000;

/// How the content-size guard measures input length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthUnit {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// UTF-16 code units (JavaScript's `String.length`).
    Utf16,
}

/// Configuration shared by all transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    /// Inputs longer than this are rejected with [`StripError::SizeLimitExceeded`]. An input of
    /// exactly this length is accepted.
    pub max_content_size: usize,
    pub length_unit: LengthUnit,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            max_content_size: MAX_CONTENT_SIZE,
            length_unit: LengthUnit::Chars,
        }
    }
}

/// Which transforms [`strip`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOptions {
    /// Remove comments not marked `@preserve`.
    pub comments: bool,
    /// Collapse redundant whitespace outside comments.
    pub whitespace: bool,
}

/// Reject `content` if it is longer than the configured maximum.
pub(crate) fn check_size(content: &str, config: &StripConfig) -> Result<(), StripError> {
    let limit = config.max_content_size;

    // The byte length is an upper bound for both units.
    if content.len() <= limit {
        return Ok(());
    }

    let length = match config.length_unit {
        LengthUnit::Chars => content.chars().count(),
        LengthUnit::Utf16 => utf16_len(content),
    };
    if length > limit {
        return Err(StripError::SizeLimitExceeded { length, limit });
    }
    Ok(())
}

/// Collapse redundant whitespace while leaving comments intact.
#[instrument(skip_all, fields(len = content.len()))]
pub fn strip_whitespace(content: &str, config: &StripConfig) -> Result<String, StripError> {
    check_size(content, config)?;

    let spans = scan_comments(content);
    let edits = collect_whitespace_edits(content, &spans);
    debug!(
        comments = spans.len(),
        edits = edits.len(),
        "collapsing whitespace"
    );

    apply_edits(content, &edits)
}

/// Remove comments, keeping those that contain `@preserve`.
#[instrument(skip_all, fields(len = content.len()))]
pub fn strip_comments(content: &str, config: &StripConfig) -> Result<String, StripError> {
    check_size(content, config)?;

    let spans = scan_comments(content);
    let edits: Vec<Edit> = spans
        .iter()
        .filter(|span| !span.preserved)
        .map(|span| Edit::delete(span.start, span.end))
        .collect();
    debug!(
        comments = spans.len(),
        removed = edits.len(),
        "removing comments"
    );

    apply_edits(content, &edits)
}

/// Run the transforms selected by `options`: comments first, then whitespace.
///
/// Empty or whitespace-only input yields an empty string.
#[instrument(skip_all, fields(len = content.len()))]
pub fn strip(
    content: &str,
    options: &StripOptions,
    config: &StripConfig,
) -> Result<String, StripError> {
    check_size(content, config)?;

    if content.trim().is_empty() {
        warn!("no content provided");
        return Ok(String::new());
    }

    let mut code = Cow::Borrowed(content);
    if options.comments {
        code = Cow::Owned(strip_comments(&code, config)?);
    }
    if options.whitespace {
        code = Cow::Owned(strip_whitespace(&code, config)?);
    }
    Ok(code.into_owned())
}

/// Collect whitespace edits for every gap between comment spans.
///
/// Returns edits sorted by start offset; none of them touches a comment span.
fn collect_whitespace_edits(source: &str, spans: &[CommentSpan<'_>]) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut gap_start = 0usize;
    let mut after_break = false;

    for span in spans {
        collapse_gap(source, gap_start, span.start, after_break, &mut edits);
        gap_start = span.end;
        after_break = span.ends_with_line_break();
    }
    collapse_gap(source, gap_start, source.len(), after_break, &mut edits);

    edits
}

/// Emit edits for the code gap `source[start..end]`.
fn collapse_gap(
    source: &str,
    start: usize,
    end: usize,
    after_break: bool,
    edits: &mut Vec<Edit>,
) {
    if start >= end {
        return;
    }
    let gap = &source[start..end];

    // Bytes removed outright at the front and the back of the gap.
    let lead = if start == 0 {
        gap.len() - gap.trim_start().len()
    } else if after_break {
        gap.len() - gap.trim_start_matches(is_collapsible).len()
    } else {
        0
    };
    let trail = if end == source.len() {
        gap.trim_end().len().max(lead)
    } else {
        gap.len()
    };

    if lead > 0 {
        edits.push(Edit::delete(start, start + lead));
    }
    collapse_runs(source, start + lead, start + trail, edits);
    if trail < gap.len() {
        edits.push(Edit::delete(start + trail, end));
    }
}

/// Replace each whitespace run in `source[from..to]` with its canonical form.
fn collapse_runs(source: &str, from: usize, to: usize, edits: &mut Vec<Edit>) {
    let bytes = source.as_bytes();
    let mut i = from;

    while i < to {
        let (run_end, replacement) = match bytes[i] {
            b' ' | b'\t' => (
                scan_while(bytes, i, to, |b| matches!(b, b' ' | b'\t')),
                " ",
            ),
            b'\n' | b'\r' => (scan_while(bytes, i, to, |b| is_collapsible(b as char)), "\n"),
            _ => {
                i += 1;
                continue;
            }
        };

        if &source[i..run_end] != replacement {
            edits.push(Edit {
                start: i,
                end: run_end,
                replacement,
            });
        }
        i = run_end;
    }
}

fn scan_while(bytes: &[u8], mut pos: usize, to: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < to && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn is_collapsible(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collapses whitespace using the default config.
    fn ws(src: &str) -> String {
        strip_whitespace(src, &StripConfig::default()).unwrap()
    }

    /// Strips comments using the default config.
    fn comments(src: &str) -> String {
        strip_comments(src, &StripConfig::default()).unwrap()
    }

    /// Config with a small ceiling for boundary tests.
    fn limited(max_content_size: usize, length_unit: LengthUnit) -> StripConfig {
        StripConfig {
            max_content_size,
            length_unit,
        }
    }

    const SCHOOL: &str = r#"nwr["amenity"="school"](dataset);"#;
    const UNIVERSITY: &str = r#"nwr["amenity"="university"](dataset);"#;

    /// Horizontal runs collapse to one space.
    #[test]
    fn collapses_spaces_and_tabs() {
        assert_eq!(ws("a   b\t\tc"), "a b c");
        assert_eq!(
            ws(&format!("{SCHOOL}   {UNIVERSITY}")),
            format!("{SCHOOL} {UNIVERSITY}")
        );
        assert_eq!(
            ws(&format!("{SCHOOL}\t\t\t\t{UNIVERSITY}")),
            format!("{SCHOOL} {UNIVERSITY}")
        );
    }

    /// Line-break runs collapse to one newline.
    #[test]
    fn collapses_newlines() {
        assert_eq!(ws("a\n\n\nb"), "a\nb");
        assert_eq!(
            ws(&format!("{SCHOOL}\n\n\n\r\n\r\n\n{UNIVERSITY}")),
            format!("{SCHOOL}\n{UNIVERSITY}")
        );
    }

    /// Mixed whitespace starting with a line break becomes one newline.
    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(
            ws(&format!("{SCHOOL}\n\n\n\t\t \r \n\r\t\n\n {UNIVERSITY}")),
            format!("{SCHOOL}\n{UNIVERSITY}")
        );
    }

    /// Spaces before a line break stay a separate single space.
    #[test]
    fn horizontal_run_before_line_break() {
        assert_eq!(ws("a  \n  b"), "a \nb");
    }

    /// The document is trimmed at both ends.
    #[test]
    fn trims_document_edges() {
        assert_eq!(ws("  \n\t a b \n\n"), "a b");
        assert_eq!(ws(" \t\r\n "), "");
        assert_eq!(ws(""), "");
    }

    /// Whitespace after a comment's own line break is removed.
    #[test]
    fn drops_indent_after_line_comment() {
        assert_eq!(ws("// c\n\t\tcode  here"), "// c\ncode here");
    }

    /// A line comment followed by code is unchanged.
    #[test]
    fn keeps_line_comment() {
        let src = "// a comment line\nsome code!";
        assert_eq!(ws(src), src);
    }

    /// A multi-line block comment keeps its interior whitespace.
    #[test]
    fn keeps_multiline_comment() {
        let src = "/* a\n * * multi\n    \t* line\n\n comment! \n */\nsome code!";
        assert_eq!(ws(src), src);
    }

    /// Comment indentation and trailing blank lines are part of the comment.
    #[test]
    fn keeps_comment_owned_whitespace() {
        assert_eq!(
            ws("out;\n\n    // note\n\n\n   next;   x"),
            "out;\n    // note\n\n\nnext; x"
        );
    }

    /// Whitespace between an inline block comment and code collapses.
    #[test]
    fn collapses_around_inline_block_comment() {
        assert_eq!(ws("a;   /* c  c */   b;"), "a;   /* c  c */ b;");
    }

    /// Identical comment text in two places is restored in both places.
    #[test]
    fn repeated_comment_text() {
        assert_eq!(
            ws("/* x */ a   /* x */   b"),
            "/* x */ a   /* x */ b"
        );
    }

    /// An unterminated block opener is code and gets collapsed like code.
    #[test]
    fn unterminated_block_is_code() {
        assert_eq!(ws("a  /*  b\n\n c"), "a /* b\nc");
    }

    /// CRLF input collapses to LF between code lines.
    #[test]
    fn crlf_between_code_lines() {
        assert_eq!(ws("a;\r\n\r\nb;\r\n"), "a;\nb;");
    }

    /// Running the normalizer twice is the same as running it once.
    #[test]
    fn strip_whitespace_is_idempotent() {
        let inputs = [
            "a   b\t\tc",
            "// c\n\t\tcode  here",
            "  /* a */ b // c\n\n d /* e\n */\n// f",
            "x\t\n// c\n\n   \n/* d */  \t y \r\n",
            "/* open  \n\n never closed",
            "a /**/b/*/ c */  d",
            "名前   // コメント\n\n  🙂   x",
        ];
        for input in inputs {
            let once = ws(input);
            let twice = ws(&once);
            assert_eq!(twice, once, "not idempotent: {input:?}");
        }
    }

    /// Every comment span of the input appears verbatim in the output.
    #[test]
    fn strip_whitespace_preserves_comment_text() {
        let input = "  a  /* one\n\n two */  b\n\n\t// three\n\n\nc\t\t// four";
        let out = ws(input);
        for span in scan_comments(input) {
            assert!(out.contains(span.text), "lost comment {:?}", span.text);
        }
    }

    /// Line comments are removed with their line break.
    #[test]
    fn removes_line_comments() {
        assert_eq!(comments("// hi\ncode"), "code");
        let src = format!("// Show schools\n{SCHOOL}\n// Show universities\n{UNIVERSITY}");
        assert_eq!(comments(&src), format!("{SCHOOL}\n{UNIVERSITY}"));
    }

    /// `@preserve` line comments survive.
    #[test]
    fn preserves_marked_line_comments() {
        assert_eq!(comments("// hi @preserve\ncode"), "// hi @preserve\ncode");
        let src = format!("// Show schools @preserve\n{SCHOOL}\n// Show universities\n{UNIVERSITY}");
        assert_eq!(
            comments(&src),
            format!("// Show schools @preserve\n{SCHOOL}\n{UNIVERSITY}")
        );
    }

    /// Block comments of various shapes are removed.
    #[test]
    fn removes_block_comments() {
        assert_eq!(comments("/* block */\ncode"), "code");

        let expected = format!("{SCHOOL}\n{UNIVERSITY}");
        let cases = [
            format!("/*\n * Show schools\n */\n{SCHOOL}\n/*\n * Show universities\n */\n{UNIVERSITY}"),
            format!("/*\n* Show schools\n*/\n{SCHOOL}\n/*\n* Show universities\n*/\n{UNIVERSITY}"),
            format!(
                "/*\n       >> Show schools\n*/\n{SCHOOL}\n/*\n      :-) Show universities\n*/\n{UNIVERSITY}"
            ),
            format!(
                "/*****\n       >> Show schools\n****/\n{SCHOOL}\n/* more content\n   **   :-) Show universities ~~~ **\n*/\n{UNIVERSITY}"
            ),
            format!("/** schools */\n{SCHOOL}\n/*unis*/\n{UNIVERSITY}"),
        ];
        for src in cases {
            assert_eq!(comments(&src), expected, "input: {src:?}");
        }
    }

    /// `@preserve` block comments survive verbatim.
    #[test]
    fn preserves_marked_block_comments() {
        let src = format!(
            "/** @preserve \nSchools */\n{SCHOOL}\n/*    \n \nuniversities**\n *** ***/\n{UNIVERSITY}"
        );
        assert_eq!(
            comments(&src),
            format!("/** @preserve \nSchools */\n{SCHOOL}\n{UNIVERSITY}")
        );
    }

    /// Inline comments take their leading indentation with them.
    #[test]
    fn removes_inline_comment_with_indent() {
        assert_eq!(comments("out;   // done\nnext;"), "out;next;");
        assert_eq!(comments("a; \t/* x */ b;"), "a; b;");
    }

    /// Comment stripping does not collapse whitespace.
    #[test]
    fn strip_comments_leaves_code_whitespace() {
        assert_eq!(comments("a   b\n\n// c\n\n  d"), "a   b\n\n  d");
    }

    /// Text without comments passes through unchanged.
    #[test]
    fn strip_comments_passthrough() {
        let inputs = [
            "",
            "   ",
            "a / b * c",
            "unterminated /* block\n\n",
            "[out:json];\n  node(50.7,7.1,50.8,7.2);\nout;",
        ];
        for input in inputs {
            assert_eq!(comments(input), input);
        }
    }

    /// Both transforms share the same size guard boundary.
    #[test]
    fn size_guard_boundary() {
        let cfg = limited(5, LengthUnit::Chars);
        assert_eq!(strip_whitespace("abcde", &cfg).unwrap(), "abcde");
        assert_eq!(strip_comments("abcde", &cfg).unwrap(), "abcde");

        let expected = StripError::SizeLimitExceeded {
            length: 6,
            limit: 5,
        };
        assert_eq!(strip_whitespace("abcdef", &cfg).unwrap_err(), expected);
        assert_eq!(strip_comments("abcdef", &cfg).unwrap_err(), expected);
    }

    /// The guard counts chars or UTF-16 code units, not bytes.
    #[test]
    fn size_guard_units() {
        let src = "🙂🙂🙂";
        assert!(strip_comments(src, &limited(5, LengthUnit::Chars)).is_ok());
        assert_eq!(
            strip_comments(src, &limited(5, LengthUnit::Utf16)).unwrap_err(),
            StripError::SizeLimitExceeded {
                length: 6,
                limit: 5
            }
        );
        assert!(strip_comments(src, &limited(6, LengthUnit::Utf16)).is_ok());
    }

    /// The default ceiling rejects one character over the limit.
    #[test]
    fn default_size_guard() {
        assert_eq!(StripConfig::default().max_content_size, 100_000_000);

        let big = "a".repeat(MAX_CONTENT_SIZE + 1);
        let expected = StripError::SizeLimitExceeded {
            length: MAX_CONTENT_SIZE + 1,
            limit: MAX_CONTENT_SIZE,
        };
        assert_eq!(
            strip_whitespace(&big, &StripConfig::default()).unwrap_err(),
            expected
        );
        assert_eq!(
            strip_comments(&big, &StripConfig::default()).unwrap_err(),
            expected
        );
    }

    /// Error text carries both numbers.
    #[test]
    fn size_error_message() {
        let err = strip_comments("abc", &limited(2, LengthUnit::Chars)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "content is too big, length of 3 is larger than limit of 2"
        );
    }

    /// The pipeline strips comments before collapsing whitespace.
    #[test]
    fn pipeline_runs_comments_then_whitespace() {
        let src = " // drop\n/* keep @preserve */\n\n  nwr;   out;\n";
        let both = StripOptions {
            comments: true,
            whitespace: true,
        };
        assert_eq!(
            strip(src, &both, &StripConfig::default()).unwrap(),
            "/* keep @preserve */\n\nnwr; out;"
        );
    }

    /// Each pipeline flag selects one transform.
    #[test]
    fn pipeline_flags() {
        let src = "a   // c\nb";
        let cfg = StripConfig::default();
        let only = |comments, whitespace| {
            strip(
                src,
                &StripOptions {
                    comments,
                    whitespace,
                },
                &cfg,
            )
            .unwrap()
        };
        assert_eq!(only(false, false), src);
        assert_eq!(only(true, false), "ab");
        assert_eq!(only(false, true), "a   // c\nb");
    }

    /// Blank input short-circuits to an empty string.
    #[test]
    fn pipeline_blank_input() {
        let opts = StripOptions::default();
        assert_eq!(strip(" \n\t", &opts, &StripConfig::default()).unwrap(), "");
    }

    /// The pipeline enforces the guard even with no transforms selected.
    #[test]
    fn pipeline_enforces_guard() {
        let err = strip(
            "abcdef",
            &StripOptions::default(),
            &limited(5, LengthUnit::Chars),
        )
        .unwrap_err();
        assert!(matches!(err, StripError::SizeLimitExceeded { .. }));
    }
}
