//! wasm-bindgen exports.
//!
//! This module exposes the OverpassQL strippers to the JavaScript build-tool loader via
//! `wasm-bindgen`. The underlying logic lives in the `overpassql-strip` crate.
//!
//! Lengths and offsets crossing this boundary are UTF-16 code units, the way JavaScript strings
//! measure themselves.

use wasm_bindgen::prelude::*;

use overpassql_strip::{
    CommentKind, LengthUnit, MAX_CONTENT_SIZE, StripConfig, StripError,
    StripOptions as StripOptionsInner, locate::locate_comments, strip::strip as strip_inner,
    strip_comments as strip_comments_inner, strip_whitespace as strip_whitespace_inner,
    utf16::Utf16Offsets,
};

/// The guard measures input the way JavaScript's `String.length` does.
const CONFIG: StripConfig = StripConfig {
    max_content_size: MAX_CONTENT_SIZE,
    length_unit: LengthUnit::Utf16,
};

/// Which transforms `strip` runs.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "camelCase")]
#[tsify(from_wasm_abi)]
pub struct StripOptions {
    /// Remove comments to save space; comments containing "@preserve" are kept.
    #[serde(default)]
    #[tsify(optional)]
    pub strip_comments: bool,
    /// Remove redundant whitespace to save space.
    #[serde(default)]
    #[tsify(optional)]
    pub strip_whitespace: bool,
}

impl From<StripOptions> for StripOptionsInner {
    fn from(val: StripOptions) -> Self {
        StripOptionsInner {
            comments: val.strip_comments,
            whitespace: val.strip_whitespace,
        }
    }
}

/// A comment found in the input. Offsets are UTF-16 code units.
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct Comment {
    pub start: usize,
    pub end: usize,
    /// `"line"` or `"block"`.
    pub kind: String,
    pub text: String,
    pub preserved: bool,
}

/// Output of `locateComments`.
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
pub struct Comments {
    pub comments: Vec<Comment>,
}

/// Convert a stripping error into a thrown JavaScript `Error`.
fn to_js_error(err: StripError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Remove redundant whitespace while preserving comments.
#[wasm_bindgen(js_name = stripWhitespace)]
pub fn strip_whitespace(content: String) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    strip_whitespace_inner(&content, &CONFIG).map_err(to_js_error)
}

/// Remove comments, keeping those that contain "@preserve".
#[wasm_bindgen(js_name = stripComments)]
pub fn strip_comments(content: String) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    strip_comments_inner(&content, &CONFIG).map_err(to_js_error)
}

/// Strip comments and then whitespace, as selected by `options`.
#[wasm_bindgen]
pub fn strip(content: String, options: StripOptions) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    strip_inner(&content, &options.into(), &CONFIG).map_err(to_js_error)
}

/// List every comment in `content`.
#[wasm_bindgen(js_name = locateComments)]
pub fn locate(content: String) -> Result<Comments, JsValue> {
    console_error_panic_hook::set_once();

    let spans = locate_comments(&content, &CONFIG).map_err(to_js_error)?;
    let mut offsets = Utf16Offsets::new(&content);
    let comments = spans
        .into_iter()
        .map(|span| Comment {
            start: offsets.utf16_offset(span.start),
            end: offsets.utf16_offset(span.end),
            kind: match span.kind {
                CommentKind::Line => "line",
                CommentKind::Block => "block",
            }
            .to_string(),
            text: span.text.to_string(),
            preserved: span.preserved,
        })
        .collect();
    Ok(Comments { comments })
}

/// Maximum permissible content size, in UTF-16 code units.
#[wasm_bindgen(js_name = maxContentSize)]
pub fn max_content_size() -> usize {
    CONFIG.max_content_size
}
