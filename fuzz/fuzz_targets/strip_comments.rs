#![no_main]

use libfuzzer_sys::fuzz_target;
use overpassql_strip::{StripConfig, locate::locate_comments, strip_comments};

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);
    let cfg = StripConfig::default();

    let spans = locate_comments(&source, &cfg).expect("in-limit input must not fail");
    let out = strip_comments(&source, &cfg).expect("in-limit input must not fail");

    if spans.is_empty() {
        assert_eq!(out, source);
        return;
    }

    // Output is the input minus exactly the unmarked spans.
    let removed: usize = spans
        .iter()
        .filter(|s| !s.preserved)
        .map(|s| s.end - s.start)
        .sum();
    assert_eq!(out.len(), source.len() - removed);
    for span in spans.iter().filter(|s| s.preserved) {
        assert!(out.contains(span.text), "preserved comment lost: {:?}", span.text);
    }
});
