#![no_main]

use libfuzzer_sys::fuzz_target;
use overpassql_strip::{StripConfig, locate::locate_comments, strip_whitespace};

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);
    let cfg = StripConfig::default();

    let once = strip_whitespace(&source, &cfg).expect("in-limit input must not fail");

    // Every comment survives byte-for-byte.
    for span in locate_comments(&source, &cfg).expect("in-limit input must not fail") {
        assert!(once.contains(span.text), "comment lost: {:?}", span.text);
    }

    // Normalizing normalized output changes nothing.
    let twice = strip_whitespace(&once, &cfg).expect("in-limit input must not fail");
    assert_eq!(twice, once);
});
