#![no_main]

use libfuzzer_sys::fuzz_target;
use mlbio_digest::summary::summarize;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let summary = summarize(Some(text.as_ref()));
    assert!(!summary.is_empty());
});
