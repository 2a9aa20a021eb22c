#![no_main]

use libfuzzer_sys::fuzz_target;
use mlbio_digest::sources::arxiv::parse_feed;

fuzz_target!(|data: &[u8]| {
    // Arbitrary feed text must parse or fail, never panic
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = parse_feed(xml);
    }
});
