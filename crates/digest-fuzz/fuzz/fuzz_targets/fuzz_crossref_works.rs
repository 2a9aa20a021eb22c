#![no_main]

use libfuzzer_sys::fuzz_target;
use mlbio_digest::models::WorksResponse;
use mlbio_digest::sources::crossref::candidates_from_works;

fuzz_target!(|data: &[u8]| {
    // Decode, then run the venue filter and JATS cleanup on whatever survived
    if let Ok(response) = serde_json::from_slice::<WorksResponse>(data) {
        let _ = candidates_from_works(response.message.items);
    }
});
