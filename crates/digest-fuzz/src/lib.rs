//! Fuzzing library for mlbio-digest.
//!
//! Targets cover the parsers that see untrusted remote input: the Crossref
//! works response, the arXiv Atom feed and the summary extractor.
//!
//! # Usage
//!
//! ```bash
//! cd crates/digest-fuzz
//! cargo +nightly fuzz run fuzz_arxiv_feed -- -max_total_time=60
//! ```

pub use mlbio_digest::{models, sources, summary};
