//! ML x Biology Digest
//!
//! A scheduled batch job that collects recent machine-learning-and-biology
//! papers from Crossref (Nature and Cell family journals) and arXiv, ranks
//! them by Altmetric attention, extracts two-sentence summaries and posts a
//! digest to a Slack Incoming Webhook.
//!
//! # Pipeline
//!
//! - **Sources**: one bounded query per service over a 30-day window
//! - **Enrichment**: per-item Altmetric lookup; missing data ranks last
//! - **Ranking**: score, then recency; top 5 journal articles and 2 preprints
//! - **Delivery**: a single webhook POST, no retry
//!
//! # Example
//!
//! ```no_run
//! use mlbio_digest::{config::Config, pipeline::Digest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let report = Digest::new(&config)?.run().await?;
//!     println!("Posted {} items", report.items);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod delivery;
pub mod enrichment;
pub mod error;
pub mod formatters;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod sources;
pub mod summary;

pub use client::ScholarlyClient;
pub use config::Config;
pub use error::{ClientError, DigestError};
pub use pipeline::{Digest, RankedLists};
