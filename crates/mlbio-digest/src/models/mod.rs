//! Data models for the digest pipeline and the remote services it talks to.
//!
//! Wire models use `#[serde(default)]` for optional fields and rename to match
//! each API's naming.

mod altmetric;
mod arxiv;
mod candidate;
mod crossref;
mod message;

pub use altmetric::AltmetricRecord;
pub use arxiv::ArxivEntry;
pub use candidate::{CandidateItem, Identifier, LookbackWindow, Popularity, SourceKind};
pub use crossref::{Contributor, DateParts, Timestamp, Work, WorksMessage, WorksResponse};
pub use message::{Block, DigestMessage, TextObject};
