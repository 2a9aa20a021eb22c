//! Entries extracted from the arXiv Atom feed.

/// One `<entry>` of the arXiv API feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArxivEntry {
    /// `<id>` (abs URL).
    pub id_url: String,

    /// Title, whitespace collapsed.
    pub title: String,

    /// Abstract, whitespace collapsed.
    pub summary: String,

    /// `<published>` timestamp.
    pub published: Option<String>,

    /// `<updated>` timestamp.
    pub updated: Option<String>,

    /// Author names.
    pub authors: Vec<String>,

    /// `<arxiv:primary_category term=".."/>`.
    pub primary_category: Option<String>,
}
