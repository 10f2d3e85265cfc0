//! Catalog entry and source reference types.

use serde::{Deserialize, Serialize};

/// A document fragment cited by a canned answer.
///
/// Purely descriptive: the URL and page are never checked against real files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Position of the source in the answer's citation list (1-based by convention).
    pub id: u64,
    /// Human-readable document title.
    pub title: String,
    /// URL the viewer opens, usually a PDF under `/test/`.
    pub url: String,
    /// Page to jump to.
    pub page: u32,
    /// Text excerpt shown under the citation. Named `content` on the wire.
    #[serde(rename = "content", alias = "snippet")]
    pub snippet: String,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
}

impl SourceRef {
    /// Creates a source reference.
    #[must_use]
    pub fn new(
        id: u64,
        title: impl Into<String>,
        url: impl Into<String>,
        page: u32,
        snippet: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            page,
            snippet: snippet.into(),
            score,
        }
    }
}

/// One canned query/answer pair.
///
/// The pattern is stored under `query` in catalog files; `pattern` is accepted
/// as an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Entry identifier, echoed as the response `id`.
    pub id: u64,
    /// Query text the matcher compares user messages against.
    #[serde(rename = "query", alias = "pattern")]
    pub pattern: String,
    /// Canned answer text.
    pub answer: String,
    /// Cited sources, in display order.
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl CatalogEntry {
    /// Creates an entry without sources.
    #[must_use]
    pub fn new(id: u64, pattern: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            pattern: pattern.into(),
            answer: answer.into(),
            sources: Vec::new(),
        }
    }

    /// Adds a cited source.
    #[must_use]
    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.sources.push(source);
        self
    }
}

/// On-disk catalog layout: `{ "responses": [ ... ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog entries in match order.
    #[serde(default)]
    pub responses: Vec<CatalogEntry>,
}
