//! Canned-answer catalog.
//!
//! The catalog is loaded once at startup, validated, and then shared
//! read-only. The entry whose pattern is `default` is not matchable; it is
//! the fallback answer returned when nothing else matches.
//!
//! Catalog files use the layout `{ "responses": [ { "id", "query", "answer",
//! "sources": [ ... ] } ] }` in JSON, or the same structure in YAML.

mod validation;

pub use validation::validate_entry;

use crate::models::{CatalogEntry, CatalogFile};
use crate::services::{Match, MatchTier, find_match};
use crate::{Error, Result};
use std::path::Path;

/// Pattern that marks the fallback entry.
pub const FALLBACK_PATTERN: &str = "default";

/// Answer used when a catalog has no `default` entry.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't find a suitable answer to your request.";

/// Catalog compiled into the binary.
const EMBEDDED_CATALOG: &str = include_str!("default_catalog.json");

/// Catalog file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// JSON (`.json`, and anything unrecognized).
    Json,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
}

impl CatalogFormat {
    /// Picks a format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// The answer chosen for a query: a matched entry or the fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    /// Entry to answer with.
    pub entry: &'a CatalogEntry,
    /// Tier that matched, or `None` for the fallback.
    pub tier: Option<MatchTier>,
}

impl Resolution<'_> {
    /// Returns true if the fallback answer was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.tier.is_none()
    }

    /// Label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.tier {
            Some(tier) => tier.as_str(),
            None => "fallback",
        }
    }
}

/// Validated, immutable catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    fallback: CatalogEntry,
}

impl Catalog {
    /// Builds a catalog from entries in match order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] for the first entry that fails validation.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        for (index, entry) in entries.iter().enumerate() {
            validate_entry(index, entry)?;
        }

        let (fallbacks, entries): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(is_fallback_entry);

        if fallbacks.len() > 1 {
            tracing::warn!(
                count = fallbacks.len(),
                "Catalog has several default entries, using the first"
            );
        }

        let fallback = fallbacks
            .into_iter()
            .next()
            .unwrap_or_else(|| CatalogEntry::new(0, FALLBACK_PATTERN, FALLBACK_ANSWER));

        Ok(Self { entries, fallback })
    }

    /// Parses catalog text in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or an entry is invalid.
    pub fn parse(contents: &str, format: CatalogFormat) -> Result<Self> {
        let file: CatalogFile = match format {
            CatalogFormat::Json => serde_json::from_str(contents)
                .map_err(|e| Error::operation("parse_catalog_json", e))?,
            CatalogFormat::Yaml => serde_yaml_ng::from_str(contents)
                .map_err(|e| Error::operation("parse_catalog_yaml", e))?,
        };

        Self::from_entries(file.responses)
    }

    /// Loads a catalog file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an entry is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_catalog".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let catalog = Self::parse(&contents, CatalogFormat::from_path(path))?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Returns the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded file itself is broken.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_CATALOG, CatalogFormat::Json)
    }

    /// Loads `path` if given, otherwise the embedded catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`] and [`Catalog::embedded`].
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::embedded, Self::load)
    }

    /// Matchable entries in catalog order (the fallback excluded).
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The fallback entry.
    #[must_use]
    pub const fn fallback(&self) -> &CatalogEntry {
        &self.fallback
    }

    /// Number of matchable entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no matchable entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the matcher against this catalog.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<Match<'_>> {
        find_match(query, &self.entries)
    }

    /// Runs the matcher, substituting the fallback on no match.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Resolution<'_> {
        self.find(query).map_or(
            Resolution {
                entry: &self.fallback,
                tier: None,
            },
            |hit| Resolution {
                entry: hit.entry,
                tier: Some(hit.tier),
            },
        )
    }
}

fn is_fallback_entry(entry: &CatalogEntry) -> bool {
    entry.pattern.trim().eq_ignore_ascii_case(FALLBACK_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.fallback().id, 0);
        assert!(
            catalog
                .entries()
                .iter()
                .all(|entry| !is_fallback_entry(entry))
        );
    }

    #[test]
    fn test_embedded_entries_match_themselves() {
        let catalog = Catalog::embedded().unwrap();
        for entry in catalog.entries() {
            let hit = catalog.find(&entry.pattern).unwrap();
            assert_eq!(hit.entry.id, entry.id, "pattern {:?}", entry.pattern);
        }
    }

    #[test]
    fn test_default_entry_is_not_matchable() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry::new(1, "hello", "hi"),
            CatalogEntry::new(99, "Default", "nothing found"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.fallback().id, 99);

        let resolution = catalog.resolve("default");
        assert!(resolution.is_fallback());
        assert_eq!(resolution.entry.answer, "nothing found");
    }

    #[test]
    fn test_builtin_fallback_when_missing() {
        let catalog = Catalog::from_entries(vec![CatalogEntry::new(1, "hello", "hi")]).unwrap();
        assert_eq!(catalog.fallback().answer, FALLBACK_ANSWER);
        assert_eq!(catalog.fallback().id, 0);
    }

    #[test]
    fn test_resolve_reports_tier() {
        let catalog = Catalog::from_entries(vec![CatalogEntry::new(1, "hello", "hi")]).unwrap();
        let resolution = catalog.resolve("hello world");
        assert_eq!(resolution.tier, Some(MatchTier::Substring));
        assert_eq!(resolution.label(), "substring");

        let resolution = catalog.resolve("   ");
        assert!(resolution.is_fallback());
        assert_eq!(resolution.label(), "fallback");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
responses:
  - id: 1
    query: hello
    answer: hi
    sources:
      - id: 1
        title: Guide
        url: /test/1.pdf
        page: 2
        content: intro
        score: 0.5
";
        let catalog = Catalog::parse(yaml, CatalogFormat::Yaml).unwrap();
        assert_eq!(catalog.entries()[0].sources[0].snippet, "intro");
    }

    #[test]
    fn test_parse_rejects_invalid_entry() {
        let json = r#"{"responses": [{"id": 4, "query": "  ", "answer": "x"}]}"#;
        let result = Catalog::parse(json, CatalogFormat::Json);
        assert!(matches!(
            result,
            Err(Error::InvalidCatalog { index: 0, id: 4, .. })
        ));
    }

    #[test]
    fn test_parse_empty_responses() {
        let catalog = Catalog::parse("{}", CatalogFormat::Json).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.resolve("anything").is_fallback());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("db.YML")),
            CatalogFormat::Yaml
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("db.json")),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("db")),
            CatalogFormat::Json
        );
    }
}
