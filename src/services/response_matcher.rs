//! Canned-response matching.
//!
//! Scores a user query against the catalog in three ordered tiers. The first
//! tier that produces a hit wins, and within a tier the first entry in catalog
//! order wins; there is no global best-score search.
//!
//! | Tier | Rule |
//! |------|------|
//! | `Substring` | pattern is a substring of the query, or the query of the pattern |
//! | `Overlap` | at least `ceil(n / 2)` of the pattern's `n` tokens appear verbatim in the query |
//! | `Partial` | some query token contains, or is contained by, some pattern token |
//!
//! Matching is case-insensitive. Punctuation is kept, so `"docs!"` and
//! `"docs"` are different tokens for the overlap tier.

use crate::models::CatalogEntry;
use std::collections::HashSet;

/// Matching strategy that produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// Pattern and query contain one another.
    Substring,
    /// Majority of pattern tokens occur in the query.
    Overlap,
    /// A query token and a pattern token contain one another.
    Partial,
}

impl MatchTier {
    /// Returns the tier as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Overlap => "overlap",
            Self::Partial => "partial",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry selected by the matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    /// The selected entry.
    pub entry: &'a CatalogEntry,
    /// The tier that selected it.
    pub tier: MatchTier,
}

/// Finds the catalog entry that best answers `query`.
///
/// Returns `None` for empty or whitespace-only queries without scanning, and
/// when no tier matches. The caller substitutes its fallback answer.
///
/// # Arguments
///
/// * `query` - Raw user message.
/// * `entries` - Catalog entries in match order.
#[must_use]
pub fn find_match<'a>(query: &str, entries: &'a [CatalogEntry]) -> Option<Match<'a>> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return None;
    }

    let patterns: Vec<String> = entries
        .iter()
        .map(|entry| entry.pattern.to_lowercase())
        .collect();

    let hit = substring_tier(&normalized, &patterns)
        .map(|idx| (idx, MatchTier::Substring))
        .or_else(|| overlap_tier(&normalized, &patterns).map(|idx| (idx, MatchTier::Overlap)))
        .or_else(|| partial_tier(&normalized, &patterns).map(|idx| (idx, MatchTier::Partial)));

    hit.map(|(idx, tier)| Match {
        entry: &entries[idx],
        tier,
    })
}

/// Lowercases and trims a query.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn substring_tier(query: &str, patterns: &[String]) -> Option<usize> {
    patterns
        .iter()
        .position(|pattern| pattern.contains(query) || query.contains(pattern.as_str()))
}

fn overlap_tier(query: &str, patterns: &[String]) -> Option<usize> {
    let query_tokens: HashSet<&str> = query.split_whitespace().collect();

    patterns.iter().position(|pattern| {
        let pattern_tokens: Vec<&str> = pattern.split_whitespace().collect();
        // Duplicate pattern tokens count once per occurrence.
        let matching = pattern_tokens
            .iter()
            .filter(|token| query_tokens.contains(*token))
            .count();
        !pattern_tokens.is_empty() && matching >= pattern_tokens.len().div_ceil(2)
    })
}

fn partial_tier(query: &str, patterns: &[String]) -> Option<usize> {
    let query_tokens: Vec<&str> = query.split_whitespace().collect();

    patterns.iter().position(|pattern| {
        let pattern_tokens: Vec<&str> = pattern.split_whitespace().collect();
        query_tokens.iter().any(|query_token| {
            pattern_tokens.iter().any(|pattern_token| {
                pattern_token.contains(query_token) || query_token.contains(pattern_token)
            })
        })
    })
}
