//! Load-time validation of catalog entries.

use crate::models::CatalogEntry;
use crate::{Error, Result};

/// Checks a single entry.
///
/// Rejects blank patterns and answers, and source scores outside `[0, 1]`.
/// The matcher assumes these hold: a blank pattern would match every query.
///
/// # Errors
///
/// Returns [`Error::InvalidCatalog`] describing the first problem found.
pub fn validate_entry(index: usize, entry: &CatalogEntry) -> Result<()> {
    let reject = |reason: String| Error::InvalidCatalog {
        index,
        id: entry.id,
        reason,
    };

    if entry.pattern.trim().is_empty() {
        return Err(reject("pattern is blank".to_string()));
    }
    if entry.answer.trim().is_empty() {
        return Err(reject("answer is blank".to_string()));
    }

    for source in &entry.sources {
        if !source.score.is_finite() || !(0.0..=1.0).contains(&source.score) {
            return Err(reject(format!(
                "source {} has score {} outside [0, 1]",
                source.id, source.score
            )));
        }
    }

    Ok(())
}
