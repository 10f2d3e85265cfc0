//! # docchat
//!
//! Mock chat backend for a browser-based PDF viewer.
//!
//! docchat answers chat messages with canned answers that cite PDF "sources".
//! There is no retrieval behind it: answers come from a small fixed catalog of
//! query patterns matched fuzzily against the user's message, or from
//! randomized templates when running in synthetic mode.
//!
//! ## Features
//!
//! - Three-tier response matcher (substring, majority word overlap, partial token)
//! - JSON or YAML catalogs with a built-in fallback answer
//! - HTTP API compatible with the viewer UI (`POST /api/chat`, `GET /health`)
//! - Simulated network latency and static PDF serving for demos
//!
//! ## Example
//!
//! ```rust
//! use docchat::catalog::Catalog;
//! use docchat::models::CatalogEntry;
//!
//! let catalog = Catalog::from_entries(vec![
//!     CatalogEntry::new(1, "hello", "hi"),
//!     CatalogEntry::new(2, "what can you do", "I analyze docs"),
//! ])
//! .unwrap();
//!
//! let hit = catalog.find("tell me what you can do").unwrap();
//! assert_eq!(hit.entry.id, 2);
//! assert!(catalog.find("xyz").is_none());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod catalog;
pub mod client;
pub mod config;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;

// Re-exports for convenience
pub use catalog::Catalog;
pub use config::{DocchatConfig, FeatureFlags, ResponseMode};
pub use models::{CatalogEntry, ChatRequest, ChatResponse, SourceRef};
pub use services::{ChatService, Match, MatchTier, find_match};

/// Error type for docchat operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown response mode, blank chat message on the client side |
/// | `InvalidCatalog` | A catalog entry fails validation at load time |
/// | `OperationFailed` | I/O, parse, bind, or HTTP client failures |
///
/// The matcher itself never produces an error: "no match" is `None`.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A catalog entry was rejected during loading.
    ///
    /// Raised when:
    /// - The pattern or answer is blank
    /// - A source score is not a finite number in `[0, 1]`
    #[error("invalid catalog entry #{index} (id {id}): {reason}")]
    InvalidCatalog {
        /// Zero-based position of the entry in the catalog file.
        index: usize,
        /// The entry's declared id.
        id: u64,
        /// Why the entry was rejected.
        reason: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - Configuration or catalog files cannot be read or parsed
    /// - The HTTP listener cannot bind or the server stops with an error
    /// - The `ask` client cannot reach the server or gets an error status
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for docchat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
///
/// ```rust
/// let ts = docchat::current_timestamp_millis();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::operation("test", "failed");
        assert_eq!(err.to_string(), "operation 'test' failed: failed");

        let err = Error::InvalidCatalog {
            index: 2,
            id: 7,
            reason: "blank answer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid catalog entry #2 (id 7): blank answer"
        );
    }
}
