//! Chat wire types.

use super::{CatalogEntry, SourceRef};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Requested number of sources. Falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_count: Option<usize>,
    /// Graph RAG toggle from the settings panel. Echoed, never acted on.
    #[serde(default = "default_true")]
    pub use_graph_rag: bool,
    /// Contradiction detection toggle. Echoed, never acted on.
    #[serde(default)]
    pub detect_contradictions: bool,
}

const fn default_true() -> bool {
    true
}

impl ChatRequest {
    /// Creates a request with the UI's default toggles.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_count: None,
            use_graph_rag: true,
            detect_contradictions: false,
        }
    }

    /// Sets the requested source count.
    #[must_use]
    pub const fn with_source_count(mut self, count: usize) -> Self {
        self.source_count = Some(count);
        self
    }

    /// Sets the Graph RAG toggle.
    #[must_use]
    pub const fn with_graph_rag(mut self, enabled: bool) -> Self {
        self.use_graph_rag = enabled;
        self
    }

    /// Sets the contradiction detection toggle.
    #[must_use]
    pub const fn with_contradiction_detection(mut self, enabled: bool) -> Self {
        self.detect_contradictions = enabled;
        self
    }
}

/// Answer returned by `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Catalog entry id, or a millisecond timestamp for synthetic answers.
    pub id: u64,
    /// Answer text. May reference sources as `[1]`, `[2]`.
    pub answer: String,
    /// Cited sources.
    pub sources: Vec<SourceRef>,
}

impl From<&CatalogEntry> for ChatResponse {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id,
            answer: entry.answer.clone(),
            sources: entry.sources.clone(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `OK` while the server is up.
    pub status: String,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
}

impl HealthResponse {
    /// Builds a health response stamped with the current time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error message.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(request, ChatRequest::new("hello"));
        assert!(request.use_graph_rag);
        assert!(!request.detect_contradictions);
        assert_eq!(request.source_count, None);
    }

    #[test]
    fn test_request_ignores_unknown_fields() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "theme": "dark", "source_count": 3}"#)
                .unwrap();
        assert_eq!(request.source_count, Some(3));
    }

    #[test]
    fn test_request_requires_message() {
        let parsed: Result<ChatRequest, _> = serde_json::from_str(r#"{"source_count": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_from_entry() {
        let entry = CatalogEntry::new(9, "hello", "hi").with_source(SourceRef::new(
            1,
            "Guide",
            "/test/1.pdf",
            1,
            "intro",
            0.9,
        ));
        let response = ChatResponse::from(&entry);
        assert_eq!(response.id, 9);
        assert_eq!(response.answer, "hi");
        assert_eq!(response.sources.len(), 1);
    }

    #[test]
    fn test_health_status() {
        let health = HealthResponse::now();
        assert_eq!(health.status, "OK");
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }
}
