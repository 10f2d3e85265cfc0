//! Catalog loading integration tests.
//!
//! Exercises `Catalog::load` against real files:
//! - JSON and YAML layouts, chosen by extension
//! - Fallback extraction from the `default` entry
//! - Validation failures and unreadable files

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use docchat::catalog::{Catalog, FALLBACK_ANSWER};
use docchat::{Error, MatchTier};
use std::path::PathBuf;
use tempfile::TempDir;
use test_case::test_case;

// ============================================================================
// Test Helpers
// ============================================================================

const JSON_CATALOG: &str = r#"{
  "responses": [
    {
      "id": 10,
      "query": "quarterly revenue",
      "answer": "Revenue grew 12% in Q3 [1].",
      "sources": [
        {
          "id": 1,
          "title": "Q3 Report",
          "url": "/test/1.pdf",
          "page": 4,
          "content": "Revenue grew 12% quarter over quarter.",
          "score": 0.9
        }
      ]
    },
    {
      "id": 0,
      "query": "default",
      "answer": "No idea, sorry.",
      "sources": []
    }
  ]
}"#;

const YAML_CATALOG: &str = r"
responses:
  - id: 20
    query: onboarding checklist
    answer: Start with the security training [1].
    sources:
      - id: 3
        title: Employee Handbook
        url: /test/3.pdf
        page: 2
        content: Every new hire completes security training in week one.
        score: 0.75
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write catalog");
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_json_extracts_fallback() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::load(&write(&dir, "catalog.json", JSON_CATALOG)).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.fallback().answer, "No idea, sorry.");

    let hit = catalog.find("What was the QUARTERLY REVENUE?").unwrap();
    assert_eq!(hit.entry.id, 10);
    assert_eq!(hit.tier, MatchTier::Substring);
    assert_eq!(hit.entry.sources[0].snippet, "Revenue grew 12% quarter over quarter.");

    // The fallback pattern itself is not matchable.
    assert!(catalog.resolve("default").is_fallback());
}

#[test_case("catalog.yaml" ; "yaml extension")]
#[test_case("catalog.YML" ; "uppercase yml extension")]
fn test_load_yaml(name: &str) {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::load(&write(&dir, name, YAML_CATALOG)).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.fallback().answer, FALLBACK_ANSWER);

    let hit = catalog.find("checklist for onboarding").unwrap();
    assert_eq!(hit.entry.id, 20);
    assert_eq!(hit.tier, MatchTier::Overlap);
}

#[test]
fn test_load_or_embedded_without_path() {
    let catalog = Catalog::load_or_embedded(None).unwrap();
    assert!(!catalog.is_empty());
    assert!(catalog.find("hello").is_some());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(&dir.path().join("absent.json")).unwrap_err();
    match err {
        Error::OperationFailed { operation, cause } => {
            assert_eq!(operation, "read_catalog");
            assert!(cause.contains("absent.json"), "{cause}");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_json() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(&write(&dir, "broken.json", "{ \"responses\": [")).unwrap_err();
    assert!(matches!(err, Error::OperationFailed { .. }));
}

#[test_case(r#"{"responses":[{"id":3,"query":"  ","answer":"x"}]}"#, 3 ; "blank pattern")]
#[test_case(r#"{"responses":[{"id":4,"query":"ok","answer":""}]}"#, 4 ; "blank answer")]
#[test_case(
    r#"{"responses":[{"id":5,"query":"ok","answer":"x","sources":[{"id":1,"title":"t","url":"/u","page":1,"content":"c","score":1.5}]}]}"#,
    5 ; "score above one"
)]
fn test_invalid_entry_rejected(contents: &str, expected_id: u64) {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(&write(&dir, "bad.json", contents)).unwrap_err();
    match err {
        Error::InvalidCatalog { index, id, .. } => {
            assert_eq!(index, 0);
            assert_eq!(id, expected_id);
        },
        other => panic!("unexpected error: {other}"),
    }
}
