//! Data models for docchat.
//!
//! Catalog types are loaded once at startup and never mutated. Chat types are
//! the JSON wire format shared with the viewer UI.

mod catalog;
mod chat;

pub use catalog::{CatalogEntry, CatalogFile, SourceRef};
pub use chat::{ChatRequest, ChatResponse, ErrorBody, HealthResponse};
