//! Chat answering.

use super::synthetic::synthesize;
use crate::catalog::Catalog;
use crate::config::{ChatSettings, ResponseMode};
use crate::current_timestamp_millis;
use crate::models::{ChatRequest, ChatResponse};
use crate::observability::current_request_id;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};

/// Produces chat answers from the catalog or from synthetic templates.
///
/// Cheap to share: the catalog is behind an `Arc` and the only mutable state
/// is the RNG used in synthetic mode.
#[derive(Debug)]
pub struct ChatService {
    catalog: Arc<Catalog>,
    settings: ChatSettings,
    rng: Mutex<StdRng>,
}

impl ChatService {
    /// Creates a chat service with an OS-seeded RNG.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, settings: ChatSettings) -> Self {
        Self {
            catalog,
            settings,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reseeds the RNG so synthetic answers are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// The catalog answers are drawn from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configured response mode.
    #[must_use]
    pub const fn mode(&self) -> ResponseMode {
        self.settings.mode
    }

    /// Answers a chat request. Never fails: unmatched messages get the fallback.
    pub fn respond(&self, request: &ChatRequest) -> ChatResponse {
        metrics::counter!(
            "docchat_chat_requests_total",
            "mode" => self.settings.mode.as_str()
        )
        .increment(1);

        match self.settings.mode {
            ResponseMode::Catalog => self.respond_from_catalog(request),
            ResponseMode::Synthetic => self.respond_synthetic(request),
        }
    }

    /// Source count after applying the default and the cap.
    #[must_use]
    pub fn effective_source_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.settings.default_source_count)
            .min(self.settings.max_source_count)
    }

    fn respond_from_catalog(&self, request: &ChatRequest) -> ChatResponse {
        let resolution = self.catalog.resolve(&request.message);
        metrics::counter!("docchat_match_total", "tier" => resolution.label()).increment(1);
        tracing::debug!(
            request_id = current_request_id().as_deref().unwrap_or("-"),
            tier = resolution.label(),
            entry_id = resolution.entry.id,
            "Resolved chat message"
        );

        let mut response = ChatResponse::from(resolution.entry);
        // Only an explicit count trims catalog sources; the default applies to synthetic answers.
        if let Some(requested) = request.source_count {
            response
                .sources
                .truncate(requested.min(self.settings.max_source_count));
        }
        response
    }

    fn respond_synthetic(&self, request: &ChatRequest) -> ChatResponse {
        let source_count = self.effective_source_count(request.source_count);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let response = synthesize(&mut *rng, request, source_count, current_timestamp_millis());
        drop(rng);

        tracing::debug!(
            request_id = current_request_id().as_deref().unwrap_or("-"),
            sources = response.sources.len(),
            "Generated synthetic answer"
        );
        response
    }
}
