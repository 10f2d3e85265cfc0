//! Randomized templated answers.
//!
//! Used in synthetic mode, where the catalog is ignored and every message gets
//! one of three canned templates with made-up sources.

use crate::models::{ChatRequest, ChatResponse, SourceRef};
use rand::Rng;

/// Template family for a synthetic answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// "Processing your query", all requested sources.
    Processing,
    /// "I analyzed your question", up to three sources.
    Analysis,
    /// "Based on the information in document [1]", up to two sources.
    Technical,
}

impl Variant {
    /// All variants, in selection order.
    pub const ALL: [Self; 3] = [Self::Processing, Self::Analysis, Self::Technical];

    /// Number of sources this variant cites for a requested count.
    #[must_use]
    pub fn source_limit(self, requested: usize) -> usize {
        match self {
            Self::Processing => requested,
            Self::Analysis => requested.min(3),
            Self::Technical => requested.min(2),
        }
    }

    /// Highest page number this variant cites.
    #[must_use]
    pub const fn max_page(self) -> u32 {
        match self {
            Self::Processing => 10,
            Self::Analysis => 5,
            Self::Technical => 8,
        }
    }

    fn answer(self, request: &ChatRequest, source_count: usize) -> String {
        let message = &request.message;
        let graph_rag = request.use_graph_rag;
        let contradictions = request.detect_contradictions;
        match self {
            Self::Processing => format!(
                "Processing your query: \"{message}\". This response was generated with \
                 {source_count} sources. Graph RAG: {graph_rag}, Contradiction Detection: \
                 {contradictions}. According to our analysis, please see document [1] for \
                 detailed specifications and document [2] for compliance requirements."
            ),
            Self::Analysis => format!(
                "I analyzed your question about \"{message}\" using {source_count} document \
                 sources. The system is configured with Graph RAG: {graph_rag} and \
                 contradiction detection: {contradictions}. Based on documents [1] and [2], \
                 the key findings indicate..."
            ),
            Self::Technical => format!(
                "Based on the information in document [1], I can confirm that {message} is \
                 addressed in detail. Additionally, document [2] provides supplementary \
                 information regarding this topic. The analysis shows consistent findings \
                 across both sources."
            ),
        }
    }

    fn title(self, n: usize) -> String {
        match self {
            Self::Processing => format!("Source Document {n}"),
            Self::Analysis => format!("Analysis Report {n}"),
            Self::Technical => format!("Technical Specification {n}"),
        }
    }

    fn snippet(self, n: usize, message: &str) -> String {
        match self {
            Self::Processing => {
                format!("Relevant content from source document {n} related to your query: \"{message}\".")
            },
            Self::Analysis => {
                format!("Detailed analysis from report {n} showing relevant findings for query: \"{message}\".")
            },
            Self::Technical => format!(
                "Technical details from document {n} related to: \"{message}\". Important \
                 specifications and guidelines are outlined."
            ),
        }
    }
}

/// Builds a synthetic answer.
///
/// # Arguments
///
/// * `rng` - Random source for the variant, pages, and scores.
/// * `request` - The chat request; its message and toggles are echoed.
/// * `source_count` - Effective source count (already defaulted and capped).
/// * `id` - Response id, normally the current time in milliseconds.
pub fn synthesize<R: Rng + ?Sized>(
    rng: &mut R,
    request: &ChatRequest,
    source_count: usize,
    id: u64,
) -> ChatResponse {
    let variant = Variant::ALL[rng.random_range(0..Variant::ALL.len())];

    let sources = (1..=variant.source_limit(source_count))
        .map(|n| SourceRef {
            id: n as u64,
            title: variant.title(n),
            url: format!("/test/{n}.pdf"),
            page: rng.random_range(1..=variant.max_page()),
            snippet: variant.snippet(n, &request.message),
            score: round_score(rng.random_range(0.1..=1.0)),
        })
        .collect();

    ChatResponse {
        id,
        answer: variant.answer(request, source_count),
        sources,
    }
}

/// Rounds to two decimals, like the scores the viewer displays.
fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
