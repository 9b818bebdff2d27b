//! Remote retrieval clients.
//!
//! Two thin HTTP clients back the agent's tools: [`SqlApiClient`] for
//! structured economic data and [`VectorSearchClient`] for semantic document
//! search. Both normalize every outcome into a [`ToolEnvelope`] through the
//! same failure mapping, so a call never propagates an error past the client
//! boundary.

mod envelope;
mod sql;
mod vector;

pub use envelope::{EnvelopeStatus, Snippet, ToolEnvelope};
pub use sql::SqlApiClient;
pub use vector::VectorSearchClient;

use serde_json::Value;
use tracing::warn;

/// Failure taxonomy shared by both clients.
///
/// `Network` covers unreachable hosts and timeouts, `Protocol` non-2xx
/// statuses, `Decode` malformed JSON bodies, and `Unexpected` everything
/// else (such as a well-formed body missing an expected field).
#[derive(Debug)]
pub(crate) enum RetrievalFailure {
    Network(reqwest::Error),
    Protocol { status: reqwest::StatusCode, body: String },
    Decode { body: String, source: serde_json::Error },
    Unexpected { body: String, detail: String },
}

impl RetrievalFailure {
    /// Convert the failure into an error envelope for the given service.
    pub(crate) fn into_envelope(self, service: &str, question: &str) -> ToolEnvelope {
        match self {
            RetrievalFailure::Network(e) => {
                warn!("{} unreachable: {}", service, e);
                ToolEnvelope::error(question, format!("Failed to connect to {}: {}", service, e), None)
            }
            RetrievalFailure::Protocol { status, body } => {
                warn!("{} returned HTTP {}: {}", service, status, preview(&body));
                ToolEnvelope::error(
                    question,
                    format!("Failed to connect to {}: HTTP status {}", service, status),
                    None,
                )
            }
            RetrievalFailure::Decode { body, source } => {
                warn!("{} sent a malformed JSON body: {}", service, source);
                ToolEnvelope::error(
                    question,
                    format!("Failed to decode JSON response from {}.", service),
                    Some(Value::String(body)),
                )
            }
            RetrievalFailure::Unexpected { body, detail } => {
                warn!("{} response was unusable: {}", service, detail);
                ToolEnvelope::error(question, "An unexpected error occurred.", Some(Value::String(body)))
            }
        }
    }
}

/// Truncate a response body for log output.
fn preview(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    }
}
