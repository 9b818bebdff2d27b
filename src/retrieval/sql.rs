//! Client for the structured-data (SQL) retrieval service.

use super::{RetrievalFailure, ToolEnvelope};
use crate::error::Result;
use std::time::Duration;
use tracing::{debug, instrument};

/// Service name used in envelope messages and logs.
const SERVICE: &str = "SQL API";

/// Client for the remote natural-language-to-SQL query endpoint.
///
/// Issues one HTTP GET per question and normalizes every outcome into a
/// [`ToolEnvelope`]. No retries; at most one network attempt per call.
pub struct SqlApiClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl SqlApiClient {
    /// Default request timeout for structured-data queries (5 minutes).
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Create a client with an explicit endpoint, credential, and timeout.
    pub fn new(endpoint: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Query the service with a natural-language question.
    ///
    /// Always returns an envelope; failures are folded into it rather than
    /// propagated.
    #[instrument(skip(self))]
    pub async fn query(&self, question: &str) -> ToolEnvelope {
        debug!("Calling {} at {}", SERVICE, self.endpoint);
        match self.fetch(question).await {
            Ok(envelope) => envelope,
            Err(failure) => failure.into_envelope(SERVICE, question),
        }
    }

    async fn fetch(&self, question: &str) -> std::result::Result<ToolEnvelope, RetrievalFailure> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("user_query", question)])
            .header("access_token", &self.access_token)
            .send()
            .await
            .map_err(RetrievalFailure::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(RetrievalFailure::Network)?;

        if !status.is_success() {
            return Err(RetrievalFailure::Protocol { status, body });
        }

        let parsed: serde_json::Value = serde_json::from_str(&body).map_err(|source| RetrievalFailure::Decode {
            body: body.clone(),
            source,
        })?;

        // The service wraps its payload in a `result` field; pass it through verbatim.
        let result = parsed.get("result").cloned().ok_or(RetrievalFailure::Unexpected {
            body,
            detail: "missing `result` field".to_string(),
        })?;

        Ok(ToolEnvelope::success(question, result))
    }
}
