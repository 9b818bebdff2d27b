//! Client for the semantic document-search service.

use super::{RetrievalFailure, Snippet, ToolEnvelope};
use crate::error::Result;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Service name used in envelope messages and logs.
const SERVICE: &str = "Vector Search API";

/// Client for the remote top-N semantic search endpoint.
///
/// Issues one HTTP POST per question and flattens each hit of
/// `retrieved_results` into a [`Snippet`], preserving order. Failure
/// handling follows the same contract as [`super::SqlApiClient`].
pub struct VectorSearchClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl VectorSearchClient {
    /// Default request timeout for document searches (1 minute).
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Create a client with an explicit endpoint, credential, and timeout.
    pub fn new(endpoint: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Search documents with a natural-language question or keywords.
    ///
    /// Always returns an envelope; failures are folded into it rather than
    /// propagated.
    #[instrument(skip(self))]
    pub async fn search(&self, question: &str) -> ToolEnvelope {
        debug!("Calling {} at {}", SERVICE, self.endpoint);
        match self.fetch(question).await {
            Ok(envelope) => envelope,
            Err(failure) => failure.into_envelope(SERVICE, question),
        }
    }

    async fn fetch(&self, question: &str) -> std::result::Result<ToolEnvelope, RetrievalFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("access_token", &self.access_token)
            .json(&json!({ "question": question }))
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

        let hits = parsed
            .get("retrieved_results")
            .cloned()
            .ok_or_else(|| RetrievalFailure::Unexpected {
                body: body.clone(),
                detail: "missing `retrieved_results` field".to_string(),
            })?;

        // Narrow each hit down to content/source/date, dropping ranking fields.
        let snippets: Vec<Snippet> =
            serde_json::from_value(hits).map_err(|e| RetrievalFailure::Unexpected {
                body,
                detail: format!("unusable `retrieved_results`: {}", e),
            })?;

        let data = serde_json::to_value(&snippets).map_err(|e| RetrievalFailure::Unexpected {
            body: String::new(),
            detail: format!("failed to reserialize snippets: {}", e),
        })?;

        Ok(ToolEnvelope::success(question, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::EnvelopeStatus;
    use serde_json::Value;

    fn client(server: &mockito::ServerGuard) -> VectorSearchClient {
        VectorSearchClient::new(
            &format!("{}/search-topN", server.url()),
            "test-token",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_flattens_hits_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search-topN")
            .match_header("access_token", "test-token")
            .match_body(mockito::Matcher::Json(json!({"question": "monetary policy"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"retrieved_results": [
                    {"content": "Repo rate held at 6.5%", "source": "rbi.org.in", "date": "2023-08-10",
                     "distance": 0.12, "page": 3, "reference": "mpc-aug", "cross_score": 0.91},
                    {"content": "CPI eased to 5.0%", "source": "mospi.gov.in", "date": "2023-09-12",
                     "distance": 0.29, "page": 1, "reference": "cpi-sep", "cross_score": 0.77}
                ]}"#,
            )
            .create_async()
            .await;

        let envelope = client(&server).search("monetary policy").await;

        mock.assert_async().await;
        assert_eq!(envelope.status, EnvelopeStatus::Success);

        let snippets: Vec<Snippet> = serde_json::from_value(envelope.data.unwrap()).unwrap();
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].content, "Repo rate held at 6.5%");
        assert_eq!(snippets[0].source, "rbi.org.in");
        assert_eq!(snippets[1].date, "2023-09-12");
    }

    #[tokio::test]
    async fn test_search_snippet_keys_are_exactly_three() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search-topN")
            .with_status(200)
            .with_body(r#"{"retrieved_results": [{"content": "c", "distance": 0.5}]}"#)
            .create_async()
            .await;

        let envelope = client(&server).search("q").await;

        let hits = envelope.data.unwrap();
        let hit = hits.as_array().unwrap()[0].as_object().unwrap().clone();
        let mut keys: Vec<&String> = hit.keys().collect();
        keys.sort();
        assert_eq!(keys, ["content", "date", "source"]);
        assert_eq!(hit["source"], "No URL");
        assert_eq!(hit["date"], "No Date");
    }

    #[tokio::test]
    async fn test_search_empty_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search-topN")
            .with_status(200)
            .with_body(r#"{"retrieved_results": []}"#)
            .create_async()
            .await;

        let envelope = client(&server).search("q").await;

        assert_eq!(envelope.status, EnvelopeStatus::Success);
        assert_eq!(envelope.data, Some(json!([])));
    }

    #[tokio::test]
    async fn test_search_http_error_yields_error_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search-topN")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let envelope = client(&server).search("q").await;

        assert_eq!(envelope.status, EnvelopeStatus::Error);
        assert_eq!(envelope.data, None);
        assert!(envelope
            .message
            .unwrap()
            .contains("Failed to connect to Vector Search API"));
    }

    #[tokio::test]
    async fn test_search_invalid_json_yields_raw_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search-topN")
            .with_status(200)
            .with_body("oops")
            .create_async()
            .await;

        let envelope = client(&server).search("q").await;

        assert_eq!(envelope.status, EnvelopeStatus::Error);
        assert_eq!(envelope.data, Some(Value::String("oops".to_string())));
    }

    #[tokio::test]
    async fn test_search_missing_results_field_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search-topN")
            .with_status(200)
            .with_body(r#"{"hits": []}"#)
            .create_async()
            .await;

        let envelope = client(&server).search("q").await;

        assert_eq!(envelope.status, EnvelopeStatus::Error);
        assert_eq!(envelope.message.as_deref(), Some("An unexpected error occurred."));
    }
}
