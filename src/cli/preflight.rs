//! Pre-flight checks before talking to remote services.
//!
//! Validates credentials and endpoint configuration before starting a turn
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{ArthaError, Result};
use url::Url;

/// Run pre-flight checks for answering questions.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(settings: &Settings) -> Result<()> {
    check_openai_api_key()?;
    settings.retrieval.resolve_access_token()?;
    check_endpoint("retrieval.sql_endpoint", &settings.retrieval.sql_endpoint)?;
    check_endpoint("retrieval.vector_endpoint", &settings.retrieval.vector_endpoint)?;
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ArthaError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(ArthaError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that a configured endpoint is a valid http(s) URL.
fn check_endpoint(key: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| ArthaError::Config(format!("{} is not a valid URL ({}): {}", key, endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ArthaError::Config(format!(
            "{} must use http or https, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_endpoint_accepts_http() {
        assert!(check_endpoint("k", "http://localhost:8074/query").is_ok());
        assert!(check_endpoint("k", "https://api.example.com/search").is_ok());
    }

    #[test]
    fn test_check_endpoint_rejects_garbage() {
        assert!(check_endpoint("k", "not a url").is_err());
        assert!(check_endpoint("k", "ftp://example.com").is_err());
    }
}
