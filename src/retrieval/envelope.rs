//! Uniform success/error envelope returned by the retrieval clients.
//!
//! Every client call normalizes into a [`ToolEnvelope`] so the agent loop
//! always receives a well-formed JSON observation, whether the remote call
//! succeeded or not.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a retrieval call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Uniform result wrapper for both retrieval clients.
///
/// Invariants: `Error` implies `message` is populated and `data` is either
/// null or the raw diagnostic text from the service; `Success` implies `data`
/// holds the normalized payload and `message` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    pub status: EnvelopeStatus,
    pub question: String,
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolEnvelope {
    /// Create a success envelope with a normalized payload.
    pub fn success(question: impl Into<String>, data: Value) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            question: question.into(),
            data: Some(data),
            message: None,
        }
    }

    /// Create an error envelope with a human-readable message and optional
    /// raw diagnostic text.
    pub fn error(question: impl Into<String>, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            question: question.into(),
            data,
            message: Some(message.into()),
        }
    }

    /// Whether the envelope is a success.
    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }

    /// Serialize the envelope to a JSON string for use as a tool observation.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"status":"error","question":{:?},"data":null,"message":"Failed to serialize tool result."}}"#,
                self.question
            )
        })
    }
}

/// Minimal document hit kept from a search result.
///
/// All other fields of a raw hit (`distance`, `page`, `reference`,
/// `cross_score`) are discarded. Field defaults mirror the upstream API
/// contract for absent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default = "default_content")]
    pub content: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_date")]
    pub date: String,
}

fn default_content() -> String {
    "No Title".to_string()
}

fn default_source() -> String {
    "No URL".to_string()
}

fn default_date() -> String {
    "No Date".to_string()
}
