//! Tool adapters exposing the retrieval clients to the model.

use crate::error::{ArthaError, Result};
use crate::retrieval::{SqlApiClient, VectorSearchClient};
use serde::{Deserialize, Serialize};

/// Stable tool name for the structured-data adapter.
pub const SQL_TOOL_NAME: &str = "external_sql_api";

/// Stable tool name for the document-search adapter.
pub const VECTOR_TOOL_NAME: &str = "vector_search_api_tool";

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ToolCall {
    /// Query the structured-data service.
    #[serde(rename = "external_sql_api")]
    SqlQuery { question: String },

    /// Search the document corpus semantically.
    #[serde(rename = "vector_search_api_tool")]
    DocumentSearch { question: String },
}

/// Tool execution context holding both retrieval clients.
pub struct ToolContext {
    sql: SqlApiClient,
    vector: VectorSearchClient,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(sql: SqlApiClient, vector: VectorSearchClient) -> Self {
        Self { sql, vector }
    }

    /// Execute a tool call and return the serialized envelope.
    ///
    /// Never fails: client errors are already folded into the envelope
    /// before it is serialized, so the model always gets an observation.
    pub async fn execute(&self, tool: &ToolCall) -> String {
        match tool {
            ToolCall::SqlQuery { question } => self.sql.query(question).await.to_json(),
            ToolCall::DocumentSearch { question } => self.vector.search(question).await.to_json(),
        }
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    let question_schema = serde_json::json!({
        "type": "object",
        "properties": {
            "question": {
                "type": "string",
                "description": "A concise natural-language question to pass to the API"
            }
        },
        "required": ["question"]
    });

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: SQL_TOOL_NAME.to_string(),
                description: Some(
                    "Useful for retrieving structured Indian economic data via an external API. \
                    Input should be a concise question in natural language that can be directly \
                    passed to the SQL API (e.g., 'What is India's GDP in 2023?', 'Show unemployment \
                    rate for last 5 years'). Returns a JSON object containing the API response, \
                    including data if successful."
                        .to_string(),
                ),
                parameters: Some(question_schema.clone()),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: VECTOR_TOOL_NAME.to_string(),
                description: Some(
                    "Useful for retrieving information from unstructured Indian economic documents \
                    via an external semantic search API. Input should be a concise question or \
                    keywords in natural language (e.g., 'recent monetary policy changes', 'PLI \
                    scheme manufacturing'). Returns a JSON object containing the API response, \
                    including document snippets if successful."
                        .to_string(),
                ),
                parameters: Some(question_schema),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the model's function-call format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| ArthaError::Agent(format!("Invalid tool arguments: {}", e)))?;

    let question = args["question"]
        .as_str()
        .ok_or_else(|| ArthaError::Agent("Missing 'question' argument".to_string()))?
        .to_string();

    match name {
        SQL_TOOL_NAME => Ok(ToolCall::SqlQuery { question }),
        VECTOR_TOOL_NAME => Ok(ToolCall::DocumentSearch { question }),
        _ => Err(ArthaError::Agent(format!("Unknown tool: {}", name))),
    }
}
