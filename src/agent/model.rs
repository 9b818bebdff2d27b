//! Pluggable chat-completion backend for the agent loop.
//!
//! The loop itself is deterministic; which tools get called, and when the
//! conversation ends, is decided by whatever implements [`ChatModel`]. The
//! production implementation wraps the OpenAI chat-completions API; tests
//! substitute scripted models.

use crate::error::{ArthaError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionTool, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A single tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments as emitted by the model.
    pub arguments: String,
}

/// One model turn: either tool requests, a final answer, or both.
#[derive(Debug, Clone, Default)]
pub struct ModelTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolRequest>,
}

impl ModelTurn {
    /// A turn that only carries a final answer.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A turn that only requests tool invocations.
    pub fn tools(tool_calls: Vec<ToolRequest>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

/// Decision capability driving the agent loop.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next turn given the conversation so far and the available
    /// tool descriptors.
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> Result<ModelTurn>;
}

/// OpenAI-backed chat model.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Create a model with the default request timeout.
    pub fn new(model: &str) -> Self {
        Self::with_timeout(model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a model with a custom request timeout.
    pub fn with_timeout(model: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Client::with_config(OpenAIConfig::default()).with_http_client(http_client),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> Result<ModelTurn> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .tools(tools)
            .build()
            .map_err(|e| ArthaError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ArthaError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ArthaError::Agent("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolRequest {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        Ok(ModelTurn {
            content: choice.message.content,
            tool_calls,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic stand-ins for the OpenAI model.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of turns and records every request it sees.
    pub(crate) struct ScriptedModel {
        turns: Mutex<VecDeque<ModelTurn>>,
        pub(crate) seen: Mutex<Vec<Vec<ChatCompletionRequestMessage>>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(turns: Vec<ModelTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: Vec<ChatCompletionRequestMessage>,
            _tools: Vec<ChatCompletionTool>,
        ) -> Result<ModelTurn> {
            self.seen.lock().unwrap().push(messages);
            self.turns
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ArthaError::Agent("script exhausted".to_string()))
        }
    }

    /// Always fails, for exercising orchestrator fallback paths.
    pub(crate) struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn complete(
            &self,
            _messages: Vec<ChatCompletionRequestMessage>,
            _tools: Vec<ChatCompletionTool>,
        ) -> Result<ModelTurn> {
            Err(ArthaError::OpenAI("model unavailable".to_string()))
        }
    }

    /// Shorthand for a tool request with a synthetic call id.
    pub(crate) fn tool_request(id: &str, name: &str, question: &str) -> ToolRequest {
        ToolRequest {
            id: id.to_string(),
            name: name.to_string(),
            arguments: format!(r#"{{"question": "{}"}}"#, question),
        }
    }
}
