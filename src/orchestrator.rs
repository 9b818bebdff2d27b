//! Question-answering orchestrator.
//!
//! Binds the chat model, the two retrieval tools, and the policy prompts
//! into a single surface: one question in, one answer string out.

use crate::agent::{Agent, AgentResponse, ChatModel, OpenAiChatModel, ToolContext};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::retrieval::{SqlApiClient, VectorSearchClient};
use async_openai::types::ChatCompletionRequestMessage;
use std::sync::Arc;
use tracing::error;

/// Fixed user-visible reply when a turn fails for any reason.
pub const FALLBACK_ANSWER: &str = "Sorry, I encountered an error while processing your request.";

/// The main orchestrator for answering economy questions.
pub struct Orchestrator {
    agent: Agent,
    prompts: Prompts,
}

impl Orchestrator {
    /// Create an orchestrator backed by the OpenAI chat model from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let model = Arc::new(OpenAiChatModel::new(&settings.agent.model));
        Self::with_model(settings, model)
    }

    /// Create an orchestrator with an injected decision model.
    pub fn with_model(settings: Settings, model: Arc<dyn ChatModel>) -> Result<Self> {
        let access_token = settings.retrieval.resolve_access_token()?;

        let sql = SqlApiClient::new(
            &settings.retrieval.sql_endpoint,
            &access_token,
            settings.retrieval.sql_timeout(),
        )?;
        let vector = VectorSearchClient::new(
            &settings.retrieval.vector_endpoint,
            &access_token,
            settings.retrieval.vector_timeout(),
        )?;

        let agent = Agent::new(model, ToolContext::new(sql, vector), &settings.prompts.system)
            .with_max_iterations(settings.agent.max_iterations)
            .with_require_both_tools(settings.agent.require_both_tools);

        Ok(Self {
            agent,
            prompts: settings.prompts,
        })
    }

    /// Answer a question, surfacing errors and the tool-call trace.
    pub async fn try_answer(
        &self,
        question: &str,
        history: &[ChatCompletionRequestMessage],
    ) -> Result<AgentResponse> {
        let task = self.prompts.render_task(question);
        self.agent.run(&task, history).await
    }

    /// Answer a question, collapsing any failure into the fixed fallback.
    ///
    /// Partial results are not surfaced and nothing is retried.
    pub async fn answer(&self, question: &str, history: &[ChatCompletionRequestMessage]) -> String {
        match self.try_answer(question, history).await {
            Ok(response) => response.content,
            Err(e) => {
                error!("Agent run failed: {}", e);
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{tool_request, FailingModel, ScriptedModel};
    use crate::agent::{ModelTurn, SQL_TOOL_NAME, VECTOR_TOOL_NAME};

    fn settings_for(server: &mockito::ServerGuard) -> Settings {
        let mut settings = Settings::default();
        settings.retrieval.sql_endpoint = format!("{}/query", server.url());
        settings.retrieval.vector_endpoint = format!("{}/search-topN", server.url());
        settings.retrieval.access_token = Some("test-token".to_string());
        settings.retrieval.sql_timeout_secs = 2;
        settings.retrieval.vector_timeout_secs = 2;
        settings
    }

    #[tokio::test]
    async fn test_answer_falls_back_on_model_failure() {
        let server = mockito::Server::new_async().await;
        let orchestrator = Orchestrator::with_model(settings_for(&server), Arc::new(FailingModel)).unwrap();

        let answer = orchestrator.answer("What is India's GDP in 2023?", &[]).await;

        assert_eq!(answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_gdp_question_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::UrlEncoded(
                "user_query".into(),
                "What is India's GDP in 2023?".into(),
            ))
            .match_header("access_token", "test-token")
            .with_status(200)
            .with_body(r#"{"result": {"gdp": 3.7}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/search-topN")
            .match_header("access_token", "test-token")
            .with_status(200)
            .with_body(r#"{"retrieved_results": []}"#)
            .create_async()
            .await;

        let model = Arc::new(ScriptedModel::new(vec![
            ModelTurn::tools(vec![
                tool_request("call-1", SQL_TOOL_NAME, "What is India's GDP in 2023?"),
                tool_request("call-2", VECTOR_TOOL_NAME, "India GDP 2023"),
            ]),
            ModelTurn::answer("India's GDP in 2023 was 3.7, as retrieved from the SQL database."),
        ]));

        let orchestrator = Orchestrator::with_model(settings_for(&server), model).unwrap();
        let response = orchestrator
            .try_answer("What is India's GDP in 2023?", &[])
            .await
            .unwrap();

        // The only numeric fact available came from the SQL payload.
        assert!(response.content.contains("3.7"));
        assert!(response.content.contains("SQL database"));
        assert!(response.tool_calls[0].result.contains(r#""gdp":3.7"#));
        assert!(response.tool_calls[1].result.contains(r#""data":[]"#));
    }

    #[tokio::test]
    async fn test_missing_access_token_is_config_error() {
        let server = mockito::Server::new_async().await;
        let mut settings = settings_for(&server);
        settings.retrieval.access_token = None;

        if std::env::var(crate::config::ACCESS_TOKEN_ENV).is_err() {
            assert!(Orchestrator::with_model(settings, Arc::new(FailingModel)).is_err());
        }
    }
}
