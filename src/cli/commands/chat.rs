//! Interactive chat command.
//!
//! A line-per-turn REPL over the orchestrator. Conversation history is held
//! here, in the session, and passed into each turn; the orchestrator itself
//! stays stateless.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::{ArthaError, Result};
use crate::orchestrator::Orchestrator;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs,
};
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, mut settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'artha doctor' for detailed diagnostics.");
        return Err(e);
    }

    if let Some(model) = model {
        settings.agent.model = model;
    }

    let orchestrator = Orchestrator::new(settings)?;
    let mut session = ChatSession::new(orchestrator);

    println!("\n{}", style("Artha Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about the Indian economy. Type 'quit' to exit, 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        let answer = session.send(input).await?;
        println!("\n{} {}\n", style("Artha:").cyan().bold(), answer);
    }

    Ok(())
}

/// Chat session holding conversation history across turns.
struct ChatSession {
    orchestrator: Orchestrator,
    history: Vec<ChatCompletionRequestMessage>,
    max_history: usize,
}

impl ChatSession {
    fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            history: Vec::new(),
            max_history: 30,
        }
    }

    /// Clear conversation history.
    fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drive one turn and record it in the history.
    ///
    /// Failures inside the turn surface as the orchestrator's fixed fallback
    /// answer; only local message-building errors reach the caller.
    async fn send(&mut self, input: &str) -> Result<String> {
        let answer = self.orchestrator.answer(input, &self.history).await;

        self.history.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(input.to_string())
                .build()
                .map_err(|e| ArthaError::Agent(e.to_string()))?
                .into(),
        );
        self.history.push(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(answer.clone())
                .build()
                .map_err(|e| ArthaError::Agent(e.to_string()))?
                .into(),
        );

        self.trim_history();

        Ok(answer)
    }

    /// Keep only the most recent turns.
    fn trim_history(&mut self) {
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedModel;
    use crate::agent::ModelTurn;
    use crate::orchestrator::FALLBACK_ANSWER;
    use std::sync::Arc;

    fn settings_for(server: &mockito::ServerGuard) -> Settings {
        let mut settings = Settings::default();
        settings.retrieval.sql_endpoint = format!("{}/query", server.url());
        settings.retrieval.vector_endpoint = format!("{}/search-topN", server.url());
        settings.retrieval.access_token = Some("test-token".to_string());
        settings
    }

    #[tokio::test]
    async fn test_session_accumulates_history() {
        let server = mockito::Server::new_async().await;
        let model = Arc::new(ScriptedModel::new(vec![
            ModelTurn::answer("first answer"),
            ModelTurn::answer("second answer"),
        ]));
        let orchestrator = Orchestrator::with_model(settings_for(&server), model.clone()).unwrap();
        let mut session = ChatSession::new(orchestrator);

        assert_eq!(session.send("one").await.unwrap(), "first answer");
        assert_eq!(session.send("two").await.unwrap(), "second answer");
        assert_eq!(session.history.len(), 4);

        // The second turn saw the first exchange: system + 2 history + user.
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 4);
    }

    #[tokio::test]
    async fn test_session_surfaces_fallback_and_keeps_going() {
        let server = mockito::Server::new_async().await;
        // Script exhausts after the first turn; the second collapses to fallback.
        let model = Arc::new(ScriptedModel::new(vec![ModelTurn::answer("ok")]));
        let orchestrator = Orchestrator::with_model(settings_for(&server), model).unwrap();
        let mut session = ChatSession::new(orchestrator);

        assert_eq!(session.send("one").await.unwrap(), "ok");
        assert_eq!(session.send("two").await.unwrap(), FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_clear_and_trim_history() {
        let server = mockito::Server::new_async().await;
        let turns: Vec<ModelTurn> = (0..20).map(|i| ModelTurn::answer(format!("a{}", i))).collect();
        let model = Arc::new(ScriptedModel::new(turns));
        let orchestrator = Orchestrator::with_model(settings_for(&server), model).unwrap();
        let mut session = ChatSession::new(orchestrator);
        session.max_history = 6;

        for i in 0..10 {
            session.send(&format!("q{}", i)).await.unwrap();
        }
        assert_eq!(session.history.len(), 6);

        session.clear_history();
        assert!(session.history.is_empty());
    }
}
