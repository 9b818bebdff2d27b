//! Agent runner with tool calling loop.

use super::model::{ChatModel, ToolRequest};
use super::tools::{parse_tool_call, tool_definitions, ToolContext, SQL_TOOL_NAME, VECTOR_TOOL_NAME};
use crate::error::{ArthaError, Result};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionToolType, FunctionCall,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Reminder injected when the dual-call policy is enforced and the model
/// answers before consulting both retrieval tools.
const BOTH_TOOLS_NUDGE: &str = "You have not yet consulted both retrieval tools. \
    Before giving your final answer, also call the remaining tool and use its \
    result to verify or enrich the answer.";

/// Agent that answers questions by calling the retrieval tools.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
    require_both_tools: bool,
}

impl Agent {
    /// Create a new agent with the given model, tool context, and policy prompt.
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolContext, system_prompt: &str) -> Self {
        Self {
            model,
            tools,
            max_iterations: 10,
            system_prompt: system_prompt.to_string(),
            require_both_tools: false,
        }
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Enforce the dual-call policy with a single corrective nudge.
    pub fn with_require_both_tools(mut self, require: bool) -> Self {
        self.require_both_tools = require;
        self
    }

    /// Run the agent on a task, with optional prior conversation turns.
    ///
    /// Tool calls within a turn run sequentially; there is no parallelism
    /// and no retry. The loop ends when the model emits a turn without tool
    /// calls, or errors out past `max_iterations`.
    pub async fn run(
        &self,
        task: &str,
        history: &[ChatCompletionRequestMessage],
    ) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| ArthaError::Agent(e.to_string()))?
                .into(),
        ];
        messages.extend_from_slice(history);
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| ArthaError::Agent(e.to_string()))?
                .into(),
        );

        let mut iterations = 0;
        let mut nudged = false;
        let mut tool_calls_made: Vec<ToolCallRecord> = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(ArthaError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}, {} messages", iterations, messages.len());

            let turn = self
                .model
                .complete(messages.clone(), tool_definitions())
                .await?;

            if turn.tool_calls.is_empty() {
                let content = turn.content.unwrap_or_default();

                if self.require_both_tools && !nudged && !both_tools_used(&tool_calls_made) {
                    info!("Final answer arrived before both tools were consulted; nudging once");
                    nudged = true;
                    messages.push(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(content)
                            .build()
                            .map_err(|e| ArthaError::Agent(e.to_string()))?
                            .into(),
                    );
                    messages.push(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(BOTH_TOOLS_NUDGE)
                            .build()
                            .map_err(|e| ArthaError::Agent(e.to_string()))?
                            .into(),
                    );
                    continue;
                }

                return Ok(AgentResponse {
                    content,
                    tool_calls: tool_calls_made,
                    iterations,
                });
            }

            // Echo the model's tool requests into the transcript.
            let requested: Vec<ChatCompletionMessageToolCall> = turn
                .tool_calls
                .iter()
                .map(|call| ChatCompletionMessageToolCall {
                    id: call.id.clone(),
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect();
            messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(requested)
                    .build()
                    .map_err(|e| ArthaError::Agent(e.to_string()))?
                    .into(),
            );

            for call in &turn.tool_calls {
                let record = self.execute_tool_call(call).await;

                messages.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| ArthaError::Agent(e.to_string()))?
                        .into(),
                );

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool request and return a record of it.
    async fn execute_tool_call(&self, call: &ToolRequest) -> ToolCallRecord {
        info!("Agent calling tool: {} with args: {}", call.name, call.arguments);

        let result = match parse_tool_call(&call.name, &call.arguments) {
            Ok(tool) => self.tools.execute(&tool).await,
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
        }
    }
}

/// Whether both retrieval tools appear in the call records.
fn both_tools_used(records: &[ToolCallRecord]) -> bool {
    let sql = records.iter().any(|r| r.name == SQL_TOOL_NAME);
    let vector = records.iter().any(|r| r.name == VECTOR_TOOL_NAME);
    sql && vector
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (model calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Serialized envelope returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
