//! Agent system: tool adapters and the model-driven tool-calling loop.
//!
//! The model decides which retrieval tools to call and when to stop; the
//! loop here executes those decisions sequentially and feeds envelope
//! observations back until a final answer arrives.

mod model;
mod runner;
mod tools;

pub use model::{ChatModel, ModelTurn, OpenAiChatModel, ToolRequest};
pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{
    parse_tool_call, tool_definitions, ToolCall, ToolContext, SQL_TOOL_NAME, VECTOR_TOOL_NAME,
};

#[cfg(test)]
pub(crate) use model::testing;
