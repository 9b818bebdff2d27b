//! Prompt and policy definitions for the agent.
//!
//! The system prompt is policy, not code: it tells the model when to use
//! each retrieval tool, that answers must come only from retrieved data,
//! and how to cite. It can be overridden from the TOML config.

use serde::{Deserialize, Serialize};

/// Default system prompt describing the retrieval policy.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an AI assistant specializing in Indian economic data. Answer user questions strictly by using the provided external API tools, with no reliance on your pre-trained knowledge or any context outside of the tool responses.

You have access to two tools:
1. `external_sql_api`: retrieves structured data such as specific economic indicators, historical data series, or figures stored in a database.
2. `vector_search_api_tool`: retrieves information from unstructured documents, such as policy details, analyses, and reports.

Strategy:
1. Analyze the question to determine whether it needs structured data, unstructured text, or both.
2. By default call both tools for every question: query `external_sql_api` first for numerical data, then `vector_search_api_tool` with keywords or timeframes derived from the SQL results to fetch explanatory context. If textual context is clearly the priority, you may reverse the order, but still call both.
3. Never use pre-trained knowledge. Every statement in your answer must come from the tool responses.
4. If the question is broad or a tool returns nothing useful, break it into smaller sub-queries and call the tools again.
5. Combine numerical results and document snippets in the answer, clearly differentiating the two sources.
6. Cite, for each fact, which tool provided it. For example: "as retrieved from the SQL database" or "according to the document search".

Always be clear about where your information comes from, and do not include any content not directly retrieved from the tools."#;

/// Default per-question analysis template. `{{question}}` is substituted.
const DEFAULT_TASK_TEMPLATE: &str = r#"User Question: {{question}}

Required Analysis:
1. Extract precise numerical data
2. Find relevant policy documents/explanations
3. Show how the retrieved context explains the numbers"#;

/// Prompt templates for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// System prompt carrying the tool-usage policy.
    pub system: String,
    /// Template wrapping each user question.
    pub task: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            task: DEFAULT_TASK_TEMPLATE.to_string(),
        }
    }
}

impl Prompts {
    /// Render the task template for a question.
    pub fn render_task(&self, question: &str) -> String {
        self.task.replace("{{question}}", question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_task_substitutes_question() {
        let prompts = Prompts::default();
        let task = prompts.render_task("What is India's GDP in 2023?");
        assert!(task.contains("User Question: What is India's GDP in 2023?"));
        assert!(!task.contains("{{question}}"));
    }

    #[test]
    fn test_default_system_prompt_names_both_tools() {
        let prompts = Prompts::default();
        assert!(prompts.system.contains("external_sql_api"));
        assert!(prompts.system.contains("vector_search_api_tool"));
    }

    #[test]
    fn test_custom_task_template() {
        let prompts = Prompts {
            task: "Q: {{question}}".to_string(),
            ..Default::default()
        };
        assert_eq!(prompts.render_task("hi"), "Q: hi");
    }
}
