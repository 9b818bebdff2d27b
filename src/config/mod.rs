//! Configuration module for Artha.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    AgentSettings, GeneralSettings, RetrievalSettings, Settings, ACCESS_TOKEN_ENV,
};
