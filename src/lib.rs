//! Artha - Economy Q&A Agent
//!
//! A CLI agent that answers questions about the Indian economy by delegating
//! all factual retrieval to two external services: a structured-data (SQL)
//! API and a semantic document-search API.
//!
//! The name "Artha" comes from the Sanskrit word for wealth and economic
//! prosperity.
//!
//! # Overview
//!
//! Artha allows you to:
//! - Ask one-shot questions about economic indicators and policy
//! - Hold an interactive chat session with conversation history
//! - Get answers synthesized exclusively from retrieved data, with citations
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt/policy management
//! - `retrieval` - HTTP clients for the two remote retrieval services
//! - `agent` - Tool adapters and the model-driven tool-calling loop
//! - `orchestrator` - Binds model, tools, and prompts into one Q&A surface
//!
//! # Example
//!
//! ```rust,no_run
//! use artha::config::Settings;
//! use artha::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let answer = orchestrator.answer("What is India's GDP in 2023?", &[]).await;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod retrieval;

pub use error::{ArthaError, Result};
