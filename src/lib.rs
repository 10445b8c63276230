//! Clipagent - tool-calling assistant for video clip projects
//!
//! A conversational engine that lets an AI assistant inspect and edit a
//! clipping project: score and compare clips, trim them, batch-review them,
//! order them and assemble duration-targeted compilations.
//!
//! # Overview
//!
//! Clipagent allows you to:
//! - Chat with an assistant that acts on your clips through tools
//! - Analyze energy, speech pacing, boundaries and quality of a clip
//! - Auto-review, smart-trim and order clips
//! - Build a VOD compilation for a target duration and vibe
//!
//! # Architecture
//!
//! - `project` - Project state trait, data model and in-memory holder
//! - `analysis` - Read-only transcript analysis
//! - `actions` - Mutating algorithms (trim, review, ordering, compilation, hooks)
//! - `agent` - Tool table, dispatcher, conversation and turn controller
//! - `provider` - Assistant provider abstraction and OpenAI implementation
//! - `detection` - External clip-detection job control
//! - `ui` - Editor callbacks (seek, select, trim, play/pause)
//! - `config` - Settings and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use clipagent::agent::{tool_definitions, Conversation, Dispatcher, TurnController};
//! use clipagent::config::{Prompts, Settings};
//! use clipagent::detection::DisabledDetection;
//! use clipagent::project::MemoryProject;
//! use clipagent::provider::OpenAIProvider;
//! use clipagent::ui::ConsoleUi;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let project = Arc::new(MemoryProject::load("project.json".as_ref())?);
//!     let timeout = settings.provider_timeout();
//!     let provider = Arc::new(OpenAIProvider::new(tool_definitions(), timeout)?);
//!
//!     let dispatcher = Dispatcher::new(
//!         project,
//!         provider.clone(),
//!         Arc::new(DisabledDetection),
//!         Arc::new(ConsoleUi),
//!         settings,
//!         Prompts::default(),
//!     );
//!     let controller = TurnController::new(dispatcher, provider);
//!
//!     let mut conversation = Conversation::new();
//!     let outcome = controller
//!         .run_turn(&mut conversation, "Accept everything above 80 and trim it tight")
//!         .await?;
//!     println!("{}", outcome.content);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod agent;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod openai;
pub mod project;
pub mod provider;
pub mod ui;

pub use error::{ClipError, Result};
