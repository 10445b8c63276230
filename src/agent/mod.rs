//! Tool-use agent engine.
//!
//! The assistant answers a user message with text and/or tool calls. Tool
//! calls are parsed against the tool table, executed one at a time against the
//! project, and their results are sent back for a summarizing continuation.

mod conversation;
mod dispatcher;
mod prompt;
mod tools;
mod turn;

pub use conversation::{ChatMessage, Conversation, ToolCall, ToolCallStatus};
pub use dispatcher::Dispatcher;
pub use prompt::{build_system_prompt, prompt_variables, top_clips_summary, StatusCounts};
pub use tools::{parse_tool_call, tool_definitions, ToolCategory, ToolCommand, ToolKind};
pub use turn::{ToolQueue, TurnController, TurnOutcome, FALLBACK_REPLY};
