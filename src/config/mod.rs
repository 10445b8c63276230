//! Configuration module for Clipagent.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AssistantPrompts, HookPrompts, Prompts};
pub use settings::{
    AnalysisSettings, AssistantSettings, CompilationSettings, DetectionSettings,
    GeneralSettings, PromptSettings, ProviderSettings, ReviewSettings, Settings,
};
