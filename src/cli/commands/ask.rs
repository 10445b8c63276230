//! Ask command implementation.

use super::chat::print_outcome;
use super::Workspace;
use crate::agent::Conversation;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the ask command: one turn, then exit.
pub async fn run_ask(
    project: Option<&Path>,
    save: bool,
    message: &str,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Chat, project, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let workspace = Workspace::open(project)?;
    let controller = workspace.controller(settings, model)?;
    let mut conversation = Conversation::new();

    let spinner = Output::spinner("Thinking...");
    match controller.run_turn(&mut conversation, message).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            print_outcome(&outcome);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Assistant request failed: {}", e));
            return Err(e.into());
        }
    }

    workspace.finish(save)
}
