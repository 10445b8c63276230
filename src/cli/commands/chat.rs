//! Interactive chat command with tool calling support.

use super::Workspace;
use crate::agent::{Conversation, TurnController, TurnOutcome};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run the interactive chat command.
pub async fn run_chat(
    project: Option<&Path>,
    save: bool,
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
    let mut chat = ChatSession::new(controller);

    println!("\n{}", style("Clipagent Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about your clips, or 'exit' to quit. Use 'clear' to reset the conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            chat.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        match chat.send_message(input).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => Output::error(&format!("Error: {}", e)),
        }
    }

    workspace.finish(save)
}

/// Print tool activity followed by the assistant's reply.
pub(super) fn print_outcome(outcome: &TurnOutcome) {
    for call in &outcome.tool_calls {
        Output::tool_call(call);
    }
    println!("\n{} {}\n", style("Clipagent:").cyan().bold(), outcome.content);
}

/// Interactive chat session over one conversation.
struct ChatSession {
    controller: TurnController,
    conversation: Conversation,
}

impl ChatSession {
    fn new(controller: TurnController) -> Self {
        Self {
            controller,
            conversation: Conversation::new(),
        }
    }

    /// Start a fresh conversation. Project changes already made are kept.
    fn clear_history(&mut self) {
        self.conversation = Conversation::new();
    }

    async fn send_message(&mut self, user_input: &str) -> crate::error::Result<TurnOutcome> {
        let spinner = Output::spinner("Thinking...");
        let outcome = self
            .controller
            .run_turn(&mut self.conversation, user_input)
            .await;
        spinner.finish_and_clear();
        outcome
    }
}
