//! Tools command: list the tool table or run a single tool.

use super::Workspace;
use crate::agent::{ToolCategory, ToolKind};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::{Context, Result};
use console::style;
use serde_json::Value;
use std::path::Path;

/// Run the tools command.
pub async fn run_tools(
    project: Option<&Path>,
    save: bool,
    name: Option<&str>,
    args: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let Some(name) = name else {
        list_tools();
        return Ok(());
    };

    let kind = ToolKind::from_name(name)
        .with_context(|| format!("Unknown tool '{}'. Run 'clipagent tools' to list them", name))?;
    if kind == ToolKind::RegenerateHooks {
        preflight::check(Operation::Chat, project, &settings)?;
    } else {
        preflight::check(Operation::Local, project, &settings)?;
    }

    let arguments: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("Tool arguments must be a JSON object")?,
        None => Value::Object(Default::default()),
    };

    let workspace = Workspace::open(project)?;
    let (dispatcher, _) = workspace.dispatcher(settings)?;

    match dispatcher.execute(name, &arguments).await {
        Ok(result) => Output::json(&result),
        Err(e) => {
            Output::error(&format!("{} failed: {}", name, e));
            return Err(e.into());
        }
    }

    if kind.mutates() {
        workspace.finish(save)?;
    }
    Ok(())
}

fn list_tools() {
    for (category, title) in [
        (ToolCategory::Analysis, "Analysis"),
        (ToolCategory::Action, "Actions"),
        (ToolCategory::Basic, "Basic"),
    ] {
        Output::header(title);
        for kind in ToolKind::ALL.iter().filter(|k| k.category() == category) {
            let marker = if kind.mutates() { "*" } else { " " };
            println!(
                "  {}{} {}",
                style(kind.name()).bold(),
                style(marker).yellow(),
                style(kind.description()).dim()
            );
        }
    }
    println!("\n{} changes the project", style("*").yellow());
}
