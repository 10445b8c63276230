//! Compile command: duration-targeted compilation of the project's clips.

use super::Workspace;
use crate::actions::{create_compilation, Vibe};
use crate::cli::output::format_duration;
use crate::cli::Output;
use crate::config::Settings;
use crate::project::format_timestamp;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the compile command.
pub fn run_compile(
    project: Option<&Path>,
    save: bool,
    minutes: f64,
    vibe: Option<Vibe>,
    transition: Option<f64>,
    settings: &Settings,
) -> Result<()> {
    let workspace = Workspace::open(project)?;
    let compilation = create_compilation(
        workspace.project.as_ref(),
        minutes,
        vibe.unwrap_or(settings.compilation.default_vibe),
        transition.unwrap_or(settings.compilation.transition_seconds),
    )?;

    Output::header(&format!("Compilation ({})", compilation.vibe));
    for (i, entry) in compilation.clips.iter().enumerate() {
        println!(
            "  {:>2}. {} {}-{} ({}) score {:.0} {}",
            i + 1,
            style(&entry.clip_id).bold(),
            style(format_timestamp(entry.start_time)).cyan(),
            style(format_timestamp(entry.end_time)).cyan(),
            format_duration(entry.duration),
            entry.final_score,
            style(entry.title.as_deref().unwrap_or_default()).dim()
        );
    }
    println!();
    Output::kv("Target", &format_duration(compilation.target_duration_seconds));
    Output::kv("Total", &format_duration(compilation.total_duration_seconds));
    Output::kv("Clips", &compilation.clip_count.to_string());
    if !compilation.newly_accepted.is_empty() {
        Output::kv("Newly accepted", &compilation.newly_accepted.join(", "));
    }
    if !compilation.returned_to_pending.is_empty() {
        Output::kv("Back to pending", &compilation.returned_to_pending.join(", "));
    }

    if !save {
        Output::warning("Changes were not saved. Pass --save to write them to the project.");
    }
    workspace.finish(save)
}
