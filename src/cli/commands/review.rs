//! Review command implementation.

use super::Workspace;
use crate::actions::{auto_review, ReviewCriteria};
use crate::cli::Output;
use crate::project::ClipStatus;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the review command.
pub fn run_review(
    project: Option<&Path>,
    save: bool,
    criteria: &ReviewCriteria,
    dry_run: bool,
) -> Result<()> {
    let workspace = Workspace::open(project)?;
    let summary = auto_review(workspace.project.as_ref(), criteria, dry_run)?;

    if summary.reviewed == 0 {
        Output::info("No pending clips to review.");
        return Ok(());
    }

    Output::header(if dry_run { "Review (dry run)" } else { "Review" });
    for decision in &summary.decisions {
        let mark = match decision.decision {
            ClipStatus::Accepted => style("accept").green(),
            _ => style("reject").red(),
        };
        println!(
            "  {} {} {}",
            mark,
            style(&decision.clip_id).bold(),
            style(&decision.reason).dim()
        );
    }
    println!();
    Output::kv("Reviewed", &summary.reviewed.to_string());
    Output::kv("Accepted", &summary.accepted.to_string());
    Output::kv("Rejected", &summary.rejected.to_string());

    if dry_run {
        Output::info("Dry run: no clips were changed.");
        return Ok(());
    }
    if !save {
        Output::warning("Changes were not saved. Pass --save to write them to the project.");
    }
    workspace.finish(save)
}
