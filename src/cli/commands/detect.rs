//! Detect command: run the external clip detector and wait for it.

use super::Workspace;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::detection::{CommandDetection, DetectionControl};
use crate::project::ProjectState;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Run the detect command. Ctrl-C cancels the job.
pub async fn run_detect(
    project: Option<&Path>,
    job_settings: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    preflight::check(Operation::Detect, project, settings)?;
    let command = settings
        .detection
        .command
        .clone()
        .context("No detection command configured")?;

    let job_settings: Value = match job_settings {
        Some(raw) => serde_json::from_str(raw).context("Detection settings must be JSON")?,
        None => Value::Object(Default::default()),
    };

    let workspace = Workspace::open(project)?;
    let state = workspace.project.as_ref();
    let media_path = state
        .media_path()
        .context("The project has no source media")?;

    let detection = CommandDetection::new(command, settings.detection.args.clone());
    let job_id = Uuid::new_v4().to_string();
    let start = detection
        .start(&job_id, &media_path, &job_settings, state.media_duration())
        .await?;
    if !start.success {
        let error = start
            .error
            .unwrap_or_else(|| "Detection failed to start".to_string());
        Output::error(&error);
        anyhow::bail!(error);
    }

    let spinner = Output::spinner(&format!("Detecting clips in {}...", media_path.display()));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                detection.cancel(&job_id).await?;
                Output::warning(&format!("Detection job {} cancelled.", job_id));
                return Ok(());
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                if detection.running().await == 0 {
                    break;
                }
            }
        }
    }
    spinner.finish_and_clear();

    Output::success(&format!("Detection job {} finished.", job_id));
    Ok(())
}
