//! CLI command implementations.

mod analyze;
mod ask;
mod chat;
mod compile;
mod config;
mod detect;
mod init;
mod review;
mod tools;

pub use analyze::run_analyze;
pub use ask::run_ask;
pub use chat::run_chat;
pub use compile::run_compile;
pub use config::run_config;
pub use detect::run_detect;
pub use init::run_init;
pub use review::run_review;
pub use tools::run_tools;

use crate::agent::{tool_definitions, Dispatcher, TurnController};
use crate::config::{Prompts, Settings};
use crate::detection::{CommandDetection, DetectionControl, DisabledDetection};
use crate::project::MemoryProject;
use crate::provider::{AssistantProvider, OpenAIProvider};
use crate::ui::ConsoleUi;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A loaded project snapshot and where it came from.
struct Workspace {
    project: Arc<MemoryProject>,
    path: PathBuf,
}

impl Workspace {
    /// Load the project snapshot named by `--project`.
    fn open(path: Option<&Path>) -> Result<Self> {
        let path = path
            .context("No project given. Pass --project <file.json> or set CLIPAGENT_PROJECT")?;
        let project = MemoryProject::load(path)
            .with_context(|| format!("Failed to load project {}", path.display()))?;
        Ok(Self {
            project: Arc::new(project),
            path: path.to_path_buf(),
        })
    }

    /// Build a dispatcher wired to OpenAI, the configured detector and the console.
    fn dispatcher(&self, settings: Settings) -> Result<(Dispatcher, Arc<dyn AssistantProvider>)> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let provider: Arc<dyn AssistantProvider> = Arc::new(OpenAIProvider::new(
            tool_definitions(),
            settings.provider_timeout(),
        )?);
        let detection: Arc<dyn DetectionControl> = match &settings.detection.command {
            Some(command) => Arc::new(CommandDetection::new(
                command.clone(),
                settings.detection.args.clone(),
            )),
            None => Arc::new(DisabledDetection),
        };

        let dispatcher = Dispatcher::new(
            self.project.clone(),
            provider.clone(),
            detection,
            Arc::new(ConsoleUi),
            settings,
            prompts,
        );
        Ok((dispatcher, provider))
    }

    /// Build a turn controller, optionally overriding the chat model.
    fn controller(&self, mut settings: Settings, model: Option<String>) -> Result<TurnController> {
        if let Some(model) = model {
            settings.provider.model = model;
        }
        let (dispatcher, provider) = self.dispatcher(settings)?;
        Ok(TurnController::new(dispatcher, provider))
    }

    /// Write the snapshot back when `--save` was given.
    fn finish(&self, save: bool) -> Result<()> {
        if save {
            self.project
                .save(&self.path)
                .with_context(|| format!("Failed to save project {}", self.path.display()))?;
            info!("Saved project to {}", self.path.display());
        }
        Ok(())
    }
}
