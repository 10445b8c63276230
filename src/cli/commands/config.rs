//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::{Prompts, Settings};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run the config command against `--config` or the default location.
pub fn run_config(action: &ConfigAction, settings: Settings, path: Option<&str>) -> Result<()> {
    let config_path = path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str =
                toml::to_string_pretty(&settings).context("Failed to serialize config")?;
            println!("{}", toml_str);

            if let Err(e) = Prompts::load(
                settings.prompts.custom_dir.as_deref(),
                Some(&settings.prompts.variables),
            ) {
                Output::warning(&format!("Custom prompts could not be loaded: {}", e));
            }
        }

        ConfigAction::Edit => edit(&config_path, &settings)?,

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

fn edit(config_path: &PathBuf, settings: &Settings) -> Result<()> {
    if !config_path.exists() {
        settings.save_to(config_path)?;
        Output::info(&format!("Created default config at {}", config_path.display()));
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    Output::info(&format!("Opening config in {}...", editor));

    match std::process::Command::new(&editor).arg(config_path).status() {
        Ok(s) if s.success() => {
            match Settings::load_from(Some(config_path)) {
                Ok(_) => Output::success("Config saved."),
                Err(e) => Output::warning(&format!("Config saved but does not parse: {}", e)),
            }
        }
        Ok(_) => Output::warning("Editor exited with non-zero status."),
        Err(e) => {
            Output::error(&format!("Failed to open editor: {}", e));
            Output::info(&format!("Config file is at: {}", config_path.display()));
        }
    }
    Ok(())
}
