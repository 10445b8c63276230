//! Init command - interactive first-run setup.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Clipagent Setup");
    println!();
    println!("Welcome to Clipagent! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if preflight::check_api_key().is_err() {
        Output::warning("OPENAI_API_KEY environment variable is not set.");
        println!();
        println!("  The assistant and hook regeneration need an OpenAI API key.");
        println!("  Review, compile, analyze and tools work without one.");
        println!(
            "  Get your API key from: {}",
            style("https://platform.openai.com/api-keys").underlined()
        );
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'clipagent init' again.");
            return Ok(());
        }
    } else {
        Output::success("OpenAI API key is configured!");
    }

    println!();

    // Step 2: Clip detection
    println!("{}", style("Step 2: Clip detection").bold().cyan());
    println!();

    match &settings.detection.command {
        None => Output::info("No detection command configured; run_detection will be unavailable."),
        Some(command) if command_on_path(command) => {
            Output::success(&format!("Detection command found: {}", command))
        }
        Some(command) => Output::warning(&format!(
            "Detection command '{}' was not found on PATH.",
            command
        )),
    }

    println!();

    // Step 3: Data directory
    println!("{}", style("Step 3: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 4: Create config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("clipagent config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} See what the assistant can do", style("clipagent tools").cyan());
    println!(
        "  {} Review clips by score",
        style("clipagent -p project.json review --dry-run").cyan()
    );
    println!(
        "  {} Talk to the assistant",
        style("clipagent -p project.json chat").cyan()
    );
    println!();
    println!("For more help: {}", style("clipagent --help").cyan());

    Ok(())
}

/// Whether `command` is an existing path or resolves on `PATH`.
fn command_on_path(command: &str) -> bool {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
