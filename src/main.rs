//! Clipagent CLI entry point.

use anyhow::Result;
use clap::Parser;
use clipagent::cli::{commands, Cli, Commands};
use clipagent::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("clipagent={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    let project = cli.project.as_deref();

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Chat { model } => {
            commands::run_chat(project, cli.save, model.clone(), settings).await?;
        }

        Commands::Ask { message, model } => {
            commands::run_ask(project, cli.save, message, model.clone(), settings).await?;
        }

        Commands::Tools { name, args } => {
            commands::run_tools(project, cli.save, name.as_deref(), args.as_deref(), settings)
                .await?;
        }

        Commands::Review {
            min_score,
            min_hook,
            require_complete,
            max,
            dry_run,
        } => {
            let mut criteria = settings.review_criteria();
            if let Some(min_score) = min_score {
                criteria.min_score = *min_score;
            }
            if let Some(min_hook) = min_hook {
                criteria.min_hook_strength = *min_hook;
            }
            criteria.require_complete |= *require_complete;
            if max.is_some() {
                criteria.max_to_accept = *max;
            }
            commands::run_review(project, cli.save, &criteria, *dry_run)?;
        }

        Commands::Compile {
            minutes,
            vibe,
            transition,
        } => {
            commands::run_compile(project, cli.save, *minutes, *vibe, *transition, &settings)?;
        }

        Commands::Analyze { clip_id } => {
            commands::run_analyze(project, clip_id, &settings)?;
        }

        Commands::Detect { settings: job_settings } => {
            commands::run_detect(project, job_settings.as_deref(), &settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
