//! CLI module for Clipagent.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::actions::Vibe;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clipagent - tool-calling assistant for video clip projects
///
/// Chat with an assistant that analyzes, trims, reviews and compiles the clips
/// of a project snapshot.
#[derive(Parser, Debug)]
#[command(name = "clipagent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Project snapshot (JSON) to work on
    #[arg(short, long, global = true, env = "CLIPAGENT_PROJECT")]
    pub project: Option<PathBuf>,

    /// Write changes back to the project snapshot when the command finishes
    #[arg(long, global = true)]
    pub save: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Clipagent and write a default configuration
    Init,

    /// Interactive chat with the clip assistant
    Chat {
        /// Chat model to use (defaults to config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Send a single message to the assistant
    Ask {
        /// The message to send
        message: String,

        /// Chat model to use (defaults to config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the assistant's tools, or run one directly
    Tools {
        /// Tool to run (lists all tools when omitted)
        name: Option<String>,

        /// Tool arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Accept or reject pending clips by score thresholds
    Review {
        /// Minimum final score to accept
        #[arg(long)]
        min_score: Option<f64>,

        /// Minimum hook strength to accept
        #[arg(long)]
        min_hook: Option<f64>,

        /// Reject clips that are not complete thoughts
        #[arg(long)]
        require_complete: bool,

        /// Accept at most this many clips
        #[arg(long)]
        max: Option<usize>,

        /// Show decisions without changing any clip
        #[arg(long)]
        dry_run: bool,
    },

    /// Build a compilation close to a target duration
    Compile {
        /// Target duration in minutes
        minutes: f64,

        /// Ordering vibe (chronological, high-energy, building, best-moments-interspersed)
        #[arg(long)]
        vibe: Option<Vibe>,

        /// Seconds of transition between clips
        #[arg(long)]
        transition: Option<f64>,
    },

    /// Quality, speech and boundary analysis for one clip
    Analyze {
        /// Clip ID
        clip_id: String,
    },

    /// Run the external clip-detection command on the project's media
    Detect {
        /// Detection settings as a JSON object
        #[arg(short, long)]
        settings: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_parses_vibe() {
        let cli = Cli::parse_from([
            "clipagent",
            "--project",
            "p.json",
            "compile",
            "10",
            "--vibe",
            "high_energy",
        ]);
        assert_eq!(cli.project, Some(PathBuf::from("p.json")));
        match cli.command {
            Commands::Compile { minutes, vibe, .. } => {
                assert_eq!(minutes, 10.0);
                assert_eq!(vibe, Some(Vibe::HighEnergy));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["clipagent", "review", "--dry-run", "-vv", "--save"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.save);
    }
}
