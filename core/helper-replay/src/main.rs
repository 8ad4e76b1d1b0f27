//! orochi-helper: offline driver for the review helper engine.
//!
//! Stands in for the browser as the notification source, so host-page
//! sessions can be scripted and inspected without a page.
//!
//! ## Subcommands
//!
//! - `replay`: Replays a JSON trace and prints a JSON report
//! - `check`: Runs the response heuristics on a file
//! - `config`: Prints the effective configuration

mod check;
mod logging;
mod replay;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orochi-helper")]
#[command(about = "Review helper engine, driven offline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a host-page trace through the engine
    Replay {
        /// JSON trace file
        #[arg(value_name = "TRACE")]
        trace: PathBuf,

        /// Config file (defaults to ~/.orochi-helper/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the response heuristics on a code or markdown file
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Apply the Python-specific checks
        #[arg(long)]
        python: bool,

        /// Task language field, e.g. "Programming Language: Python"
        #[arg(long)]
        language: Option<String>,

        /// Label of a task page button (repeatable); any mentioning Python
        /// enables the Python checks
        #[arg(long = "button-label", value_name = "LABEL")]
        button_labels: Vec<String>,

        /// Alignment score shown in the feedback section
        #[arg(long, allow_hyphen_values = true)]
        score: Option<i32>,

        /// The conversation is marked for rework
        #[arg(long)]
        rework: bool,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn print_config(config_path: Option<PathBuf>) -> Result<(), String> {
    let config = helper_core::load_config(config_path)?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| format!("Failed to render config: {}", e))?;
    print!("{rendered}");
    Ok(())
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay { trace, config } => replay::run(&trace, config),
        Commands::Check {
            file,
            python,
            language,
            button_labels,
            score,
            rework,
            config,
        } => check::run(
            &file,
            check::CheckOptions {
                python,
                language,
                button_labels,
                score,
                rework,
            },
            config,
        ),
        Commands::Config { config } => print_config(config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "orochi-helper failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
