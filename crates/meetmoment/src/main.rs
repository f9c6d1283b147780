// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MeetMoment - AI content generation for the matching backend.
//!
//! This is the binary entry point. Each subcommand runs one generation
//! operation and prints the result as JSON on stdout.

mod commands;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// MeetMoment - AI content generation for the matching backend.
#[derive(Parser, Debug)]
#[command(name = "meetmoment", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Caller identity recorded in logs.
    #[arg(long, global = true, default_value = "cli")]
    subject: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract interest tags from text.
    Tags {
        /// Text to analyze.
        content: String,
    },
    /// Send one message to a persona.
    Chat {
        message: String,
        /// Persona tag (e.g. 温柔, lively). Unknown values use the default persona.
        #[arg(long)]
        persona: Option<String>,
        /// Conversation context entry, `key=value`. Repeatable.
        #[arg(long = "context", value_parser = commands::parse_context_entry)]
        context: Vec<(String, String)>,
    },
    /// Score a profile and suggest improvements.
    Analyze {
        #[arg(long, default_value_t = 0)]
        age: u32,
        #[arg(long, default_value = "")]
        occupation: String,
        #[arg(long, default_value = "")]
        bio: String,
        /// Repeatable.
        #[arg(long = "interest")]
        interests: Vec<String>,
        /// Photo URL. Repeatable.
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
    /// Image task operations.
    #[command(subcommand)]
    Image(ImageCommands),
    /// Generate a portrait from a short description and wait for it.
    Portrait { description: String },
}

#[derive(Subcommand, Debug)]
enum ImageCommands {
    /// Create a task and print its id.
    Create { prompt: String },
    /// Print the current state of a task.
    Query { task_id: String },
    /// Create a task and wait for the image URL.
    Generate {
        prompt: String,
        /// Overall wait budget in seconds. Defaults to `image.wait_budget_secs`.
        #[arg(long)]
        budget_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => meetmoment_config::load_and_validate_path(path),
        None => meetmoment_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            meetmoment_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);

    let cancel = shutdown::install_signal_handler();
    match commands::run(cli.command, &cli.subject, &config, &cancel).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("meetmoment={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chat_with_context() {
        let cli = Cli::try_parse_from([
            "meetmoment",
            "chat",
            "你好",
            "--persona",
            "温柔",
            "--context",
            "mood=开心",
            "--context",
            "city=杭州",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                message,
                persona,
                context,
            } => {
                assert_eq!(message, "你好");
                assert_eq!(persona.as_deref(), Some("温柔"));
                assert_eq!(
                    context,
                    vec![
                        ("mood".to_string(), "开心".to_string()),
                        ("city".to_string(), "杭州".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_nested_image_command() {
        let cli = Cli::try_parse_from([
            "meetmoment",
            "--subject",
            "user-9",
            "image",
            "generate",
            "海边",
            "--budget-secs",
            "60",
        ])
        .unwrap();
        assert_eq!(cli.subject, "user-9");
        assert!(matches!(
            cli.command,
            Commands::Image(ImageCommands::Generate {
                budget_secs: Some(60),
                ..
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = meetmoment_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.log.level, "info");
    }
}
