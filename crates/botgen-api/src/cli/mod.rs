//! CLI command definitions for the `botgen` binary.
//!
//! Uses clap derive macros for argument parsing. `botgen form` runs the
//! interactive form; `botgen create` runs the same steps from flags.

pub mod create;
pub mod form;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Create bots on a bot backend from a form.
#[derive(Parser)]
#[command(name = "botgen", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the bot backend.
    #[arg(long, global = true, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in the bot form interactively.
    #[command(alias = "new")]
    Form,

    /// Create a bot in one go from flags.
    Create(CreateArgs),

    /// Show the resolved backend configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Bot token (prompted securely if omitted).
    #[arg(long)]
    pub token: Option<String>,

    /// Bot name.
    #[arg(long)]
    pub name: Option<String>,

    /// Short description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Message sent when a user starts the bot.
    #[arg(long, default_value = "")]
    pub start_message: String,

    /// Message sent in reply to /help.
    #[arg(long, default_value = "")]
    pub help_message: String,

    /// System prompt.
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Read the system prompt from a file instead.
    #[arg(long, conflicts_with = "system_prompt")]
    pub system_prompt_file: Option<PathBuf>,

    /// Knowledge base document (repeatable).
    #[arg(long = "knowledge-base", value_name = "FILE")]
    pub knowledge_base: Vec<PathBuf>,

    /// Voice sample, MP3 or OGG (repeatable).
    #[arg(long = "voice-sample", value_name = "FILE")]
    pub voice_samples: Vec<PathBuf>,
}
