//! botgen CLI entry point.
//!
//! Binary name: `botgen`
//!
//! Parses CLI arguments, sets up tracing, resolves the backend configuration,
//! then dispatches to the interactive form or the one-shot create command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use botgen_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "botgen", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.backend_url.clone()).await?;

    match cli.command {
        Commands::Form => cli::form::run_form(&state).await?,

        Commands::Create(args) => cli::create::create_bot(&state, args, cli.json).await?,

        Commands::Config => show_config(&state, cli.json)?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn show_config(state: &AppState, json: bool) -> anyhow::Result<()> {
    let backend_url = state.config.base_url().ok();

    if json {
        let config = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config_file": state.config_path().display().to_string(),
            "backend_url": backend_url,
            "upload_timeout_secs": state.config.upload_timeout_secs,
            "create_timeout_secs": state.config.create_timeout_secs,
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!();
    println!(
        "  {}  {}",
        style("Backend URL:").bold(),
        match backend_url {
            Some(url) => style(url.to_string()).cyan(),
            None => style("(not set -- use BACKEND_URL or --backend-url)".to_string()).yellow(),
        }
    );
    println!(
        "  {}  {}s",
        style("Upload timeout:").bold(),
        state.config.upload_timeout_secs
    );
    println!(
        "  {}  {}s",
        style("Create timeout:").bold(),
        state.config.create_timeout_secs
    );
    println!(
        "  {}  {}",
        style("Config file:").bold(),
        style(state.config_path().display()).dim()
    );
    println!();

    Ok(())
}
