mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chawk_users::BlackboardClient;
use clap::Parser;

use crate::commands::Command;
use crate::config::{AppConfig, CliOverrides};

/// User management for Blackboard Learn over its REST API
#[derive(Parser)]
#[command(name = "chawk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Learn server root (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Token cache file (overrides config)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Print effective configuration (YAML, secret redacted) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML -> 3) env (CHAWK__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides {
        base_url: cli.base_url,
        token_file: cli.token_file,
    });

    logging::init(&config.logging, cli.verbose);

    if cli.print_config {
        print!("{}", config.to_redacted_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let command = cli.command.unwrap_or(Command::Check);
    commands::precheck(&command)?;

    let client = BlackboardClient::connect(&config.learn)
        .await
        .context("failed to set up Learn client")?;
    tracing::debug!("dispatching command");

    let ok = commands::run(&client, command).await?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
