//! Relay server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use fruitscan_core::config::{RelayConfig, API_KEY_ENV};
use fruitscan_core::relay::Relay;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3040")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// TOML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Upstream model id (overrides config and environment)
    #[arg(long)]
    pub model: Option<String>,

    /// Reject model output that does not match the diagnosis schema
    #[arg(long)]
    pub strict: bool,

    /// Seconds to wait for the AI gateway before giving up
    #[arg(long)]
    pub upstream_timeout: Option<u64>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (implies --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config =
        RelayConfig::load(args.config.as_deref()).context("Failed to load relay config")?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if args.strict {
        config.strict_schema = true;
    }
    if let Some(secs) = args.upstream_timeout {
        config.upstream_timeout_secs = Some(secs);
    }
    tracing::debug!(?config, "Resolved relay config");

    println!();
    println!("  {} {}", "Fruitscan".cyan().bold(), "Analysis Relay".bold());
    println!();
    println!(
        "  {}  http://{}:{}/analyze-fruit",
        "Endpoint".green(),
        args.host,
        args.port
    );
    println!("  {}     {}", "Model".green(), config.model);
    if config.api_key().is_none() {
        println!(
            "  {} {} is not set; every analysis will fail",
            "!".yellow(),
            API_KEY_ENV
        );
    }
    if config.relay_token.is_some() {
        println!("  {}      bearer token required", "Auth".green());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let relay = Relay::with_http_gateway(config);
    fruitscan_web::run_server(relay, &args.host, args.port).await?;

    Ok(())
}
