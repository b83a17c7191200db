//! Analysis command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use fruitscan_core::client::{RelayClient, DEFAULT_RELAY_URL, RELAY_URL_ENV};
use fruitscan_core::config::RELAY_TOKEN_ENV;
use fruitscan_core::error::ClientError;

use crate::acquire;
use crate::output;

#[derive(Args)]
#[command(group(clap::ArgGroup::new("image").required(true).args(["source", "sample"])))]
pub struct AnalyzeArgs {
    /// Image file path or http(s) URL
    pub source: Option<String>,

    /// Analyze a built-in sample (see `fruitscan samples`)
    #[arg(long)]
    pub sample: Option<String>,

    /// Relay base URL
    #[arg(long, env = RELAY_URL_ENV, default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// Bearer token for the relay
    #[arg(long, env = RELAY_TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let source = match (&args.sample, &args.source) {
        (Some(name), _) => {
            let sample = acquire::find_sample(name).ok_or_else(|| {
                anyhow::anyhow!("Unknown sample '{}'. Run 'fruitscan samples' to list them.", name)
            })?;
            sample.url.to_string()
        }
        (None, Some(source)) => source.clone(),
        (None, None) => anyhow::bail!("Provide an image path, URL or --sample"),
    };

    println!("{} Loading image: {}", "→".dimmed(), source);
    let image = acquire::load_image(&source)
        .await
        .context("Failed to load image")?;

    let mut client = RelayClient::new(&args.relay_url);
    if let Some(token) = args.token {
        client = client.with_token(token);
    }

    println!("{} Analyzing via {}", "→".dimmed(), client.endpoint());
    let analyzed = match client.analyze(&image).await {
        Ok(analyzed) => analyzed,
        Err(e) if e.is_advisory() => {
            println!("{} {}", "!".yellow(), e);
            return Ok(());
        }
        Err(ClientError::Relay { message, .. }) => {
            anyhow::bail!("{}", message);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analyzed.result)?);
        return Ok(());
    }

    output::print_result(&analyzed.result);
    Ok(())
}
