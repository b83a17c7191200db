//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod samples;
pub mod serve;

/// Fruitscan - fruit disease detection relay
#[derive(Parser)]
#[command(name = "fruitscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the analysis relay
    Serve(serve::ServeArgs),

    /// Analyze an image file, image URL or built-in sample
    Analyze(analyze::AnalyzeArgs),

    /// List the built-in sample images
    Samples,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Analyze(args) => analyze::execute(args).await,
            Commands::Samples => samples::execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fruitscan_core::client::{DEFAULT_RELAY_URL, RELAY_URL_ENV};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_relay_url_reads_shared_env_name() {
        let cmd = Cli::command();
        let analyze = cmd.find_subcommand("analyze").unwrap();
        let relay_url = analyze
            .get_arguments()
            .find(|a| a.get_id() == "relay_url")
            .unwrap();
        assert_eq!(relay_url.get_env(), Some(std::ffi::OsStr::new(RELAY_URL_ENV)));
        assert_eq!(
            relay_url.get_default_values().first().and_then(|v| v.to_str()),
            Some(DEFAULT_RELAY_URL)
        );
    }
}
