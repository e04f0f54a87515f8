//! CLI module for the hub
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `snapshot` - Run one page aggregate and print the result
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! homelab serve
//!
//! # Check the NAS page once from a terminal
//! homelab snapshot nas
//!
//! # Generate shell completions
//! homelab completions bash > ~/.bash_completion.d/homelab
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod snapshot;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use snapshot::handle_snapshot;

use crate::pages::Page;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "homelab.toml";

/// homelab - home-lab dashboard back end
#[derive(Parser, Debug)]
#[command(
    name = "homelab",
    version,
    about = "Aggregates media, game-server and host telemetry for a home-lab dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Aggregate one page and print it
    Snapshot(SnapshotArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "HOMELAB_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "HOMELAB_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HOMELAB_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Page to aggregate
    #[arg(value_enum)]
    pub page: Page,

    /// Print the page view model as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["homelab", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("homelab.toml"));
                assert!(args.host.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["homelab", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_snapshot_page() {
        let cli = Cli::try_parse_from(["homelab", "snapshot", "arr-full", "--json"]).unwrap();
        match cli.command {
            Commands::Snapshot(args) => {
                assert_eq!(args.page, Page::ArrFull);
                assert!(args.json);
            }
            _ => panic!("Expected Snapshot command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_page() {
        assert!(Cli::try_parse_from(["homelab", "snapshot", "settings"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["homelab", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => assert!(args.force),
            _ => panic!("Expected Config Init command"),
        }
    }
}
