//! Keystone command-line host
//!
//! Loads a configuration file, resolves networks against the process environment and
//! prints the result the way a build or deploy tool would consume it.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "keystone")]
#[command(about = "Multi-network deployment configuration resolver")]
#[command(version)]
struct Cli {
    /// Configuration file; searched in the standard locations when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overriding RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one network and print the full configuration
    Resolve {
        #[arg(short, long, default_value = "simulated")]
        network: String,
    },
    /// Print the account index of every named role
    Accounts {
        #[arg(short, long, default_value = "simulated")]
        network: String,
    },
    /// Print the absolute project directories
    Paths {
        #[arg(short, long, default_value = "simulated")]
        network: String,
    },
    /// Resolve every declared network and summarize the outcome
    Check,
    /// Write a starter configuration
    Template {
        /// Destination file; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Resolve { network } => commands::resolve(config, &network, cli.format),
        Commands::Accounts { network } => commands::accounts(config, &network, cli.format),
        Commands::Paths { network } => commands::paths(config, &network, cli.format),
        Commands::Check => commands::check(config, cli.format),
        Commands::Template { output } => commands::template(output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "keystone",
            "accounts",
            "--network",
            "fuji",
            "--format",
            "json",
            "--config",
            "keystone.toml",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("keystone.toml")));
        assert!(matches!(cli.command, Commands::Accounts { network } if network == "fuji"));
    }
}
