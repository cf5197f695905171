//! CLI module for push-index.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Push precomputed embeddings into the index service.
#[derive(Debug, Parser)]
#[command(name = "push-index")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build batches from the source and upsert them
    Push(commands::PushArgs),

    /// Show the requests a push would send, without sending them
    Plan(commands::PlanArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_push_flags() {
        let cli = Cli::try_parse_from([
            "push-index",
            "--format",
            "json",
            "push",
            "--source",
            "rows.jsonl",
            "--retries",
            "4",
            "--max-chunks",
            "50",
            "--timeout",
            "2.5",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.batch.source.as_deref(), Some(std::path::Path::new("rows.jsonl")));
                assert_eq!(args.retries, Some(4));
                assert_eq!(args.batch.max_chunks, Some(50));
                assert_eq!(args.timeout, Some(2.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
