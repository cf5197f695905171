//! Push command implementation.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat, Record};
use crate::services::{PushOptions, UpsertClient, push};
use crate::sources::{JsonRecordSource, RecordSource};

/// Options shared by every command that builds batches.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Path to the JSON or JSONL export with text/embedding rows
    #[arg(long, short = 's', env = "PUSH_INDEX_SOURCE")]
    pub source: Option<PathBuf>,

    /// Namespace for rows that carry none of their own
    #[arg(long, short = 'n', env = "PUSH_INDEX_NAMESPACE")]
    pub namespace: Option<String>,

    /// Maximum chunks per upsert request
    #[arg(long, env = "PUSH_INDEX_MAX_CHUNKS")]
    pub max_chunks: Option<usize>,
}

impl BatchArgs {
    /// Overlay command-line values on the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref source) = self.source {
            config.source.path = source.clone();
        }
        if let Some(ref namespace) = self.namespace {
            config.upsert.namespace = namespace.clone();
        }
        if let Some(max_chunks) = self.max_chunks {
            config.upsert.max_chunks = max_chunks;
        }
    }
}

/// Arguments for the push command.
#[derive(Debug, Args)]
pub struct PushArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Upsert endpoint of the index service
    #[arg(long, short = 'e', env = "PUSH_INDEX_ENDPOINT")]
    pub endpoint: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "PUSH_INDEX_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Additional attempts per request after a failure
    #[arg(long, env = "PUSH_INDEX_RETRIES")]
    pub retries: Option<u32>,
}

impl PushArgs {
    pub fn apply(&self, config: &mut Config) {
        self.batch.apply(config);
        if let Some(ref endpoint) = self.endpoint {
            config.upsert.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.upsert.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.upsert.retries = retries;
        }
    }
}

/// Load config, overlay arguments, validate.
pub(crate) fn resolve_config(apply: impl FnOnce(&mut Config)) -> Result<Config> {
    let mut config = Config::load().context("failed to load configuration")?;
    apply(&mut config);
    config.upsert.validate()?;
    Ok(config)
}

/// Read every row of the configured source.
pub(crate) fn load_records(config: &Config, verbose: bool) -> Result<Vec<Record>> {
    let source = JsonRecordSource::new(&config.source.path);
    let records = source
        .load()
        .with_context(|| format!("failed to read {}", source.describe()))?;

    tracing::debug!(source = %source.describe(), records = records.len(), "loaded records");
    if verbose {
        eprintln!("Read {} records from {}", records.len(), source.describe());
    }
    Ok(records)
}

/// Handle the push command.
pub async fn handle_push(args: PushArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = resolve_config(|c| args.apply(c))?;
    let formatter = get_formatter(format);

    let records = load_records(&config, verbose)?;
    if records.is_empty() {
        println!(
            "{}",
            formatter.format_message("No embeddings found, nothing to do.")
        );
        return Ok(());
    }

    let client =
        UpsertClient::from_config(&config.upsert).context("failed to create upsert client")?;
    let options = PushOptions {
        default_namespace: config.upsert.namespace.clone(),
        max_chunks: config.upsert.max_chunks,
    };

    let stats = push(&records, &options, &client).await?;

    print!("{}", formatter.format_push_stats(&stats));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = PushArgs {
            batch: BatchArgs {
                source: Some(PathBuf::from("rows.jsonl")),
                namespace: Some("notes".to_string()),
                max_chunks: None,
            },
            endpoint: Some("http://127.0.0.1:9000/index/upsert".to_string()),
            timeout: None,
            retries: Some(0),
        };

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.source.path, PathBuf::from("rows.jsonl"));
        assert_eq!(config.upsert.namespace, "notes");
        assert_eq!(config.upsert.endpoint, "http://127.0.0.1:9000/index/upsert");
        assert_eq!(config.upsert.retries, 0);
        assert_eq!(config.upsert.max_chunks, crate::models::DEFAULT_MAX_CHUNKS);
        assert_eq!(config.upsert.timeout_secs, crate::models::DEFAULT_TIMEOUT_SECS);
    }
}
