//! Plan command: build and split batches without sending anything.

use anyhow::Result;
use clap::Args;

use super::push::{BatchArgs, load_records, resolve_config};
use crate::cli::output::get_formatter;
use crate::models::OutputFormat;
use crate::services::{PushOptions, plan};

/// Arguments for the plan command.
#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
}

pub async fn handle_plan(args: PlanArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = resolve_config(|c| args.batch.apply(c))?;
    let formatter = get_formatter(format);

    let records = load_records(&config, verbose)?;
    let options = PushOptions {
        default_namespace: config.upsert.namespace.clone(),
        max_chunks: config.upsert.max_chunks,
    };

    let plan = plan(&records, &options)?;
    print!("{}", formatter.format_plan(&plan));

    Ok(())
}
