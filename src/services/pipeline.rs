//! End-to-end push run: build, split and send batches in order.

use std::time::Instant;

use serde::Serialize;

use crate::error::PushError;
use crate::models::{Batch, Record};
use crate::services::builder::build_batches;
use crate::services::splitter::split_batch;
use crate::services::upsert::{UpsertClient, UpsertTransport};

/// Settings that shape the batches of a run.
#[derive(Debug, Clone)]
pub struct PushOptions {
    pub default_namespace: String,
    pub max_chunks: usize,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushStats {
    pub records: usize,
    pub batches: usize,
    pub requests: usize,
    pub chunks: usize,
    pub retries: u32,
    pub duration_ms: u64,
}

/// One planned request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRequest {
    pub namespace: String,
    pub doc_id: String,
    pub chunks: usize,
    pub first_chunk_id: String,
    pub last_chunk_id: String,
}

/// What a push would send, without sending it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub records: usize,
    pub batches: usize,
    pub id_scheme_version: u32,
    pub requests: Vec<PlannedRequest>,
}

impl Plan {
    pub fn total_chunks(&self) -> usize {
        self.requests.iter().map(|r| r.chunks).sum()
    }
}

/// Build all batches, failing if a non-empty record set yields none.
fn prepare(records: &[Record], options: &PushOptions) -> Result<Vec<Batch>, PushError> {
    let batches = build_batches(records, &options.default_namespace)?;
    if batches.is_empty() && !records.is_empty() {
        return Err(PushError::NoBatches {
            records: records.len(),
        });
    }
    Ok(batches)
}

/// Compute the requests a push would send.
pub fn plan(records: &[Record], options: &PushOptions) -> Result<Plan, PushError> {
    let batches = prepare(records, options)?;

    let requests = batches
        .iter()
        .flat_map(|batch| split_batch(batch, options.max_chunks))
        .map(|part| PlannedRequest {
            chunks: part.len(),
            first_chunk_id: part.chunks.first().map(|c| c.id.clone()).unwrap_or_default(),
            last_chunk_id: part.chunks.last().map(|c| c.id.clone()).unwrap_or_default(),
            namespace: part.namespace,
            doc_id: part.doc_id,
        })
        .collect();

    Ok(Plan {
        records: records.len(),
        batches: batches.len(),
        id_scheme_version: crate::utils::ID_SCHEME_VERSION,
        requests,
    })
}

/// Build every batch, then send them one request at a time.
///
/// Any record error aborts before the first request. The first request that
/// exhausts its retries aborts the run; requests already accepted by the
/// service stay applied.
pub async fn push<T: UpsertTransport>(
    records: &[Record],
    options: &PushOptions,
    client: &UpsertClient<T>,
) -> Result<PushStats, PushError> {
    let start = Instant::now();
    let mut stats = PushStats {
        records: records.len(),
        ..Default::default()
    };

    if records.is_empty() {
        tracing::info!("no records found, nothing to do");
        return Ok(stats);
    }

    let batches = prepare(records, options)?;
    stats.batches = batches.len();
    tracing::info!(
        records = records.len(),
        batches = batches.len(),
        "built upsert batches"
    );

    for batch in &batches {
        for part in split_batch(batch, options.max_chunks) {
            match client.upsert(&part).await {
                Ok(outcome) => {
                    stats.requests += 1;
                    stats.chunks += part.len();
                    stats.retries += outcome.attempts.saturating_sub(1);
                    tracing::info!(
                        doc_id = %part.doc_id,
                        namespace = %part.namespace,
                        chunks = part.len(),
                        status = outcome.status.as_deref().unwrap_or("ok"),
                        "upsert sent"
                    );
                }
                Err(failure) => {
                    tracing::error!(
                        doc_id = %part.doc_id,
                        namespace = %part.namespace,
                        attempts = failure.attempts,
                        sent = stats.requests,
                        error = %failure.error,
                        "upsert failed, aborting run"
                    );
                    return Err(PushError::Upsert {
                        doc_id: part.doc_id,
                        namespace: part.namespace,
                        attempts: failure.attempts,
                        source: failure.error,
                    });
                }
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}
