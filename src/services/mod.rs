//! Pipeline stages, from raw rows to accepted upserts.

pub mod builder;
pub mod chunk_id;
pub mod grouper;
pub mod normalizer;
pub mod pipeline;
pub mod splitter;
pub mod upsert;

pub use builder::{build_batches, record_to_chunk};
pub use chunk_id::{derive_chunk_id, disambiguate_chunk_ids};
pub use grouper::{DocumentGroup, derive_doc_id, group_records, resolve_namespace};
pub use normalizer::{is_missing, normalize_meta_value};
pub use pipeline::{Plan, PlannedRequest, PushOptions, PushStats, plan, push};
pub use splitter::split_batch;
pub use upsert::{HttpTransport, UpsertClient, UpsertFailure, UpsertResponse, UpsertTransport};
