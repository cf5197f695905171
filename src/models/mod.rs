mod batch;
mod config;
mod format;
mod record;

pub use batch::{Batch, Chunk, UpsertOutcome};
pub use config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_MAX_CHUNKS, DEFAULT_NAMESPACE, DEFAULT_RETRIES,
    DEFAULT_SOURCE_PATH, DEFAULT_TIMEOUT_SECS, SourceConfig, UpsertConfig,
};
pub use format::OutputFormat;
pub use record::{FieldValue, Record};
