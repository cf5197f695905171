pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;

pub use cli::{Cli, Commands};
pub use error::{PushError, RecordError, UpsertError};
pub use models::{Batch, Chunk, Config, FieldValue, OutputFormat, Record};
