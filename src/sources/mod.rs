//! Record sources.
//!
//! A source yields the full set of rows at once; the pipeline never
//! streams from it.

mod json;

pub use json::JsonRecordSource;

use crate::error::SourceError;
use crate::models::Record;

/// Anything that can produce the rows of one push run.
pub trait RecordSource {
    /// Human-readable description, used in log lines.
    fn describe(&self) -> String;

    /// Read every row.
    fn load(&self) -> Result<Vec<Record>, SourceError>;
}
