/// Error taxonomy for the annotation store and library index.
///
/// Nothing here is fatal to the process: every error is scoped to the
/// single operation that raised it, and the caller decides how to report it.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// A required path or setting has not been configured yet.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// A record line did not match the expected field layout.
    ///
    /// Loads skip malformed lines and continue; this surfaces only when a
    /// single record is decoded directly.
    #[error("malformed record in {path} (line {line}): {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// An interactively supplied page number is outside the valid range.
    /// Raised only at the presentation boundary, never inside the stores.
    #[error("invalid page number {given}: expected a value between 1 and {max}")]
    Validation { given: i64, max: usize },

    /// Filesystem failure (permissions, disk full, ...) propagated as-is.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] csv::Error),
}
