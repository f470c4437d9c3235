use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::SourceTag;

/// Errors surfaced by the extraction and reporting layers.
///
/// Per-file problems never appear here: the walker and extractors skip and
/// log those. A bad source root is fatal only for that source's extraction
/// call; serialization failures are fatal to the reporting call.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("source root for '{source}' is missing or unreadable: {path}: {io}")]
    SourceRoot {
        source: SourceTag,
        path: PathBuf,
        #[source]
        io: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
