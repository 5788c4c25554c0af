//! Content errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or reading content.
///
/// A missing document is not an error: the loader reports it as `None`.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content directory for category '{category}' not found: {path:?}")]
    MissingCategory {
        category: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Category '{category}' has no index document: {path:?}")]
    MissingIndex { category: String, path: PathBuf },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
