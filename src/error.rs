//! Error types for the deduplication builder

use thiserror::Error;

/// Deduplication errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing {0} rule: configure it before running a terminal operation")]
    MissingRule(&'static str),
}

/// Result type alias for deduplication operations
pub type Result<T> = std::result::Result<T, Error>;
