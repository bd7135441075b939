//! Error types for token acquisition.

use std::io;

/// Result type alias for token acquisition.
pub type Result<T> = std::result::Result<T, Error>;

/// Token acquisition errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The refresh command could not be started.
    #[error("Unable to run refresh command: {0}")]
    RefreshCommandFailed(#[source] io::Error),

    /// The refresh command produced no token on its first line.
    #[error("Refresh command returned an empty string")]
    EmptyToken,

    /// Reading the refresh command output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
