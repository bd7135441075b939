//! Error types for the core library.

use thiserror::Error;

use crate::account::AccountType;
use crate::prompt::PromptError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection URL has no host.
    #[error("URL has no host")]
    MissingHost,

    /// Connection URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A credential is needed but prompting is disabled.
    #[error("Credential required but prompting is disabled")]
    NonInteractive,

    /// The user aborted a prompt or it could not be shown.
    #[error("Prompt failed: {0}")]
    PromptFailed(#[from] PromptError),

    /// OAuth was requested but no refresh command is configured.
    #[error("No OAuth refresh command defined for {0}")]
    NoRefreshCommand(AccountType),

    /// Running the refresh command or reading its token failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] mailacct_oauth::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
