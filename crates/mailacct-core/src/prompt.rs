//! Interactive prompting seam.

use std::io;

/// Why a prompt produced no value.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The user aborted input.
    #[error("cancelled")]
    Cancelled,

    /// The terminal could not be read or written.
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Asks the user for credentials.
pub trait Prompter {
    /// Asks for a visible value, offering `default` as the initial answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cancels or the terminal fails.
    fn prompt_text(&self, label: &str, default: &str) -> Result<String, PromptError>;

    /// Asks for a value that is not echoed.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cancels or the terminal fails.
    fn prompt_secret(&self, label: &str) -> Result<String, PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for &P {
    fn prompt_text(&self, label: &str, default: &str) -> Result<String, PromptError> {
        (**self).prompt_text(label, default)
    }

    fn prompt_secret(&self, label: &str) -> Result<String, PromptError> {
        (**self).prompt_secret(label)
    }
}
