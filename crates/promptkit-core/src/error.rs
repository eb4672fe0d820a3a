//! Error types for console I/O and prompt execution.

use crate::prompt::PromptState;
use thiserror::Error;

/// Boxed error returned by user callbacks (validators, progress steps,
/// search closures).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Console operation errors.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors surfaced by a prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The interrupt key (or a cancel key) was pressed. The terminal has
    /// already been restored; the caller decides whether to exit.
    #[error("Prompt cancelled")]
    Cancelled,

    /// `value()` was called before the prompt was submitted.
    #[error("Prompt has not been submitted (state: {0:?})")]
    NotSubmitted(PromptState),

    /// A user callback failed. The terminal has already been restored.
    #[error("Callback failed: {0}")]
    Callback(#[source] BoxError),

    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// Terminal input reached end of file before the prompt finished.
    #[error("Input closed before the prompt finished")]
    InputClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid transition from {from:?} on {event}")]
    InvalidTransition { from: PromptState, event: &'static str },
}

impl PromptError {
    /// Wrap a callback failure.
    pub fn callback(error: impl Into<BoxError>) -> Self {
        PromptError::Callback(error.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptError::Cancelled)
    }
}

/// Result type for prompt operations.
pub type PromptResult<T> = Result<T, PromptError>;
