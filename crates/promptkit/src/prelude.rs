//! Convenient re-exports for common use cases
//!
//! # Usage
//!
//! ```no_run
//! use promptkit::prelude::*;
//!
//! let name = text("What is your name?")?;
//! let ok = ConfirmPrompt::new(format!("Is {name} correct?")).prompt()?;
//! # Ok::<(), PromptError>(())
//! ```

pub use crate::{
    // Widgets
    ConfirmPrompt,
    DataTable,
    MultiSelectPrompt,
    Note,
    NoteKind,
    PasswordPrompt,
    PausePrompt,
    Progress,
    ProgressBar,
    SearchPrompt,
    SelectPrompt,
    SuggestPrompt,
    TableMode,
    TextPrompt,
    TextareaPrompt,
};

pub use crate::{
    // One-call helpers
    alert,
    confirm,
    error,
    info,
    intro,
    multiselect,
    note,
    outro,
    password,
    pause,
    progress,
    search,
    select,
    suggest,
    text,
    textarea,
    warning,
};

pub use promptkit_core::{
    // Engine types for custom widgets
    BoxError,
    Frame,
    KeyContext,
    KeyOutcome,
    KeyToken,
    Prompt,
    PromptError,
    PromptResult,
    PromptState,
    RenderContext,
    Terminal,
    Validator,
    Widget,
};
