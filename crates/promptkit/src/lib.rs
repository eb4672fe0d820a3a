//! # Promptkit: Interactive Terminal Prompts
//!
//! Promptkit provides ready-made prompts for command-line applications:
//! text, multi-line and password input, confirmations, single and multiple
//! selection, suggestions and search with live results, a paged data table,
//! progress bars, pauses and static notes. Every prompt is a builder that
//! ends in a blocking `prompt()` call returning a typed value.
//!
//! ## Quick Start
//!
//! ```no_run
//! use promptkit::prelude::*;
//!
//! let name = TextPrompt::new("What is your name?")
//!     .with_placeholder("E.g. Taylor Otwell")
//!     .required()
//!     .prompt()?;
//!
//! let role = SelectPrompt::new("What role should the user have?")
//!     .with_option("member", "Member")
//!     .with_option("admin", "Administrator")
//!     .prompt()?;
//!
//! if confirm("Send a welcome email?")? {
//!     note(&format!("Emailing {name} ({role})"))?;
//! }
//! # Ok::<(), PromptError>(())
//! ```
//!
//! ## Cancellation
//!
//! Ctrl-C cancels the active prompt. The terminal is restored, "Cancelled."
//! is drawn in place of the prompt, and the call returns
//! [`PromptError::Cancelled`]. Whether to exit the process is up to the
//! caller.
//!
//! ## Architecture
//!
//! - **Engine** (`promptkit-core`): key decoding, text editing, viewport,
//!   word wrap, the prompt state machine and the frame renderer
//! - **Platform I/O** (`promptkit-io`): raw-mode Unix terminal, mock terminal
//!   for tests, debug file logger
//! - **Widgets** (`promptkit`): the prompts themselves - this crate
//!
//! Every prompt also has a `prompt_on(&Terminal)` variant. Pair it with
//! [`fake_terminal`] to drive a prompt with scripted keys in tests.

pub use promptkit_core::{
    BoxError, ConsoleError, ConsoleResult, ControlKey, EscapeKey, Frame, KeyToken, Prompt,
    PromptError, PromptResult, PromptState, Terminal, Validator, Widget,
};

pub use promptkit_io::{fake_terminal, mock_terminal, native_terminal, typed};
pub use promptkit_io::{MockConsoleInput, MockConsoleOutput};

pub mod theme;
mod field;

pub mod confirm;
pub mod data_table;
pub mod multiselect;
pub mod note;
pub mod pause;
pub mod progress;
pub mod search;
pub mod select;
pub mod suggest;
pub mod text;
pub mod textarea;

pub mod prelude;

pub use confirm::ConfirmPrompt;
pub use data_table::{DataTable, TableMode};
pub use multiselect::MultiSelectPrompt;
pub use note::{alert, error, info, intro, note, outro, warning, Note, NoteKind};
pub use pause::PausePrompt;
pub use progress::{Progress, ProgressBar};
pub use search::SearchPrompt;
pub use select::SelectPrompt;
pub use suggest::SuggestPrompt;
pub use text::{PasswordPrompt, TextPrompt};
pub use textarea::TextareaPrompt;

/// Run `widget` to completion on `terminal` with `validators` attached.
pub(crate) fn run_widget<W: Widget>(
    widget: W,
    validators: Vec<Validator<W::Output>>,
    terminal: &Terminal,
) -> PromptResult<W::Output> {
    let mut prompt = Prompt::new(widget);
    for validator in validators {
        prompt.add_validator(validator);
    }
    prompt.run(terminal)
}

/// Open the process terminal and hand it to `f`.
pub(crate) fn with_native_terminal<T>(f: impl FnOnce(&Terminal) -> PromptResult<T>) -> PromptResult<T> {
    let terminal = native_terminal()?;
    f(&terminal)
}

/// Prompt for a line of text.
pub fn text(label: &str) -> PromptResult<String> {
    TextPrompt::new(label).prompt()
}

/// Prompt for several lines of text. Ctrl-D submits.
pub fn textarea(label: &str) -> PromptResult<String> {
    TextareaPrompt::new(label).prompt()
}

/// Prompt for a secret.
pub fn password(label: &str) -> PromptResult<String> {
    PasswordPrompt::new(label).prompt()
}

/// Ask a yes/no question, defaulting to yes.
pub fn confirm(label: &str) -> PromptResult<bool> {
    ConfirmPrompt::new(label).prompt()
}

/// Pick one of `options`, given as `(key, label)` pairs. Returns the key.
pub fn select<K, L>(label: &str, options: impl IntoIterator<Item = (K, L)>) -> PromptResult<String>
where
    K: Into<String>,
    L: Into<String>,
{
    SelectPrompt::new(label).with_options(options).prompt()
}

/// Pick any number of `options`. Returns the keys in option order.
pub fn multiselect<K, L>(
    label: &str,
    options: impl IntoIterator<Item = (K, L)>,
) -> PromptResult<Vec<String>>
where
    K: Into<String>,
    L: Into<String>,
{
    MultiSelectPrompt::new(label).with_options(options).prompt()
}

/// Prompt for text, suggesting the `options` that contain what was typed.
pub fn suggest<S>(label: &str, options: impl IntoIterator<Item = S>) -> PromptResult<String>
where
    S: Into<String>,
{
    SuggestPrompt::new(label).with_options(options).prompt()
}

/// Wait for Enter.
pub fn pause(message: &str) -> PromptResult<bool> {
    PausePrompt::new(message).prompt()
}

/// Search with `options` producing `(key, label)` results for each query.
pub fn search<F>(label: &str, options: F) -> PromptResult<String>
where
    F: Fn(&str) -> Result<Vec<(String, String)>, BoxError> + 'static,
{
    SearchPrompt::new(label, options).prompt()
}

/// Run `callback` over `items` behind a progress bar.
pub fn progress<T, R, F>(label: &str, items: Vec<T>, callback: F) -> PromptResult<Vec<R>>
where
    F: FnMut(T) -> Result<R, BoxError>,
{
    Progress::new(label, items)?.run(callback)
}
