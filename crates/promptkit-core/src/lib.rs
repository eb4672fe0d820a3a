//! Promptkit Core Library
//!
//! This crate provides the platform-independent engine behind promptkit's
//! interactive prompts: decoding raw terminal input into key tokens, editing a
//! single line of text, scrolling a list window, wrapping text to the terminal
//! width, driving a prompt through its lifecycle, and redrawing frames with
//! minimal terminal output. Console backends live in `promptkit-io`.

pub mod key;
pub mod decoder;
pub mod sequence_matcher;

// Text editing and layout
pub mod text_buffer;
pub mod unicode;
pub mod viewport;
pub mod wrap;

pub mod behavior;
pub mod error;

// Console I/O abstraction
pub mod ansi;
pub mod console;

// Rendering
pub mod renderer;

// Prompt lifecycle
pub mod prompt;

// Re-export commonly used types for convenience
pub use decoder::{DecoderState, KeyDecoder};
pub use key::{ControlKey, EscapeKey, KeyToken};
pub use sequence_matcher::{LongestMatch, MatchResult, SequenceMatcher};

pub use text_buffer::TextEditBuffer;
pub use unicode::{display_width, rune_count, rune_slice, truncate_with_ellipsis};
pub use viewport::Viewport;
pub use wrap::{wrap, wrap_lines};

pub use behavior::{apply_list_key, apply_text_key, value_with_cursor};
pub use error::{BoxError, ConsoleError, ConsoleResult, PromptError, PromptResult};

pub use console::{
    ClearType, Color, ConsoleInput, ConsoleOutput, InterruptGuard, RawModeGuard, SafeTextFilter,
    Terminal, TextStyle,
};

pub use renderer::{Frame, RenderEngine, RenderResult};

pub use prompt::{
    KeyContext, KeyOutcome, Prompt, PromptState, RenderContext, SubState, SubStates, Transition,
    Validator, Widget,
};
