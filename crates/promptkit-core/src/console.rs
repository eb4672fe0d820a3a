//! Console input/output abstraction traits and types
//!
//! Prompts never talk to a file descriptor directly. They go through a
//! [`Terminal`], which pairs one [`ConsoleInput`] with one [`ConsoleOutput`].
//! The Unix backend and the scripted mock in `promptkit-io` both implement
//! these traits.

use crate::ansi;
use crate::error::ConsoleResult;
use crate::key::KeyToken;
use crate::renderer::Frame;
use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Height used when the terminal size cannot be determined.
pub const DEFAULT_TERMINAL_HEIGHT: usize = 24;

/// Console input interface
pub trait ConsoleInput: Send + Sync {
    /// Enable raw terminal mode with automatic restoration
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard>;

    /// Block until at least one key is available and return the whole batch.
    ///
    /// Returns `Ok(None)` once input is closed.
    fn read_keys(&self) -> ConsoleResult<Option<Vec<KeyToken>>>;

    /// Current terminal window size as (columns, rows)
    fn get_window_size(&self) -> ConsoleResult<(u16, u16)>;

    /// Install interrupt handling for a region of code that does not read keys
    /// (e.g. a progress callback). Dropping the guard restores the previous
    /// handling.
    fn interrupt_guard(&self) -> ConsoleResult<InterruptGuard>;
}

/// Console output interface
pub trait ConsoleOutput: Send + Sync {
    /// Write text at current cursor position
    fn write_text(&self, text: &str) -> ConsoleResult<()>;

    /// Move cursor relative to current position
    fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()>;

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()>;

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()>;

    /// Flush buffered output to terminal
    fn flush(&self) -> ConsoleResult<()>;

    /// Called with every frame the renderer draws. Backends that record
    /// output for inspection override this.
    fn record_frame(&self, _frame: &Frame) {}
}

/// Screen clearing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearType {
    /// Clear entire screen
    All,
    /// Clear from cursor to end of screen
    FromCursor,
    /// Clear current line
    CurrentLine,
    /// Clear from cursor to end of line
    FromCursorToEndOfLine,
}

/// RAII guard for terminal raw mode
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
    platform_info: String,
    is_active: Arc<AtomicBool>,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: impl Into<String>) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info: platform_info.into(),
            is_active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }

    /// Restore terminal mode now instead of on drop.
    pub fn restore(mut self) {
        self.run_restore();
    }

    fn run_restore(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            self.is_active.store(false, Ordering::Relaxed);
            restore_fn();
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.run_restore();
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("platform_info", &self.platform_info)
            .field("is_active", &self.is_active())
            .finish()
    }
}

/// RAII guard for interrupt-safe regions.
///
/// While the guard lives, an interrupt (SIGINT, or a scripted interrupt in
/// tests) sets a flag instead of killing the process. Long-running loops poll
/// [`InterruptGuard::is_interrupted`] between steps.
pub struct InterruptGuard {
    interrupted: Arc<AtomicBool>,
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
}

impl InterruptGuard {
    pub fn new<F>(interrupted: Arc<AtomicBool>, restore_fn: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            interrupted,
            restore_fn: Some(Box::new(restore_fn)),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

impl std::fmt::Debug for InterruptGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptGuard")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

/// One input paired with one output.
pub struct Terminal {
    input: Box<dyn ConsoleInput>,
    output: Box<dyn ConsoleOutput>,
}

impl Terminal {
    pub fn new(input: Box<dyn ConsoleInput>, output: Box<dyn ConsoleOutput>) -> Self {
        Self { input, output }
    }

    pub fn input(&self) -> &dyn ConsoleInput {
        self.input.as_ref()
    }

    pub fn output(&self) -> &dyn ConsoleOutput {
        self.output.as_ref()
    }

    /// Terminal width in columns, falling back to 80.
    pub fn width(&self) -> usize {
        match self.input.get_window_size() {
            Ok((cols, _)) if cols > 0 => cols as usize,
            _ => DEFAULT_TERMINAL_WIDTH,
        }
    }

    /// Terminal height in rows, falling back to 24.
    pub fn height(&self) -> usize {
        match self.input.get_window_size() {
            Ok((_, rows)) if rows > 0 => rows as usize,
            _ => DEFAULT_TERMINAL_HEIGHT,
        }
    }

    /// Write a block of text outside of any prompt, one `\r\n` per line.
    pub fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> ConsoleResult<()> {
        for line in lines {
            self.output.write_text(line.as_ref())?;
            self.output.write_text(ansi::LINE_END)?;
        }
        self.output.flush()
    }
}

/// Text styling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub dim: bool,
    pub reverse: bool,
}

/// Terminal colors for text styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    Rgb(u8, u8, u8),
    Ansi256(u8),
}

impl Color {
    fn sgr(self, background: bool) -> String {
        let base = if background { 40 } else { 30 };
        match self {
            Color::Black => base.to_string(),
            Color::Red => (base + 1).to_string(),
            Color::Green => (base + 2).to_string(),
            Color::Yellow => (base + 3).to_string(),
            Color::Blue => (base + 4).to_string(),
            Color::Magenta => (base + 5).to_string(),
            Color::Cyan => (base + 6).to_string(),
            Color::White => (base + 7).to_string(),
            Color::Gray => (base + 60).to_string(),
            Color::Rgb(r, g, b) => format!("{};2;{r};{g};{b}", base + 8),
            Color::Ansi256(n) => format!("{};5;{n}", base + 8),
        }
    }
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn on(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// SGR parameter list for this style, e.g. `"1;31"`.
    pub fn sgr_params(&self) -> String {
        let mut codes: Vec<String> = Vec::new();
        for (enabled, code) in [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.reverse, "7"),
            (self.strikethrough, "9"),
        ] {
            if enabled {
                codes.push(code.to_string());
            }
        }
        if let Some(fg) = self.foreground {
            codes.push(fg.sgr(false));
        }
        if let Some(bg) = self.background {
            codes.push(bg.sgr(true));
        }
        codes.join(";")
    }

    /// Wrap `text` in this style's escape codes.
    ///
    /// Returns `text` unchanged when the style is empty or colors are disabled.
    pub fn paint(&self, text: &str) -> String {
        let params = self.sgr_params();
        if params.is_empty() || text.is_empty() || !colors_enabled() {
            return text.to_string();
        }
        format!("\x1b[{params}m{text}{}", ansi::RESET_STYLE)
    }
}

const COLOR_AUTO: u8 = 0;
const COLOR_ON: u8 = 1;
const COLOR_OFF: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(COLOR_AUTO);

/// Whether [`TextStyle::paint`] emits escape codes.
///
/// Honours `NO_COLOR` unless overridden with [`set_colors_enabled`].
pub fn colors_enabled() -> bool {
    match COLOR_OVERRIDE.load(Ordering::Relaxed) {
        COLOR_ON => true,
        COLOR_OFF => false,
        _ => std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty()),
    }
}

/// Force styling on or off, or pass `None` to follow `NO_COLOR` again.
pub fn set_colors_enabled(enabled: Option<bool>) {
    let value = match enabled {
        Some(true) => COLOR_ON,
        Some(false) => COLOR_OFF,
        None => COLOR_AUTO,
    };
    COLOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Strips terminal control sequences from untrusted text.
///
/// CSI, OSC and DCS sequences are dropped entirely; other C0 controls are
/// dropped except tab, line feed and carriage return.
#[derive(Debug, Clone)]
pub struct SafeTextFilter {
    state: FilterState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Normal,
    Escape,
    Csi,
    OscString,
    DcsString,
}

impl SafeTextFilter {
    pub fn new() -> Self {
        SafeTextFilter {
            state: FilterState::Normal,
        }
    }

    /// Filter `input`. State carries over between calls so a sequence split
    /// across two chunks is still removed.
    pub fn filter(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        for c in input.chars() {
            if self.keep(c) {
                output.push(c);
            }
        }
        output
    }

    /// Remove styling and control sequences from a single string.
    ///
    /// ```
    /// use promptkit_core::console::SafeTextFilter;
    ///
    /// assert_eq!(SafeTextFilter::strip("\x1b[1;31mred\x1b[0m"), "red");
    /// ```
    pub fn strip(input: &str) -> String {
        SafeTextFilter::new().filter(input)
    }

    fn keep(&mut self, c: char) -> bool {
        match self.state {
            FilterState::Normal => match c {
                '\x1b' => {
                    self.state = FilterState::Escape;
                    false
                }
                '\t' | '\n' | '\r' => true,
                '\x00'..='\x1f' | '\x7f' | '\u{9b}' => false,
                _ => true,
            },
            FilterState::Escape => {
                self.state = match c {
                    '[' => FilterState::Csi,
                    ']' => FilterState::OscString,
                    'P' => FilterState::DcsString,
                    _ => FilterState::Normal,
                };
                false
            }
            FilterState::Csi => {
                if ('\x40'..='\x7e').contains(&c) {
                    self.state = FilterState::Normal;
                }
                false
            }
            FilterState::OscString => {
                match c {
                    '\x07' => self.state = FilterState::Normal,
                    '\x1b' => self.state = FilterState::Escape,
                    _ => {}
                }
                false
            }
            FilterState::DcsString => {
                if c == '\x1b' {
                    self.state = FilterState::Escape;
                }
                false
            }
        }
    }
}

impl Default for SafeTextFilter {
    fn default() -> Self {
        Self::new()
    }
}
