//! Multi-line text input.
//!
//! The value is wrapped to the box width. Up and down move between the
//! wrapped rows and the box scrolls to keep the cursor row on screen.

use promptkit_core::behavior::placeholder_with_cursor;
use promptkit_core::{
    apply_text_key, value_with_cursor, wrap_lines, ControlKey, EscapeKey, Frame, KeyContext,
    KeyOutcome, KeyToken, PromptResult, PromptState, RenderContext, SafeTextFilter,
    TextEditBuffer, Terminal, Validator, Viewport, Widget,
};

use crate::text::DEFAULT_REQUIRED_MESSAGE;
use crate::theme::{self, BoxStyle};

/// Visible rows when none are configured.
pub const DEFAULT_ROWS: usize = 5;

pub const DEFAULT_HINT: &str = "Ctrl+D to submit";

/// Prompt for several lines of text. Enter starts a new line and Ctrl-D
/// submits.
///
/// ```no_run
/// use promptkit::TextareaPrompt;
///
/// let story = TextareaPrompt::new("Tell me a story")
///     .with_placeholder("Once upon a time...")
///     .with_rows(8)
///     .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct TextareaPrompt {
    label: String,
    hint: String,
    placeholder: String,
    buffer: TextEditBuffer,
    viewport: Viewport,
    validators: Vec<Validator<String>>,
}

impl TextareaPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: DEFAULT_HINT.to_string(),
            placeholder: String::new(),
            buffer: TextEditBuffer::new(),
            viewport: Viewport::new(1, DEFAULT_ROWS),
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Pre-fill the input with the cursor at the end.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.buffer.set_text(normalize_paste(&default.into()));
        self
    }

    /// Number of rows shown before the box scrolls.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.viewport.set_window(rows);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn required(self) -> Self {
        self.required_with(DEFAULT_REQUIRED_MESSAGE)
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.validators.push(Validator::required(message));
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.validators
            .push(Validator::check(move |value: &String| validate(value.as_str())));
        self
    }

    pub fn with_validator(mut self, validator: Validator<String>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Codepoint offset of the cursor in the value.
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn prompt(self) -> PromptResult<String> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<String> {
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }

    /// Move to the same column on the row above or below. Past the first row
    /// the cursor goes to the start, past the last row to the end.
    fn move_vertically(&mut self, down: bool, wrap_width: usize) {
        let rows = layout(self.buffer.text(), wrap_width);
        let row = cursor_row(&rows, self.buffer.cursor());
        let column = self.buffer.cursor() - rows[row].start;

        let target = match (down, row) {
            (false, 0) => return self.buffer.move_home(),
            (false, row) => row - 1,
            (true, row) if row + 1 >= rows.len() => return self.buffer.move_end(),
            (true, row) => row + 1,
        };
        let column = column.min(max_column(&rows, target));
        self.buffer.move_to(rows[target].start + column);
    }

    fn follow_cursor(&mut self, wrap_width: usize) {
        let rows = layout(self.buffer.text(), wrap_width);
        self.viewport.set_total(rows.len());
        self.viewport.select(cursor_row(&rows, self.buffer.cursor()));
    }
}

impl Widget for TextareaPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        let wrap_width = wrap_width(theme::box_width(ctx.width()));
        match key {
            KeyToken::Control(ControlKey::CtrlD) => return Ok(KeyOutcome::Submit),
            KeyToken::Control(ControlKey::Enter) => self.buffer.insert('\n'),
            KeyToken::Escape(EscapeKey::Up) | KeyToken::Control(ControlKey::CtrlP) => {
                self.move_vertically(false, wrap_width)
            }
            KeyToken::Escape(EscapeKey::Down) | KeyToken::Control(ControlKey::CtrlN) => {
                self.move_vertically(true, wrap_width)
            }
            KeyToken::Paste(text) => self.buffer.insert_str(&normalize_paste(text)),
            KeyToken::Char(c) if c.is_control() => {}
            _ => {
                apply_text_key(&mut self.buffer, key);
            }
        }
        self.follow_cursor(wrap_width);
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.buffer.text().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        let wrap_width = wrap_width(style.width);
        let rows = layout(self.buffer.text(), wrap_width);
        let cursor = self.buffer.cursor();
        let current = cursor_row(&rows, cursor);

        let mut viewport = self.viewport;
        viewport.set_total(rows.len());
        viewport.select(current);

        let mut body: Vec<String> = viewport
            .visible_range()
            .map(|index| {
                let row = &rows[index];
                match ctx.state {
                    PromptState::Submitted => theme::gray(&row.text),
                    PromptState::Cancelled if self.buffer.is_empty() => theme::dim(&self.placeholder),
                    PromptState::Cancelled => theme::strikethrough(&row.text),
                    _ if self.buffer.is_empty() && !self.placeholder.is_empty() => {
                        placeholder_with_cursor(&self.placeholder, wrap_width + 1)
                    }
                    _ if index == current => {
                        let column = (cursor - row.start).min(row.len());
                        value_with_cursor(&row.text, column, wrap_width + 1)
                    }
                    _ => row.text.clone(),
                }
            })
            .collect();
        if !ctx.state.is_terminal() {
            body.resize(viewport.window(), String::new());
        }

        let mut frame = Frame::from_lines(style.draw(&theme::scrollbar(body, &viewport, style.width)));
        if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, &self.hint) {
            frame.push(footer);
        }
        frame
    }

    fn is_empty_value(&self) -> bool {
        self.buffer.text().trim().is_empty()
    }
}

/// Wrap width inside a box body, leaving room for the cursor cell and the
/// scrollbar.
fn wrap_width(inner: usize) -> usize {
    inner.saturating_sub(3).max(1)
}

/// Pasted text with control sequences removed. Line breaks are kept.
fn normalize_paste(text: &str) -> String {
    SafeTextFilter::strip(text)
        .replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            '\t' => ' ',
            c => c,
        })
        .collect()
}

/// One wrapped row of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    /// Codepoint offset of the first character in the whole value.
    start: usize,
    text: String,
}

impl Row {
    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn end(&self) -> usize {
        self.start + self.len()
    }
}

/// Split `value` into display rows: one or more per hard line, wrapped to
/// `width` columns. A space a line was broken at belongs to neither row.
fn layout(value: &str, width: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in value.split('\n') {
        let mut byte = 0;
        let mut broke_at_space = false;
        for piece in wrap_lines(line, width) {
            let rest = &line[byte..];
            let text = if rest.starts_with(piece.as_str()) {
                piece
            } else {
                rest.to_string()
            };
            rows.push(Row {
                start: line_start + line[..byte].chars().count(),
                text,
            });
            byte += rows.last().map_or(0, |row| row.text.len());
            broke_at_space = line[byte..].starts_with(' ');
            if broke_at_space {
                byte += 1;
            }
            if byte >= line.len() {
                break;
            }
        }

        let line_len = line.chars().count();
        // A trailing space the wrap broke at opens an empty row for the cursor.
        if broke_at_space && byte >= line.len() {
            rows.push(Row {
                start: line_start + line_len,
                text: String::new(),
            });
        }
        line_start += line_len + 1;
    }
    rows
}

/// Index of the row holding codepoint offset `cursor`.
fn cursor_row(rows: &[Row], cursor: usize) -> usize {
    rows.iter().rposition(|row| row.start <= cursor).unwrap_or(0)
}

/// Last column the cursor may take on `rows[index]`. A row cut mid-word
/// continues directly on the next row, so its end offset belongs there.
fn max_column(rows: &[Row], index: usize) -> usize {
    let row = &rows[index];
    match rows.get(index + 1) {
        Some(next) if next.start == row.end() && row.len() > 0 => row.len() - 1,
        _ => row.len(),
    }
}
