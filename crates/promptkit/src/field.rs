//! Single-line text input shared by every widget that accepts typing.

use promptkit_core::behavior::placeholder_with_cursor;
use promptkit_core::{apply_text_key, value_with_cursor, KeyToken, TextEditBuffer};

use crate::theme;

#[derive(Debug, Clone, Default)]
pub struct TextField {
    buffer: TextEditBuffer,
    placeholder: String,
    mask: Option<char>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Draw every character as `mask`.
    pub fn masked(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn value(&self) -> &str {
        self.buffer.text()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.buffer.set_text(value);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Edit with the default bindings. Returns whether the text or cursor
    /// may have changed.
    pub fn handle_key(&mut self, key: &KeyToken) -> bool {
        match key {
            // Control characters never become part of the value.
            KeyToken::Char(c) if c.is_control() => false,
            _ => apply_text_key(&mut self.buffer, key),
        }
    }

    fn display_text(&self) -> String {
        match self.mask {
            Some(mask) => std::iter::repeat(mask).take(self.buffer.len()).collect(),
            None => self.buffer.text().to_string(),
        }
    }

    /// The value with a visible cursor, or the placeholder when empty.
    pub fn render_active(&self, max_width: usize) -> String {
        if self.buffer.is_empty() && !self.placeholder.is_empty() {
            return placeholder_with_cursor(&self.placeholder, max_width);
        }
        value_with_cursor(&self.display_text(), self.buffer.cursor(), max_width)
    }

    /// The value without a cursor, for submitted and cancelled frames.
    pub fn render_plain(&self) -> String {
        self.display_text()
    }

    /// The value struck through, or the placeholder dimmed when empty.
    pub fn render_cancelled(&self) -> String {
        if self.buffer.is_empty() {
            theme::dim(&self.placeholder)
        } else {
            theme::strikethrough(&self.display_text())
        }
    }
}
