//! Single-line editable text with a codepoint cursor.
//!
//! `TextEditBuffer` only knows about codepoints. Visual width is a rendering
//! concern and lives in [`crate::unicode`].

use crate::unicode;

/// Editable text plus a cursor.
///
/// The cursor is a codepoint index and always satisfies
/// `0 <= cursor <= len()`; every operation clamps instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditBuffer {
    content: String,
    cursor: usize,
}

impl TextEditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the cursor at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let content = text.into();
        let cursor = unicode::rune_count(&content);
        Self { content, cursor }
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        unicode::rune_count(&self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Text left of the cursor.
    pub fn text_before_cursor(&self) -> &str {
        &self.content[..self.cursor_byte()]
    }

    /// Text from the cursor to the end.
    pub fn text_after_cursor(&self) -> &str {
        &self.content[self.cursor_byte()..]
    }

    /// Character under the cursor, if the cursor is not at the end.
    pub fn char_at_cursor(&self) -> Option<char> {
        self.text_after_cursor().chars().next()
    }

    /// Insert one character at the cursor and advance past it.
    ///
    /// ```
    /// use promptkit_core::text_buffer::TextEditBuffer;
    ///
    /// let mut buffer = TextEditBuffer::with_text("Jss");
    /// buffer.move_to(1);
    /// buffer.insert('e');
    /// assert_eq!(buffer.text(), "Jess");
    /// assert_eq!(buffer.cursor(), 2);
    /// ```
    pub fn insert(&mut self, c: char) {
        let at = self.cursor_byte();
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Insert a string at the cursor and advance past it.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = self.cursor_byte();
        self.content.insert_str(at, text);
        self.cursor += unicode::rune_count(text);
    }

    /// Delete the codepoint left of the cursor (Backspace).
    ///
    /// Returns the removed character, or `None` at position 0.
    pub fn delete_before(&mut self) -> Option<char> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let at = self.cursor_byte();
        Some(self.content.remove(at))
    }

    /// Delete the codepoint under the cursor (Delete).
    ///
    /// Returns the removed character, or `None` at the end of the text.
    pub fn delete_at(&mut self) -> Option<char> {
        if self.cursor >= self.len() {
            return None;
        }
        let at = self.cursor_byte();
        Some(self.content.remove(at))
    }

    /// Move the cursor to `offset`, clamped to `[0, len()]`.
    pub fn move_to(&mut self, offset: usize) {
        self.cursor = offset.min(self.len());
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.move_to(self.cursor + 1);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Move to the start of the current or previous word.
    pub fn move_word_left(&mut self) {
        self.cursor = self.word_start_before_cursor();
    }

    /// Move to the end of the current or next word.
    pub fn move_word_right(&mut self) {
        let after: Vec<char> = self.text_after_cursor().chars().collect();
        let mut offset = 0;
        while offset < after.len() && after[offset].is_whitespace() {
            offset += 1;
        }
        while offset < after.len() && !after[offset].is_whitespace() {
            offset += 1;
        }
        self.cursor += offset;
    }

    /// Delete from the start of the previous word to the cursor (Ctrl-W).
    ///
    /// Returns the deleted text.
    pub fn delete_word_before(&mut self) -> String {
        let start = self.word_start_before_cursor();
        if start == self.cursor {
            return String::new();
        }
        let start_byte = unicode::byte_index_from_rune_index(&self.content, start);
        let end_byte = self.cursor_byte();
        let deleted: String = self.content.drain(start_byte..end_byte).collect();
        self.cursor = start;
        deleted
    }

    /// Delete everything left of the cursor (Ctrl-U).
    pub fn delete_to_start(&mut self) -> String {
        let end_byte = self.cursor_byte();
        let deleted: String = self.content.drain(..end_byte).collect();
        self.cursor = 0;
        deleted
    }

    /// Delete everything from the cursor to the end (Ctrl-K).
    pub fn delete_to_end(&mut self) -> String {
        let start_byte = self.cursor_byte();
        self.content.split_off(start_byte)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replace the content and put the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.len();
    }

    fn cursor_byte(&self) -> usize {
        unicode::byte_index_from_rune_index(&self.content, self.cursor)
    }

    fn word_start_before_cursor(&self) -> usize {
        let before: Vec<char> = self.text_before_cursor().chars().collect();
        let mut pos = before.len();
        while pos > 0 && before[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !before[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }
}
