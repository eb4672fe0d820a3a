//! Default key bindings shared by the widgets.
//!
//! Keys are first mapped to an action, then the action is applied to a
//! [`TextEditBuffer`] or a [`Viewport`]. Widgets call [`apply_text_key`] or
//! [`apply_list_key`] for anything they do not handle themselves.

use crate::console::{SafeTextFilter, TextStyle};
use crate::key::{ControlKey, EscapeKey, KeyToken};
use crate::text_buffer::TextEditBuffer;
use crate::unicode::{display_width, grapheme_width};
use crate::viewport::Viewport;
use unicode_segmentation::UnicodeSegmentation;

/// Editing action on a single-line text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    InsertText(String),
    DeleteBackward,
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveWordLeft,
    MoveWordRight,
    MoveToBeginning,
    MoveToEnd,
    DeleteWordBackward,
    DeleteToBeginning,
    DeleteToEnd,
}

impl EditAction {
    /// Default binding for `key`, if it edits text.
    pub fn for_key(key: &KeyToken) -> Option<Self> {
        let action = match key {
            KeyToken::Char(c) => EditAction::Insert(*c),
            KeyToken::Paste(text) => EditAction::InsertText(single_line_paste(text)),
            KeyToken::Control(control) => match control {
                ControlKey::Backspace | ControlKey::CtrlH => EditAction::DeleteBackward,
                ControlKey::CtrlD => EditAction::DeleteForward,
                ControlKey::CtrlB => EditAction::MoveLeft,
                ControlKey::CtrlF => EditAction::MoveRight,
                ControlKey::CtrlA => EditAction::MoveToBeginning,
                ControlKey::CtrlE => EditAction::MoveToEnd,
                ControlKey::CtrlW => EditAction::DeleteWordBackward,
                ControlKey::CtrlU => EditAction::DeleteToBeginning,
                ControlKey::CtrlK => EditAction::DeleteToEnd,
                _ => return None,
            },
            KeyToken::Escape(escape) => match escape {
                EscapeKey::Left => EditAction::MoveLeft,
                EscapeKey::Right => EditAction::MoveRight,
                EscapeKey::CtrlLeft => EditAction::MoveWordLeft,
                EscapeKey::CtrlRight => EditAction::MoveWordRight,
                EscapeKey::Home => EditAction::MoveToBeginning,
                EscapeKey::End => EditAction::MoveToEnd,
                EscapeKey::Delete => EditAction::DeleteForward,
                _ => return None,
            },
            KeyToken::Unrecognized(_) => return None,
        };
        Some(action)
    }

    pub fn apply(&self, buffer: &mut TextEditBuffer) {
        match self {
            EditAction::Insert(c) => buffer.insert(*c),
            EditAction::InsertText(text) => buffer.insert_str(text),
            EditAction::DeleteBackward => {
                buffer.delete_before();
            }
            EditAction::DeleteForward => {
                buffer.delete_at();
            }
            EditAction::MoveLeft => buffer.move_left(),
            EditAction::MoveRight => buffer.move_right(),
            EditAction::MoveWordLeft => buffer.move_word_left(),
            EditAction::MoveWordRight => buffer.move_word_right(),
            EditAction::MoveToBeginning => buffer.move_home(),
            EditAction::MoveToEnd => buffer.move_end(),
            EditAction::DeleteWordBackward => {
                buffer.delete_word_before();
            }
            EditAction::DeleteToBeginning => {
                buffer.delete_to_start();
            }
            EditAction::DeleteToEnd => {
                buffer.delete_to_end();
            }
        }
    }
}

/// Apply the default editing binding for `key`. Returns whether the key was
/// handled.
pub fn apply_text_key(buffer: &mut TextEditBuffer, key: &KeyToken) -> bool {
    match EditAction::for_key(key) {
        Some(action) => {
            action.apply(buffer);
            true
        }
        None => false,
    }
}

/// Pasted text with control sequences removed and line breaks flattened.
fn single_line_paste(text: &str) -> String {
    SafeTextFilter::strip(text)
        .replace("\r\n", " ")
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

/// Render `text` with the cursor drawn as a reverse-video cell at codepoint
/// offset `cursor`, scrolled so the cursor stays within `max_width` columns.
pub fn value_with_cursor(text: &str, cursor: usize, max_width: usize) -> String {
    let cursor_style = TextStyle::new().reverse();
    let max_width = max_width.max(2);

    let mut cells: Vec<&str> = text.graphemes(true).collect();
    // Cursor is a codepoint offset; find the grapheme that starts there.
    let mut offset = 0;
    let mut cursor_cell = cells.len();
    for (i, g) in cells.iter().enumerate() {
        if offset >= cursor {
            cursor_cell = i;
            break;
        }
        offset += g.chars().count();
    }
    if cursor_cell == cells.len() {
        cells.push(" ");
    }

    let widths: Vec<usize> = cells.iter().map(|g| grapheme_width(g)).collect();
    let total: usize = widths.iter().sum();

    let (mut start, mut end) = (0, cells.len());
    if total > max_width {
        // Keep the cursor visible, leaving a column for the ellipsis.
        let budget = max_width - 1;
        start = cursor_cell;
        end = cursor_cell + 1;
        let mut used = widths[cursor_cell];
        while start > 0 && used + widths[start - 1] <= budget {
            start -= 1;
            used += widths[start];
        }
        while end < cells.len() && used + widths[end] <= budget {
            used += widths[end];
            end += 1;
        }
    }

    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    for (i, cell) in cells.iter().enumerate().take(end).skip(start) {
        if i == cursor_cell {
            out.push_str(&cursor_style.paint(cell));
        } else {
            out.push_str(cell);
        }
    }
    if end < cells.len() && start == 0 {
        out.push('…');
    }
    out
}

/// Placeholder text with the cursor on its first cell.
pub fn placeholder_with_cursor(placeholder: &str, max_width: usize) -> String {
    let mut graphemes = placeholder.graphemes(true);
    let Some(first) = graphemes.next() else {
        return TextStyle::new().reverse().paint(" ");
    };
    let rest: String = graphemes.collect();
    let rest = crate::unicode::truncate_with_ellipsis(
        &rest,
        max_width.saturating_sub(display_width(first)),
    );
    format!(
        "{}{}",
        TextStyle::new().reverse().paint(first),
        TextStyle::new().dim().paint(&rest)
    )
}

/// Navigation action on a scrolling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Previous,
    Next,
    First,
    Last,
    PageUp,
    PageDown,
}

impl ListAction {
    /// Default binding for `key`. `vi_keys` also binds `j` and `k`.
    pub fn for_key(key: &KeyToken, vi_keys: bool) -> Option<Self> {
        match key {
            KeyToken::Escape(EscapeKey::Up | EscapeKey::BackTab)
            | KeyToken::Control(ControlKey::CtrlP) => Some(ListAction::Previous),
            KeyToken::Escape(EscapeKey::Down) | KeyToken::Control(ControlKey::Tab | ControlKey::CtrlN) => {
                Some(ListAction::Next)
            }
            KeyToken::Escape(EscapeKey::Home) => Some(ListAction::First),
            KeyToken::Escape(EscapeKey::End) => Some(ListAction::Last),
            KeyToken::Escape(EscapeKey::PageUp) => Some(ListAction::PageUp),
            KeyToken::Escape(EscapeKey::PageDown) => Some(ListAction::PageDown),
            KeyToken::Char('k') if vi_keys => Some(ListAction::Previous),
            KeyToken::Char('j') if vi_keys => Some(ListAction::Next),
            _ => None,
        }
    }

    pub fn apply(self, viewport: &mut Viewport) {
        match self {
            ListAction::Previous => viewport.select_previous(),
            ListAction::Next => viewport.select_next(),
            ListAction::First => viewport.select_first(),
            ListAction::Last => viewport.select_last(),
            ListAction::PageUp => {
                let target = viewport.selected().saturating_sub(viewport.window());
                viewport.select(target);
            }
            ListAction::PageDown => {
                let last = viewport.total().saturating_sub(1);
                let target = (viewport.selected() + viewport.window()).min(last);
                viewport.select(target);
            }
        }
    }
}

/// Apply the default list binding for `key`. Returns whether the key was
/// handled.
pub fn apply_list_key(viewport: &mut Viewport, key: &KeyToken, vi_keys: bool) -> bool {
    match ListAction::for_key(key, vi_keys) {
        Some(action) => {
            action.apply(viewport);
            true
        }
        None => false,
    }
}
