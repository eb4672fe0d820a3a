//! ANSI control sequences used by the renderer and the console backends.

use crate::console::ClearType;

pub const CARRIAGE_RETURN: &str = "\r";
pub const LINE_END: &str = "\r\n";

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const ERASE_DOWN: &str = "\x1b[J";
pub const CLEAR_LINE: &str = "\x1b[2K";
pub const CLEAR_TO_END_OF_LINE: &str = "\x1b[K";

pub const ENABLE_BRACKETED_PASTE: &str = "\x1b[?2004h";
pub const DISABLE_BRACKETED_PASTE: &str = "\x1b[?2004l";

pub const RESET_STYLE: &str = "\x1b[0m";

/// Move the cursor up `n` rows.
pub fn cursor_up(n: u16) -> String {
    format!("\x1b[{n}A")
}

/// Move the cursor down `n` rows.
pub fn cursor_down(n: u16) -> String {
    format!("\x1b[{n}B")
}

pub fn cursor_forward(n: u16) -> String {
    format!("\x1b[{n}C")
}

pub fn cursor_back(n: u16) -> String {
    format!("\x1b[{n}D")
}

/// Relative cursor movement; zero deltas emit nothing.
///
/// ```
/// use promptkit_core::ansi::move_relative;
///
/// assert_eq!(move_relative(-2, 0), "\x1b[2A");
/// assert_eq!(move_relative(1, 3), "\x1b[1B\x1b[3C");
/// ```
pub fn move_relative(row_delta: i16, col_delta: i16) -> String {
    let mut out = String::new();
    match row_delta {
        d if d < 0 => out.push_str(&cursor_up(d.unsigned_abs())),
        d if d > 0 => out.push_str(&cursor_down(d.unsigned_abs())),
        _ => {}
    }
    match col_delta {
        d if d < 0 => out.push_str(&cursor_back(d.unsigned_abs())),
        d if d > 0 => out.push_str(&cursor_forward(d.unsigned_abs())),
        _ => {}
    }
    out
}

pub fn clear(clear_type: ClearType) -> &'static str {
    match clear_type {
        ClearType::All => CLEAR_SCREEN,
        ClearType::FromCursor => ERASE_DOWN,
        ClearType::CurrentLine => CLEAR_LINE,
        ClearType::FromCursorToEndOfLine => CLEAR_TO_END_OF_LINE,
    }
}

pub fn cursor_visibility(visible: bool) -> &'static str {
    if visible {
        SHOW_CURSOR
    } else {
        HIDE_CURSOR
    }
}
