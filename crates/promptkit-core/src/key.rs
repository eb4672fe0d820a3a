//! Key definitions produced by the [`KeyDecoder`](crate::decoder::KeyDecoder).
//!
//! Every keypress arriving from the terminal becomes exactly one [`KeyToken`]:
//! a printable character, a control byte, a recognised escape sequence, a
//! bracketed paste, or an unrecognised byte run.

use std::fmt;

/// Single-byte control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Line feed (0x0A) or carriage return (0x0D).
    Enter,
    /// Horizontal tab (0x09).
    Tab,
    /// DEL (0x7F). Most terminals send this for the backspace key.
    Backspace,
    CtrlSpace,
    CtrlA,
    CtrlB,
    CtrlC,
    CtrlD,
    CtrlE,
    CtrlF,
    CtrlG,
    /// 0x08. Kept distinct from [`ControlKey::Backspace`].
    CtrlH,
    CtrlK,
    CtrlL,
    CtrlN,
    CtrlO,
    CtrlP,
    CtrlQ,
    CtrlR,
    CtrlS,
    CtrlT,
    CtrlU,
    CtrlV,
    CtrlW,
    CtrlX,
    CtrlY,
    CtrlZ,
    CtrlBackslash,
    CtrlSquareClose,
    CtrlCircumflex,
    CtrlUnderscore,
}

impl ControlKey {
    /// Map a single C0 control byte (or DEL) to its key.
    ///
    /// Returns `None` for ESC (0x1B), which starts an escape sequence, and for
    /// any byte outside the control range.
    pub fn from_byte(byte: u8) -> Option<Self> {
        use ControlKey::*;
        let key = match byte {
            0x00 => CtrlSpace,
            0x01 => CtrlA,
            0x02 => CtrlB,
            0x03 => CtrlC,
            0x04 => CtrlD,
            0x05 => CtrlE,
            0x06 => CtrlF,
            0x07 => CtrlG,
            0x08 => CtrlH,
            0x09 => Tab,
            0x0a | 0x0d => Enter,
            0x0b => CtrlK,
            0x0c => CtrlL,
            0x0e => CtrlN,
            0x0f => CtrlO,
            0x10 => CtrlP,
            0x11 => CtrlQ,
            0x12 => CtrlR,
            0x13 => CtrlS,
            0x14 => CtrlT,
            0x15 => CtrlU,
            0x16 => CtrlV,
            0x17 => CtrlW,
            0x18 => CtrlX,
            0x19 => CtrlY,
            0x1a => CtrlZ,
            0x1c => CtrlBackslash,
            0x1d => CtrlSquareClose,
            0x1e => CtrlCircumflex,
            0x1f => CtrlUnderscore,
            0x7f => Backspace,
            _ => return None,
        };
        Some(key)
    }
}

/// Keys delivered as multi-byte escape sequences, plus the bare escape key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeKey {
    Esc,

    Up,
    Down,
    Right,
    Left,

    ShiftUp,
    ShiftDown,
    ShiftRight,
    ShiftLeft,

    CtrlUp,
    CtrlDown,
    CtrlRight,
    CtrlLeft,

    Home,
    End,
    Delete,
    ShiftDelete,
    CtrlDelete,
    Insert,
    PageUp,
    PageDown,
    BackTab,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

/// One decoded keypress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// A printable Unicode scalar value.
    Char(char),
    Control(ControlKey),
    Escape(EscapeKey),
    /// Text delivered between bracketed-paste markers.
    Paste(String),
    /// Bytes that form no known key: an unknown CSI sequence or invalid UTF-8.
    Unrecognized(Vec<u8>),
}

impl KeyToken {
    /// Whether this token is the fixed interrupt key (Ctrl-C).
    pub fn is_interrupt(&self) -> bool {
        matches!(self, KeyToken::Control(ControlKey::CtrlC))
    }

    /// Whether this token is Enter.
    pub fn is_enter(&self) -> bool {
        matches!(self, KeyToken::Control(ControlKey::Enter))
    }

    /// The printable character carried by this token, if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyToken::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<char> for KeyToken {
    fn from(c: char) -> Self {
        KeyToken::Char(c)
    }
}

impl From<ControlKey> for KeyToken {
    fn from(key: ControlKey) -> Self {
        KeyToken::Control(key)
    }
}

impl From<EscapeKey> for KeyToken {
    fn from(key: EscapeKey) -> Self {
        KeyToken::Escape(key)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(c) => write!(f, "{c:?}"),
            KeyToken::Control(key) => write!(f, "{key:?}"),
            KeyToken::Escape(key) => write!(f, "{key:?}"),
            KeyToken::Paste(text) => write!(f, "Paste({} chars)", text.chars().count()),
            KeyToken::Unrecognized(bytes) => write!(f, "Unrecognized({bytes:02x?})"),
        }
    }
}
