//! State machine that turns raw terminal bytes into [`KeyToken`]s.
//!
//! Bytes may arrive split at arbitrary points; anything that could still
//! become a longer token is buffered until the next [`KeyDecoder::feed`] or
//! an explicit [`KeyDecoder::flush`]. Backends call `flush` after a short
//! idle period so that a lone ESC press is not held forever.

use crate::key::{ControlKey, EscapeKey, KeyToken};
use crate::sequence_matcher::{MatchResult, SequenceMatcher};

/// Maximum length of a pending escape or CSI sequence.
const MAX_SEQUENCE_LEN: usize = 64;

/// Maximum bytes of pasted text held before a partial paste is emitted.
const MAX_PASTE_LEN: usize = 64 * 1024;

const ESC: u8 = 0x1b;
const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Normal,
    /// After ESC, before the sequence is classified.
    Escape,
    /// Inside `ESC [` parameters.
    Csi,
    /// Inside a multi-byte UTF-8 codepoint; holds the expected total length.
    Utf8(usize),
    /// Between bracketed paste markers.
    Paste,
}

/// Incremental byte-to-key decoder.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    state: DecoderState,
    pending: Vec<u8>,
    paste: Vec<u8>,
    matcher: SequenceMatcher,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Normal,
            pending: Vec::new(),
            paste: Vec::new(),
            matcher: SequenceMatcher::new(),
        }
    }

    /// Feed raw bytes and return every token they complete, in arrival order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<KeyToken> {
        let mut tokens = Vec::new();
        for &byte in data {
            self.process_byte(byte, &mut tokens);
        }
        if !tokens.is_empty() {
            log::trace!("decoded {} token(s): {:?}", tokens.len(), tokens);
        }
        tokens
    }

    /// Resolve whatever is pending as if no more bytes will follow.
    ///
    /// A lone ESC becomes [`EscapeKey::Esc`]; an incomplete codepoint becomes
    /// [`KeyToken::Unrecognized`]; an unterminated paste is emitted as-is.
    pub fn flush(&mut self) -> Vec<KeyToken> {
        let mut tokens = Vec::new();

        // Reprocessing leftovers of a broken escape can leave new pending bytes.
        while self.has_pending() {
            match self.state {
                DecoderState::Normal => break,
                DecoderState::Escape => {
                    let pending = std::mem::take(&mut self.pending);
                    self.state = DecoderState::Normal;
                    match self.matcher.find_longest_match(&pending) {
                        Some(found) if found.consumed_bytes == pending.len() => {
                            tokens.push(KeyToken::Escape(found.key));
                        }
                        _ => {
                            tokens.push(KeyToken::Escape(EscapeKey::Esc));
                            for &byte in &pending[1..] {
                                self.process_byte(byte, &mut tokens);
                            }
                        }
                    }
                }
                DecoderState::Csi => {
                    let pending = std::mem::take(&mut self.pending);
                    self.state = DecoderState::Normal;
                    if pending == b"\x1b[" {
                        tokens.push(KeyToken::Escape(EscapeKey::Esc));
                        tokens.push(KeyToken::Char('['));
                    } else {
                        log::warn!("incomplete CSI sequence flushed: {pending:02x?}");
                        tokens.push(KeyToken::Unrecognized(pending));
                    }
                }
                DecoderState::Utf8(_) => {
                    let pending = std::mem::take(&mut self.pending);
                    self.state = DecoderState::Normal;
                    tokens.push(KeyToken::Unrecognized(pending));
                }
                DecoderState::Paste => {
                    self.paste.extend(self.pending.drain(..));
                    self.emit_paste(&mut tokens);
                    self.state = DecoderState::Normal;
                }
            }
        }

        tokens
    }

    /// Whether bytes are buffered waiting for more input.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.paste.is_empty()
    }

    /// Whether a bare ESC or escape prefix is pending, i.e. an idle flush would
    /// change the outcome.
    pub fn has_pending_escape(&self) -> bool {
        matches!(self.state, DecoderState::Escape | DecoderState::Csi)
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Drop all buffered bytes.
    pub fn reset(&mut self) {
        self.state = DecoderState::Normal;
        self.pending.clear();
        self.paste.clear();
    }

    fn process_byte(&mut self, byte: u8, tokens: &mut Vec<KeyToken>) {
        match self.state {
            DecoderState::Normal => self.handle_normal_byte(byte, tokens),
            DecoderState::Escape => self.handle_escape_byte(byte, tokens),
            DecoderState::Csi => self.handle_csi_byte(byte, tokens),
            DecoderState::Utf8(len) => self.handle_utf8_byte(byte, len, tokens),
            DecoderState::Paste => self.handle_paste_byte(byte, tokens),
        }
    }

    fn handle_normal_byte(&mut self, byte: u8, tokens: &mut Vec<KeyToken>) {
        if byte == ESC {
            self.pending.push(byte);
            self.state = DecoderState::Escape;
            return;
        }

        if let Some(key) = ControlKey::from_byte(byte) {
            tokens.push(KeyToken::Control(key));
            return;
        }

        match utf8_sequence_len(byte) {
            Some(1) => tokens.push(KeyToken::Char(byte as char)),
            Some(len) => {
                self.pending.push(byte);
                self.state = DecoderState::Utf8(len);
            }
            None => {
                log::warn!("invalid UTF-8 lead byte {byte:#04x}");
                tokens.push(KeyToken::Unrecognized(vec![byte]));
            }
        }
    }

    fn handle_utf8_byte(&mut self, byte: u8, len: usize, tokens: &mut Vec<KeyToken>) {
        if !(0x80..=0xbf).contains(&byte) {
            let pending = std::mem::take(&mut self.pending);
            self.state = DecoderState::Normal;
            log::warn!("truncated UTF-8 sequence {pending:02x?}");
            tokens.push(KeyToken::Unrecognized(pending));
            self.handle_normal_byte(byte, tokens);
            return;
        }

        self.pending.push(byte);
        if self.pending.len() < len {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        self.state = DecoderState::Normal;
        match std::str::from_utf8(&pending).ok().and_then(|s| s.chars().next()) {
            Some(c) => tokens.push(KeyToken::Char(c)),
            None => {
                log::warn!("invalid UTF-8 sequence {pending:02x?}");
                tokens.push(KeyToken::Unrecognized(pending));
            }
        }
    }

    fn handle_escape_byte(&mut self, byte: u8, tokens: &mut Vec<KeyToken>) {
        if self.pending.len() == 1 && byte == b'[' {
            self.pending.push(byte);
            self.state = DecoderState::Csi;
            return;
        }

        self.pending.push(byte);
        match self.matcher.match_sequence(&self.pending) {
            MatchResult::Exact(key) => {
                tokens.push(KeyToken::Escape(key));
                self.reset_to_normal();
            }
            MatchResult::Prefix => {}
            MatchResult::NoMatch => {
                // Alt-modified keys and stray ESC presses land here.
                let rest = self.pending.split_off(1);
                self.reset_to_normal();
                tokens.push(KeyToken::Escape(EscapeKey::Esc));
                for b in rest {
                    self.process_byte(b, tokens);
                }
            }
        }
    }

    fn handle_csi_byte(&mut self, byte: u8, tokens: &mut Vec<KeyToken>) {
        if self.pending.len() >= MAX_SEQUENCE_LEN {
            let pending = std::mem::take(&mut self.pending);
            self.state = DecoderState::Normal;
            log::warn!("CSI sequence exceeded {MAX_SEQUENCE_LEN} bytes, dropping");
            tokens.push(KeyToken::Unrecognized(pending));
            self.process_byte(byte, tokens);
            return;
        }

        match byte {
            // Parameter and intermediate bytes
            0x20..=0x3f => self.pending.push(byte),
            // `ESC [ [` introduces the Linux console function keys
            b'[' if self.pending.len() == 2 => self.pending.push(byte),
            // Final byte
            0x40..=0x7e => {
                self.pending.push(byte);
                let pending = std::mem::take(&mut self.pending);
                self.state = DecoderState::Normal;
                self.finish_csi(pending, tokens);
            }
            _ => {
                let pending = std::mem::take(&mut self.pending);
                self.state = DecoderState::Normal;
                log::warn!("malformed CSI sequence {pending:02x?}");
                tokens.push(KeyToken::Unrecognized(pending));
                self.process_byte(byte, tokens);
            }
        }
    }

    fn finish_csi(&mut self, sequence: Vec<u8>, tokens: &mut Vec<KeyToken>) {
        if sequence == PASTE_START {
            self.state = DecoderState::Paste;
            return;
        }

        match self.matcher.match_sequence(&sequence) {
            MatchResult::Exact(key) => tokens.push(KeyToken::Escape(key)),
            _ => {
                log::warn!("unrecognized CSI sequence {sequence:02x?}");
                tokens.push(KeyToken::Unrecognized(sequence));
            }
        }
    }

    fn handle_paste_byte(&mut self, byte: u8, tokens: &mut Vec<KeyToken>) {
        self.pending.push(byte);

        if self.pending.ends_with(PASTE_END) {
            let content_len = self.pending.len() - PASTE_END.len();
            self.paste.extend_from_slice(&self.pending[..content_len]);
            self.pending.clear();
            self.emit_paste(tokens);
            self.state = DecoderState::Normal;
            return;
        }

        // Keep only enough bytes to recognise a split end marker.
        let keep = PASTE_END.len() - 1;
        if self.pending.len() > keep {
            let move_len = self.pending.len() - keep;
            self.paste.extend(self.pending.drain(..move_len));
        }

        if self.paste.len() >= MAX_PASTE_LEN {
            log::warn!("paste exceeded {MAX_PASTE_LEN} bytes, emitting partial paste");
            self.emit_paste(tokens);
        }
    }

    fn emit_paste(&mut self, tokens: &mut Vec<KeyToken>) {
        let content = std::mem::take(&mut self.paste);
        if !content.is_empty() {
            tokens.push(KeyToken::Paste(String::from_utf8_lossy(&content).into_owned()));
        }
    }

    fn reset_to_normal(&mut self) {
        self.state = DecoderState::Normal;
        self.pending.clear();
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Expected length of a UTF-8 sequence starting with `lead`, or `None` when
/// `lead` can never start one.
fn utf8_sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}
