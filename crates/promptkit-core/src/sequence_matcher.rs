//! Trie of recognised escape sequences.
//!
//! The decoder walks incoming bytes through this trie to decide whether an
//! escape sequence is complete, still a prefix of something longer, or
//! impossible.

use crate::key::EscapeKey;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    key: Option<EscapeKey>,
    children: BTreeMap<u8, TrieNode>,
}

/// Result of matching a byte sequence against the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The bytes are a complete known sequence.
    Exact(EscapeKey),
    /// The bytes are a strict prefix of at least one known sequence.
    Prefix,
    NoMatch,
}

/// Longest complete sequence found at the start of some input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestMatch {
    pub key: EscapeKey,
    pub consumed_bytes: usize,
}

/// Trie-based matcher over escape sequences.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    root: TrieNode,
}

impl SequenceMatcher {
    /// Create a matcher loaded with the standard VT100/xterm/rxvt sequences.
    pub fn new() -> Self {
        let mut matcher = Self {
            root: TrieNode::default(),
        };
        matcher.build_standard_sequences();
        matcher
    }

    pub fn match_sequence(&self, bytes: &[u8]) -> MatchResult {
        if bytes.is_empty() {
            return MatchResult::NoMatch;
        }

        match self.find_node(bytes) {
            Some(TrieNode { key: Some(key), .. }) => MatchResult::Exact(*key),
            Some(_) => MatchResult::Prefix,
            None => MatchResult::NoMatch,
        }
    }

    /// Find the longest complete sequence at the start of `bytes`.
    pub fn find_longest_match(&self, bytes: &[u8]) -> Option<LongestMatch> {
        let mut longest = None;
        let mut current = &self.root;

        for (i, byte) in bytes.iter().enumerate() {
            let Some(child) = current.children.get(byte) else {
                break;
            };
            current = child;
            if let Some(key) = current.key {
                longest = Some(LongestMatch {
                    key,
                    consumed_bytes: i + 1,
                });
            }
        }

        longest
    }

    fn find_node(&self, bytes: &[u8]) -> Option<&TrieNode> {
        let mut current = &self.root;
        for byte in bytes {
            current = current.children.get(byte)?;
        }
        Some(current)
    }

    /// Register a sequence, replacing any previous mapping for the same bytes.
    pub fn insert(&mut self, bytes: &[u8], key: EscapeKey) {
        let mut current = &mut self.root;
        for &byte in bytes {
            current = current.children.entry(byte).or_default();
        }
        current.key = Some(key);
    }

    fn build_standard_sequences(&mut self) {
        use EscapeKey::*;

        // Arrow keys, normal and application cursor mode
        for (prefix, final_byte, key) in [
            (b'[', b'A', Up),
            (b'[', b'B', Down),
            (b'[', b'C', Right),
            (b'[', b'D', Left),
            (b'O', b'A', Up),
            (b'O', b'B', Down),
            (b'O', b'C', Right),
            (b'O', b'D', Left),
        ] {
            self.insert(&[0x1b, prefix, final_byte], key);
        }

        // Home / End variants
        self.insert(b"\x1b[H", Home);
        self.insert(b"\x1b[F", End);
        self.insert(b"\x1bOH", Home);
        self.insert(b"\x1bOF", End);
        self.insert(b"\x1b0H", Home);
        self.insert(b"\x1b0F", End);
        self.insert(b"\x1b[1~", Home);
        self.insert(b"\x1b[4~", End);
        self.insert(b"\x1b[7~", Home);
        self.insert(b"\x1b[8~", End);

        self.insert(b"\x1b[2~", Insert);
        self.insert(b"\x1b[3~", Delete);
        self.insert(b"\x1b[3;2~", ShiftDelete);
        self.insert(b"\x1b[3;5~", CtrlDelete);
        self.insert(b"\x1b[5~", PageUp);
        self.insert(b"\x1b[6~", PageDown);
        self.insert(b"\x1b[Z", BackTab);

        // Function keys: VT100, Linux console, rxvt, xterm
        self.insert(b"\x1bOP", F1);
        self.insert(b"\x1bOQ", F2);
        self.insert(b"\x1bOR", F3);
        self.insert(b"\x1bOS", F4);
        self.insert(b"\x1b[[A", F1);
        self.insert(b"\x1b[[B", F2);
        self.insert(b"\x1b[[C", F3);
        self.insert(b"\x1b[[D", F4);
        self.insert(b"\x1b[[E", F5);
        self.insert(b"\x1b[11~", F1);
        self.insert(b"\x1b[12~", F2);
        self.insert(b"\x1b[13~", F3);
        self.insert(b"\x1b[14~", F4);
        self.insert(b"\x1b[15~", F5);
        self.insert(b"\x1b[17~", F6);
        self.insert(b"\x1b[18~", F7);
        self.insert(b"\x1b[19~", F8);
        self.insert(b"\x1b[20~", F9);
        self.insert(b"\x1b[21~", F10);
        self.insert(b"\x1b[23~", F11);
        self.insert(b"\x1b[24~", F12);

        // Modified arrows: xterm `1;<mod>` form and the short rxvt forms
        for (final_byte, shift, ctrl) in [
            (b'A', ShiftUp, CtrlUp),
            (b'B', ShiftDown, CtrlDown),
            (b'C', ShiftRight, CtrlRight),
            (b'D', ShiftLeft, CtrlLeft),
        ] {
            self.insert(&[0x1b, b'[', b'1', b';', b'2', final_byte], shift);
            self.insert(&[0x1b, b'[', b'1', b';', b'5', final_byte], ctrl);
            self.insert(&[0x1b, b'[', b'5', final_byte], ctrl);
        }
        self.insert(b"\x1b[a", ShiftUp);
        self.insert(b"\x1b[b", ShiftDown);
        self.insert(b"\x1b[c", ShiftRight);
        self.insert(b"\x1b[d", ShiftLeft);
        self.insert(b"\x1bOa", CtrlUp);
        self.insert(b"\x1bOb", CtrlDown);
        self.insert(b"\x1bOc", CtrlRight);
        self.insert(b"\x1bOd", CtrlLeft);
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}
