//! Static messages written between prompts.

use promptkit_core::{wrap_lines, Color, PromptResult, Terminal, TextStyle};

/// Columns kept free on the right of a note.
const NOTE_MARGIN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteKind {
    #[default]
    Note,
    Info,
    Warning,
    Error,
    /// An error drawn as a red banner.
    Alert,
    /// Highlighted banner opening a session of prompts.
    Intro,
    /// Highlighted banner closing a session of prompts.
    Outro,
}

/// A message wrapped to the terminal width.
#[derive(Debug, Clone)]
pub struct Note {
    message: String,
    kind: NoteKind,
}

impl Note {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoteKind::Note,
        }
    }

    pub fn with_kind(mut self, kind: NoteKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    /// Styled lines for a terminal `width` columns wide.
    pub fn lines(&self, width: usize) -> Vec<String> {
        let wrap_width = width.saturating_sub(NOTE_MARGIN).max(1);
        wrap_lines(&self.message, wrap_width)
            .into_iter()
            .map(|line| format!(" {}", self.paint(&line)))
            .collect()
    }

    fn paint(&self, line: &str) -> String {
        match self.kind {
            NoteKind::Note => line.to_string(),
            NoteKind::Info => TextStyle::fg(Color::Green).paint(line),
            NoteKind::Warning => TextStyle::fg(Color::Yellow).paint(line),
            NoteKind::Error => TextStyle::fg(Color::Red).paint(line),
            NoteKind::Alert => TextStyle::fg(Color::White)
                .on(Color::Red)
                .paint(&format!(" {line} ")),
            NoteKind::Intro | NoteKind::Outro => TextStyle::fg(Color::Black)
                .on(Color::Cyan)
                .paint(&format!(" {line} ")),
        }
    }

    pub fn display(&self) -> PromptResult<()> {
        crate::with_native_terminal(|terminal| self.display_on(terminal))
    }

    pub fn display_on(&self, terminal: &Terminal) -> PromptResult<()> {
        let mut lines = vec![String::new()];
        lines.extend(self.lines(terminal.width()));
        terminal.write_lines(&lines)?;
        Ok(())
    }
}

pub fn note(message: &str) -> PromptResult<()> {
    Note::new(message).display()
}

pub fn info(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Info).display()
}

pub fn warning(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Warning).display()
}

pub fn error(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Error).display()
}

pub fn alert(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Alert).display()
}

pub fn intro(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Intro).display()
}

pub fn outro(message: &str) -> PromptResult<()> {
    Note::new(message).with_kind(NoteKind::Outro).display()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use promptkit_core::SafeTextFilter;
    use promptkit_io::{mock_terminal, MockConsoleInput};

    fn plain(lines: Vec<String>) -> Vec<String> {
        lines.iter().map(|l| SafeTextFilter::strip(l)).collect()
    }

    #[test]
    fn test_wraps_to_width() {
        let lines = Note::new("The quick brown fox jumps over the lazy dog").lines(22);
        assert_eq!(
            plain(lines),
            vec![" The quick brown", " fox jumps over", " the lazy dog"]
        );
    }

    #[test]
    fn test_banner_is_padded() {
        let lines = Note::new("Welcome").with_kind(NoteKind::Intro).lines(80);
        assert_eq!(plain(lines), vec!["  Welcome "]);
    }

    #[test]
    fn test_alert_is_a_red_banner() {
        let lines = Note::new("Disk full").with_kind(NoteKind::Alert).lines(80);
        assert_eq!(plain(lines), vec!["  Disk full "]);
    }

    #[test]
    fn test_display_writes_below_blank_line() {
        let (terminal, output) = mock_terminal(MockConsoleInput::new());
        Note::new("Saved.")
            .with_kind(NoteKind::Info)
            .display_on(&terminal)
            .unwrap();
        assert_eq!(output.plain_output(), "\r\n Saved.\r\n");
    }
}
