//! Frame rendering with minimal redraws.
//!
//! A prompt produces a fresh [`Frame`] on every state change. The
//! [`RenderEngine`] compares it with the previous frame and writes only what
//! is needed to turn one into the other, keeping track of how many lines are
//! on screen so the next redraw knows how far up to erase.
//!
//! Erasing counts logical lines, so every line must fit in one terminal row.
//! An engine given a width cuts longer lines before writing them.

use unicode_segmentation::UnicodeSegmentation;

use crate::ansi;
use crate::console::{ClearType, ConsoleOutput, SafeTextFilter};
use crate::error::ConsoleResult;
use crate::unicode::{display_width, grapheme_width};

/// The complete set of display lines produced by one render pass.
///
/// Lines may contain styling escape codes but never newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from lines, splitting any embedded newlines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frame = Self::new();
        for line in lines {
            frame.push(line);
        }
        frame
    }

    /// Append a line. Embedded `\n` starts additional lines.
    pub fn push(&mut self, line: impl AsRef<str>) {
        for part in line.as_ref().split('\n') {
            self.lines.push(part.trim_end_matches('\r').to_string());
        }
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn extend(&mut self, other: Frame) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with all styling removed.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| SafeTextFilter::strip(l)).collect()
    }

    /// Unstyled text of the whole frame, lines joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.plain_lines().join("\n")
    }

    /// Whether any line contains `needle` once styling is removed.
    pub fn contains(&self, needle: &str) -> bool {
        self.plain_lines().iter().any(|l| l.contains(needle))
    }

    /// Widest line in columns, ignoring styling.
    pub fn max_width(&self) -> usize {
        self.plain_lines()
            .iter()
            .map(|l| display_width(l))
            .max()
            .unwrap_or(0)
    }

    /// Copy of the frame with every line cut to at most `width` columns.
    ///
    /// Cut lines end with `…`; styling before the cut is kept and closed with
    /// a reset. A width of zero means unlimited.
    pub fn fit_to_width(&self, width: usize) -> Frame {
        if width == 0 {
            return self.clone();
        }
        let lines = self
            .lines
            .iter()
            .map(|line| {
                if display_width(&SafeTextFilter::strip(line)) <= width {
                    line.clone()
                } else {
                    cut_styled_line(line, width)
                }
            })
            .collect();
        Frame { lines }
    }
}

/// Keep escape sequences and at most `width - 1` columns of text, then `…`.
fn cut_styled_line(line: &str, width: usize) -> String {
    let budget = width.saturating_sub(1);
    let mut out = String::with_capacity(line.len());
    let mut used = 0;
    let mut styled = false;
    let mut rest = line;

    'outer: while !rest.is_empty() {
        if rest.starts_with('\x1b') {
            let len = escape_len(rest);
            out.push_str(&rest[..len]);
            styled = true;
            rest = &rest[len..];
            continue;
        }
        let end = rest.find('\x1b').unwrap_or(rest.len());
        for grapheme in rest[..end].graphemes(true) {
            let w = grapheme_width(grapheme);
            if used + w > budget {
                break 'outer;
            }
            used += w;
            out.push_str(grapheme);
        }
        rest = &rest[end..];
    }

    out.push('…');
    if styled {
        out.push_str(ansi::RESET_STYLE);
    }
    out
}

/// Byte length of the escape sequence at the start of `s`.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |i| i + 3),
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

/// What a call to [`RenderEngine::render_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderResult {
    /// Nothing was on screen; the whole frame was written.
    Initial,
    /// The frame equals the previous one; nothing was written.
    NoChange,
    /// A single line was rewritten in place.
    LineUpdated(usize),
    /// The previous frame was erased and the new one written.
    Redrawn,
}

/// Differential renderer bound to one console output.
pub struct RenderEngine<'a> {
    output: &'a dyn ConsoleOutput,
    previous: Option<Frame>,
    lines_written: usize,
    cursor_hidden: bool,
    width: Option<usize>,
}

impl<'a> RenderEngine<'a> {
    pub fn new(output: &'a dyn ConsoleOutput) -> Self {
        Self {
            output,
            previous: None,
            lines_written: 0,
            cursor_hidden: false,
            width: None,
        }
    }

    /// Cut frame lines to `width` columns before drawing them.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Change the width after the terminal was resized.
    pub fn set_width(&mut self, width: usize) {
        self.width = Some(width);
    }

    /// Number of lines the last frame occupied.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn previous_frame(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    /// Bring the screen from the previous frame to `frame`.
    pub fn render_frame(&mut self, frame: &Frame) -> ConsoleResult<RenderResult> {
        let fitted;
        let frame = match self.width {
            Some(width) => {
                fitted = frame.fit_to_width(width);
                &fitted
            }
            None => frame,
        };

        if !self.cursor_hidden {
            self.output.set_cursor_visible(false)?;
            self.cursor_hidden = true;
        }

        let result = match self.previous.as_ref() {
            None => {
                self.write_frame(frame)?;
                RenderResult::Initial
            }
            Some(previous) if previous == frame => {
                log::trace!("frame unchanged, skipping redraw");
                return Ok(RenderResult::NoChange);
            }
            Some(previous) => match single_changed_line(previous, frame) {
                Some(index) => {
                    self.rewrite_line(index, &frame.lines[index])?;
                    RenderResult::LineUpdated(index)
                }
                None => {
                    self.erase_lines(self.lines_written)?;
                    self.write_frame(frame)?;
                    RenderResult::Redrawn
                }
            },
        };

        log::debug!("rendered {} line(s): {:?}", frame.len(), result);
        self.output.flush()?;
        self.output.record_frame(frame);
        self.previous = Some(frame.clone());
        self.lines_written = frame.len();
        Ok(result)
    }

    /// Remove the current frame from the screen, leaving the cursor where
    /// its first line was. The next render starts from scratch.
    pub fn erase(&mut self) -> ConsoleResult<()> {
        self.erase_lines(self.lines_written)?;
        self.output.flush()?;
        self.previous = None;
        self.lines_written = 0;
        Ok(())
    }

    /// Forget the previous frame and cursor state without touching the
    /// screen. The next render hides the cursor again and writes below
    /// whatever is currently shown.
    pub fn reset(&mut self) {
        self.previous = None;
        self.lines_written = 0;
        self.cursor_hidden = false;
    }

    /// Show the cursor again. Calling this more than once has no further
    /// effect.
    pub fn restore(&mut self) -> ConsoleResult<()> {
        if self.cursor_hidden {
            self.cursor_hidden = false;
            self.output.set_cursor_visible(true)?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn write_frame(&self, frame: &Frame) -> ConsoleResult<()> {
        for line in frame.lines() {
            self.output.write_text(line)?;
            self.output.write_text(ansi::LINE_END)?;
        }
        Ok(())
    }

    /// Rewrite line `index` of the frame, then return to the line below the
    /// frame.
    fn rewrite_line(&self, index: usize, line: &str) -> ConsoleResult<()> {
        let up = clamp_rows(self.lines_written - index);
        self.output.move_cursor_relative(-up, 0)?;
        self.output.write_text(ansi::CARRIAGE_RETURN)?;
        self.output.clear(ClearType::CurrentLine)?;
        self.output.write_text(line)?;
        self.output.write_text(ansi::CARRIAGE_RETURN)?;
        self.output.move_cursor_relative(up, 0)?;
        Ok(())
    }

    fn erase_lines(&self, count: usize) -> ConsoleResult<()> {
        for _ in 0..count {
            self.output.move_cursor_relative(-1, 0)?;
            self.output.clear(ClearType::CurrentLine)?;
        }
        Ok(())
    }
}

impl Drop for RenderEngine<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("failed to restore cursor: {e}");
        }
    }
}

/// Index of the only line that differs between two frames of equal length.
fn single_changed_line(previous: &Frame, next: &Frame) -> Option<usize> {
    if previous.len() != next.len() {
        return None;
    }
    let mut changed = previous
        .lines()
        .iter()
        .zip(next.lines())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i);
    match (changed.next(), changed.next()) {
        (Some(index), None) => Some(index),
        _ => None,
    }
}

fn clamp_rows(rows: usize) -> i16 {
    i16::try_from(rows).unwrap_or(i16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Output that appends the ANSI equivalent of every call to a string.
    #[derive(Default)]
    struct RecordingOutput {
        written: Mutex<String>,
        frames: Mutex<usize>,
    }

    impl RecordingOutput {
        fn take(&self) -> String {
            std::mem::take(&mut *self.written.lock().unwrap())
        }
    }

    impl ConsoleOutput for RecordingOutput {
        fn write_text(&self, text: &str) -> ConsoleResult<()> {
            self.written.lock().unwrap().push_str(text);
            Ok(())
        }

        fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()> {
            self.write_text(&ansi::move_relative(row_delta, col_delta))
        }

        fn clear(&self, clear_type: ClearType) -> ConsoleResult<()> {
            self.write_text(ansi::clear(clear_type))
        }

        fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
            self.write_text(ansi::cursor_visibility(visible))
        }

        fn flush(&self) -> ConsoleResult<()> {
            Ok(())
        }

        fn record_frame(&self, _frame: &Frame) {
            *self.frames.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_frame_splits_newlines() {
        let frame = Frame::from_lines(["a\nb", "c\r\nd"]);
        assert_eq!(frame.lines(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn test_frame_plain_text() {
        let frame = Frame::from_lines(["\x1b[1mbold\x1b[0m", "plain"]);
        assert_eq!(frame.plain_text(), "bold\nplain");
        assert!(frame.contains("bold"));
        assert!(!frame.contains("\x1b"));
    }

    #[test]
    fn test_fit_to_width_cuts_long_lines_only() {
        let frame = Frame::from_lines(["short", "a line that is too long"]);
        let fitted = frame.fit_to_width(10);
        assert_eq!(fitted.lines(), &["short", "a line th…"]);
        assert_eq!(fitted.max_width(), 10);
        assert_eq!(frame.fit_to_width(0), frame);
    }

    #[test]
    fn test_fit_to_width_keeps_styling_before_cut() {
        let frame = Frame::from_lines(["\x1b[36mcyan text\x1b[0m and more"]);
        let fitted = frame.fit_to_width(6);
        assert_eq!(fitted.lines(), &["\x1b[36mcyan …\x1b[0m"]);
        assert_eq!(fitted.plain_text(), "cyan …");
    }

    #[test]
    fn test_fit_to_width_never_splits_wide_graphemes() {
        let fitted = Frame::from_lines(["日本語テキスト"]).fit_to_width(6);
        assert_eq!(fitted.plain_text(), "日本…");
        assert!(fitted.max_width() <= 6);
    }

    #[test]
    fn test_engine_with_width_erases_one_row_per_line() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output).with_width(8);

        engine
            .render_frame(&Frame::from_lines(["a very long first line", "b"]))
            .unwrap();
        assert_eq!(output.take(), "\x1b[?25la very …\r\nb\r\n");
        assert_eq!(engine.previous_frame().unwrap().max_width(), 8);

        let result = engine.render_frame(&Frame::from_lines(["x"])).unwrap();
        assert_eq!(result, RenderResult::Redrawn);
        assert_eq!(output.take(), "\x1b[1A\x1b[2K\x1b[1A\x1b[2Kx\r\n");
    }

    #[test]
    fn test_first_render_hides_cursor_and_writes_all_lines() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        let result = engine.render_frame(&Frame::from_lines(["one", "two"])).unwrap();

        assert_eq!(result, RenderResult::Initial);
        assert_eq!(output.take(), "\x1b[?25lone\r\ntwo\r\n");
        assert_eq!(engine.lines_written(), 2);
    }

    #[test]
    fn test_identical_frame_is_no_change() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);
        let frame = Frame::from_lines(["same"]);

        engine.render_frame(&frame).unwrap();
        output.take();

        assert_eq!(engine.render_frame(&frame).unwrap(), RenderResult::NoChange);
        assert_eq!(output.take(), "");
        assert_eq!(*output.frames.lock().unwrap(), 1);
    }

    #[test]
    fn test_single_changed_line_rewritten_in_place() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a", "b", "c"])).unwrap();
        output.take();

        let result = engine.render_frame(&Frame::from_lines(["a", "B", "c"])).unwrap();

        assert_eq!(result, RenderResult::LineUpdated(1));
        assert_eq!(output.take(), "\x1b[2A\r\x1b[2KB\r\x1b[2B");
        assert_eq!(engine.lines_written(), 3);
    }

    #[test]
    fn test_changed_line_count_erases_previous_frame() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a", "b"])).unwrap();
        output.take();

        let result = engine.render_frame(&Frame::from_lines(["x"])).unwrap();

        assert_eq!(result, RenderResult::Redrawn);
        assert_eq!(output.take(), "\x1b[1A\x1b[2K\x1b[1A\x1b[2Kx\r\n");
        assert_eq!(engine.lines_written(), 1);
    }

    #[test]
    fn test_two_changed_lines_redraw() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a", "b"])).unwrap();
        output.take();

        let result = engine.render_frame(&Frame::from_lines(["c", "d"])).unwrap();
        assert_eq!(result, RenderResult::Redrawn);
        assert_eq!(output.take(), "\x1b[1A\x1b[2K\x1b[1A\x1b[2Kc\r\nd\r\n");
    }

    #[test]
    fn test_erase_then_render_from_scratch() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a", "b"])).unwrap();
        engine.erase().unwrap();
        output.take();

        assert_eq!(engine.lines_written(), 0);
        let result = engine.render_frame(&Frame::from_lines(["a", "b"])).unwrap();
        assert_eq!(result, RenderResult::Initial);
        assert_eq!(output.take(), "a\r\nb\r\n");
    }

    #[test]
    fn test_reset_keeps_screen() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a"])).unwrap();
        output.take();
        engine.reset();

        assert_eq!(engine.render_frame(&Frame::from_lines(["a"])).unwrap(), RenderResult::Initial);
        assert_eq!(output.take(), "\x1b[?25la\r\n");
    }

    #[test]
    fn test_restore_is_idempotent() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a"])).unwrap();
        output.take();

        engine.restore().unwrap();
        assert_eq!(output.take(), "\x1b[?25h");
        engine.restore().unwrap();
        assert_eq!(output.take(), "");
    }

    #[test]
    fn test_drop_restores_cursor() {
        let output = RecordingOutput::default();
        {
            let mut engine = RenderEngine::new(&output);
            engine.render_frame(&Frame::from_lines(["a"])).unwrap();
            output.take();
        }
        assert_eq!(output.take(), "\x1b[?25h");
    }

    #[test]
    fn test_render_after_restore_hides_cursor_again() {
        let output = RecordingOutput::default();
        let mut engine = RenderEngine::new(&output);

        engine.render_frame(&Frame::from_lines(["a"])).unwrap();
        engine.restore().unwrap();
        output.take();

        engine.render_frame(&Frame::from_lines(["b"])).unwrap();
        assert_eq!(output.take(), "\x1b[?25l\x1b[1A\r\x1b[2Kb\r\x1b[1B");
    }
}
