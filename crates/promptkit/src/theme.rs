//! Default look shared by every widget: a titled box whose colour follows
//! the prompt state, followed by one line of error, cancel or hint text.

use promptkit_core::unicode::{display_width, pad_to_width, truncate_with_ellipsis};
use promptkit_core::{Color, PromptState, TextStyle, Viewport};

/// Widest box body, in columns.
pub const MAX_BOX_WIDTH: usize = 60;

/// Narrowest box body, in columns.
pub const MIN_BOX_WIDTH: usize = 20;

pub fn gray(text: &str) -> String {
    TextStyle::fg(Color::Gray).paint(text)
}

pub fn dim(text: &str) -> String {
    TextStyle::new().dim().paint(text)
}

pub fn cyan(text: &str) -> String {
    TextStyle::fg(Color::Cyan).paint(text)
}

pub fn green(text: &str) -> String {
    TextStyle::fg(Color::Green).paint(text)
}

pub fn yellow(text: &str) -> String {
    TextStyle::fg(Color::Yellow).paint(text)
}

pub fn red(text: &str) -> String {
    TextStyle::fg(Color::Red).paint(text)
}

pub fn strikethrough(text: &str) -> String {
    TextStyle::new().strikethrough().dim().paint(text)
}

/// Body width of a box drawn on a terminal `terminal_width` columns wide.
///
/// Terminals too narrow for [`MIN_BOX_WIDTH`] get whatever room is left, so
/// the box never overflows a row.
pub fn box_width(terminal_width: usize) -> usize {
    let room = terminal_width.saturating_sub(6);
    if room < MIN_BOX_WIDTH {
        room.max(1)
    } else {
        room.min(MAX_BOX_WIDTH)
    }
}

/// Colour of the box border and title for a state.
fn state_color(state: PromptState, has_error: bool) -> Option<Color> {
    match state {
        PromptState::Cancelled | PromptState::Errored => Some(Color::Red),
        PromptState::Submitted => None,
        _ if has_error => Some(Color::Yellow),
        _ => Some(Color::Cyan),
    }
}

/// Box drawing for one prompt.
#[derive(Debug, Clone)]
pub struct BoxStyle<'a> {
    pub title: &'a str,
    /// Right-aligned text in the top border, e.g. a counter.
    pub info: Option<&'a str>,
    pub state: PromptState,
    pub has_error: bool,
    pub width: usize,
}

impl<'a> BoxStyle<'a> {
    pub fn new(title: &'a str, state: PromptState, width: usize) -> Self {
        Self {
            title,
            info: None,
            state,
            has_error: false,
            width: box_width(width),
        }
    }

    pub fn with_info(mut self, info: &'a str) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_error(mut self, has_error: bool) -> Self {
        self.has_error = has_error;
        self
    }

    fn border(&self, text: &str) -> String {
        match state_color(self.state, self.has_error) {
            Some(Color::Cyan) | None => gray(text),
            Some(color) => TextStyle::fg(color).paint(text),
        }
    }

    fn title_text(&self, text: &str) -> String {
        match state_color(self.state, self.has_error) {
            Some(color) => TextStyle::fg(color).paint(text),
            None => gray(text),
        }
    }

    /// Draw the box around `body`. Lines wider than the box are truncated.
    pub fn draw(&self, body: &[String]) -> Vec<String> {
        let inner = self.width;
        let info = self.info.unwrap_or("");
        let info_width = display_width(info);
        let title_room = inner.saturating_sub(if info.is_empty() { 1 } else { info_width + 2 });
        let title = truncate_with_ellipsis(self.title, title_room);
        let title_width = display_width(&title);

        let mut lines = Vec::with_capacity(body.len() + 2);
        let top = if info.is_empty() {
            format!(
                " {} {} {}",
                self.border("┌"),
                self.title_text(&title),
                self.border(&format!("{}┐", "─".repeat(inner.saturating_sub(title_width))))
            )
        } else {
            format!(
                " {} {} {} {} {}",
                self.border("┌"),
                self.title_text(&title),
                self.border(&"─".repeat(inner.saturating_sub(title_width + info_width + 2))),
                self.title_text(info),
                self.border("┐")
            )
        };
        lines.push(top);

        for line in body {
            let fitted = fit_styled(line, inner);
            lines.push(format!(
                " {} {} {}",
                self.border("│"),
                fitted,
                self.border("│")
            ));
        }

        lines.push(format!(" {}", self.border(&format!("└{}┘", "─".repeat(inner + 2)))));
        lines
    }
}

/// Pad or truncate a possibly styled line to exactly `width` columns.
fn fit_styled(line: &str, width: usize) -> String {
    let plain = promptkit_core::SafeTextFilter::strip(line);
    let plain_width = display_width(&plain);
    if plain_width <= width {
        format!("{line}{}", " ".repeat(width - plain_width))
    } else {
        // Styling cannot be cut safely; fall back to the plain text.
        pad_to_width(&truncate_with_ellipsis(&plain, width), width)
    }
}

/// Mark the visible part of a scrolled list with a thumb in the last column.
///
/// Lines are fitted to `width` columns including the thumb column. Lists that
/// fit in their window are only fitted.
pub fn scrollbar(lines: Vec<String>, viewport: &Viewport, width: usize) -> Vec<String> {
    let total = viewport.total();
    let window = viewport.window();
    if total <= window {
        return lines.iter().map(|line| fit_styled(line, width)).collect();
    }

    let travel = total - window;
    let thumb = (viewport.first_visible() * (window - 1) + travel / 2) / travel;
    lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let marker = if row == thumb { cyan("┃") } else { gray("│") };
            format!("{} {marker}", fit_styled(line, width.saturating_sub(2)))
        })
        .collect()
}

/// The line shown under a box: the error or cancel message if there is one,
/// otherwise the hint.
pub fn footer(state: PromptState, error: Option<&str>, cancel_message: &str, hint: &str) -> Option<String> {
    match (state, error) {
        (PromptState::Cancelled, _) => Some(format!("  {}", red(&format!("⚠ {cancel_message}")))),
        (PromptState::Errored, Some(error)) => Some(format!("  {}", red(&format!("⚠ {error}")))),
        (_, Some(error)) => Some(format!("  {}", yellow(&format!("⚠ {error}")))),
        _ if !hint.is_empty() && !state.is_terminal() => Some(format!("  {}", gray(hint))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use promptkit_core::SafeTextFilter;

    fn plain(lines: Vec<String>) -> Vec<String> {
        lines.iter().map(|l| SafeTextFilter::strip(l)).collect()
    }

    #[test]
    fn test_box_width_bounds() {
        assert_eq!(box_width(80), 60);
        assert_eq!(box_width(40), 34);
        assert_eq!(box_width(26), 20);
        assert_eq!(box_width(20), 14);
        assert_eq!(box_width(3), 1);
    }

    #[test]
    fn test_box_fits_narrow_terminal() {
        for width in [12, 20, 25] {
            let lines = BoxStyle::new("Name", PromptState::Active, width)
                .with_info("1/2")
                .draw(&["Jess".to_string()]);
            for line in plain(lines) {
                assert!(display_width(&line) <= width, "{width}: {line:?}");
            }
        }
    }

    #[test]
    fn test_draw_box() {
        let lines = BoxStyle::new("Name", PromptState::Active, 30).draw(&["Jess".to_string()]);
        assert_eq!(
            plain(lines),
            vec![
                " ┌ Name ────────────────────┐",
                " │ Jess                     │",
                " └──────────────────────────┘",
            ]
        );
    }

    #[test]
    fn test_draw_box_with_info() {
        let lines = BoxStyle::new("Copying", PromptState::Active, 30)
            .with_info("3/10")
            .draw(&[]);
        assert_eq!(plain(lines)[0], " ┌ Copying ─────────── 3/10 ┐");
    }

    #[test]
    fn test_all_lines_same_width() {
        let lines = BoxStyle::new("A very long title that will not fit", PromptState::Submitted, 26)
            .draw(&["also a body line that is far too long".to_string()]);
        let widths: Vec<usize> = plain(lines).iter().map(|l| display_width(l)).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{widths:?}");
    }

    #[test]
    fn test_scrollbar_thumb_follows_window() {
        let lines: Vec<String> = (0..3).map(|i| format!("item {i}")).collect();

        let top = Viewport::new(10, 3);
        let marks: Vec<String> = plain(scrollbar(lines.clone(), &top, 12))
            .iter()
            .map(|l| l.chars().last().unwrap().to_string())
            .collect();
        assert_eq!(marks, vec!["┃", "│", "│"]);

        let mut bottom = Viewport::new(10, 3);
        bottom.select_last();
        let marks: Vec<String> = plain(scrollbar(lines.clone(), &bottom, 12))
            .iter()
            .map(|l| l.chars().last().unwrap().to_string())
            .collect();
        assert_eq!(marks, vec!["│", "│", "┃"]);

        let fits = Viewport::new(3, 5);
        assert_eq!(plain(scrollbar(lines, &fits, 8))[0], "item 0  ");
    }

    #[test]
    fn test_footer() {
        assert_eq!(
            footer(PromptState::Cancelled, None, "Cancelled.", "hint").map(|l| SafeTextFilter::strip(&l)),
            Some("  ⚠ Cancelled.".to_string())
        );
        assert_eq!(
            footer(PromptState::Active, Some("Required."), "Cancelled.", "hint").map(|l| SafeTextFilter::strip(&l)),
            Some("  ⚠ Required.".to_string())
        );
        assert_eq!(
            footer(PromptState::Active, None, "Cancelled.", "hint").map(|l| SafeTextFilter::strip(&l)),
            Some("  hint".to_string())
        );
        assert_eq!(footer(PromptState::Submitted, None, "Cancelled.", "hint"), None);
    }
}
