//! Paged table with live search and jump-to-page.
//!
//! The table has three input modes. In `browse` the arrows move between rows
//! and pages, `/` opens the search box and `j` opens the page box. Enter in
//! either box returns to `browse`.

use promptkit_core::unicode::{pad_to_width, truncate_with_ellipsis};
use promptkit_core::{
    display_width, Color, ControlKey, EscapeKey, Frame, KeyContext, KeyOutcome, KeyToken,
    PromptResult, PromptState, RenderContext, SafeTextFilter, SubState, Terminal, TextStyle,
    Viewport, Widget,
};

use crate::field::TextField;
use crate::theme;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Widest a column is drawn before cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Width of the search and jump input boxes.
const INPUT_WIDTH: usize = 60;

const HINT_GAP: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    #[default]
    Browse,
    Search,
    Jump,
}

impl SubState for TableMode {
    fn name(&self) -> &'static str {
        match self {
            TableMode::Browse => "browse",
            TableMode::Search => "search",
            TableMode::Jump => "jump",
        }
    }
}

/// Browse rows a page at a time and pick one. The value is the chosen row.
///
/// ```no_run
/// use promptkit::DataTable;
///
/// let row = DataTable::new(vec![
///     vec!["Taylor", "taylor@example.com"],
///     vec!["Jess", "jess@example.com"],
/// ])
/// .with_headers(["Name", "Email"])
/// .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
#[derive(Debug)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Indices into `rows` that match the current query.
    matches: Vec<usize>,
    query: TextField,
    jump: TextField,
    viewport: Viewport,
}

impl DataTable {
    pub fn new<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let matches: Vec<usize> = (0..rows.len()).collect();
        Self {
            headers: Vec::new(),
            viewport: Viewport::new(matches.len(), DEFAULT_PER_PAGE),
            rows,
            matches,
            query: TextField::new(),
            jump: TextField::new(),
        }
    }

    pub fn with_headers<C: Into<String>>(mut self, headers: impl IntoIterator<Item = C>) -> Self {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Rows per page.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.viewport = Viewport::new(self.matches.len(), per_page);
        self
    }

    /// One-based page currently shown.
    pub fn page(&self) -> usize {
        self.viewport.page() + 1
    }

    pub fn total_pages(&self) -> usize {
        self.viewport.page_count()
    }

    pub fn query(&self) -> &str {
        self.query.value()
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&[String]> {
        self.viewport
            .visible_range()
            .map(|i| self.rows[self.matches[i]].as_slice())
            .collect()
    }

    /// Row under the cursor, if any row matches.
    pub fn selected_row(&self) -> Option<&[String]> {
        self.matches
            .get(self.viewport.selected())
            .map(|&i| self.rows[i].as_slice())
    }

    pub fn prompt(self) -> PromptResult<Vec<String>> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(self, terminal: &Terminal) -> PromptResult<Vec<String>> {
        crate::run_widget(self, Vec::new(), terminal)
    }

    fn filter(&mut self) {
        let needle = self.query.value().to_lowercase();
        self.matches = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| needle.is_empty() || row.join(" ").to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        log::debug!("table filter {:?} matched {} rows", needle, self.matches.len());
        self.viewport.set_total(self.matches.len());
        self.viewport.jump_to_page(0);
    }

    fn browse_key(&mut self, key: &KeyToken, ctx: &mut KeyContext<'_, TableMode>) -> KeyOutcome {
        let offset = self.viewport.offset_in_window();
        match key {
            k if k.is_enter() => {
                if self.selected_row().is_some() {
                    return KeyOutcome::Submit;
                }
            }
            KeyToken::Char('q') | KeyToken::Escape(EscapeKey::Esc) => return KeyOutcome::Cancel,
            KeyToken::Char('/') => ctx.enter(TableMode::Search),
            KeyToken::Char('j') => {
                self.jump.clear();
                ctx.enter(TableMode::Jump);
            }
            KeyToken::Escape(EscapeKey::Up) => {
                self.viewport.select_in_window(offset.saturating_sub(1));
            }
            KeyToken::Escape(EscapeKey::Down) => self.viewport.select_in_window(offset + 1),
            KeyToken::Escape(EscapeKey::Left) => {
                let page = self.viewport.page();
                self.viewport.jump_to_page(page.saturating_sub(1));
            }
            KeyToken::Escape(EscapeKey::Right) => {
                let page = self.viewport.page();
                self.viewport.jump_to_page(page + 1);
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn search_key(&mut self, key: &KeyToken, ctx: &mut KeyContext<'_, TableMode>) {
        match key {
            k if k.is_enter() => {
                ctx.exit();
            }
            KeyToken::Escape(EscapeKey::Esc) => {
                ctx.exit();
            }
            KeyToken::Control(ControlKey::CtrlD) => {
                self.query.clear();
                self.filter();
            }
            _ => {
                let before = self.query.value().to_string();
                self.query.handle_key(key);
                if self.query.value() != before {
                    self.filter();
                }
            }
        }
    }

    fn jump_key(&mut self, key: &KeyToken, ctx: &mut KeyContext<'_, TableMode>) {
        match key {
            k if k.is_enter() => {
                if let Ok(page) = self.jump.value().parse::<usize>() {
                    self.viewport.jump_to_page(page.saturating_sub(1));
                }
                self.jump.clear();
                ctx.exit();
            }
            KeyToken::Escape(EscapeKey::Esc) => {
                self.jump.clear();
                ctx.exit();
            }
            KeyToken::Char(c) if !c.is_ascii_digit() => {}
            KeyToken::Paste(_) => {}
            _ => {
                self.jump.handle_key(key);
            }
        }
    }

    /// Column widths, narrowed from the widest column down until a table
    /// row fits in `width` terminal columns.
    fn column_widths(&self, width: usize) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let widths = (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .chain(std::iter::once(&self.headers))
                    .filter_map(|row| row.get(col))
                    .map(|cell| display_width(cell))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect::<Vec<_>>();
        // A row is " │" + " cell │" per column.
        let room = width.saturating_sub(3 * widths.len() + 2);
        let mut widths = widths;
        while widths.iter().sum::<usize>() > room {
            match widths.iter_mut().filter(|w| **w > 1).max_by_key(|w| **w) {
                Some(widest) => *widest -= 1,
                None => break,
            }
        }
        widths
    }

    fn table_lines(&self, width: usize) -> Vec<String> {
        let widths = self.column_widths(width);
        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!(" {}", theme::gray(&format!("{left}{}{right}", segments.join(mid))))
        };
        let cells = |row: &[String], style: Option<TextStyle>| {
            let border = theme::gray("│");
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(col, &w)| {
                    let cell = row.get(col).map(String::as_str).unwrap_or("");
                    let text = format!(" {} ", pad_to_width(&truncate_with_ellipsis(cell, w), w));
                    match &style {
                        Some(style) => style.paint(&text),
                        None => text,
                    }
                })
                .collect();
            format!(" {border}{}{border}", cells.join(&border))
        };

        let mut lines = vec![rule("┌", "┬", "┐")];
        if !self.headers.is_empty() {
            lines.push(cells(self.headers.as_slice(), Some(TextStyle::new().dim())));
            lines.push(rule("├", "┼", "┤"));
        }

        let selected = self.viewport.selected();
        for (index, row) in self.viewport.visible_range().zip(self.visible_rows()) {
            let style = (index == selected).then(|| TextStyle::fg(Color::Black).on(Color::White));
            lines.push(cells(row, style));
        }
        if self.matches.is_empty() {
            let empty: Vec<String> = Vec::new();
            lines.push(cells(empty.as_slice(), None));
        }

        lines.push(rule("└", "┴", "┘"));
        lines
    }

    fn hints(&self, mode: TableMode) -> Vec<String> {
        let hints: Vec<(String, &str)> = match mode {
            TableMode::Search => vec![
                ("Enter".to_string(), "Select"),
                ("Ctrl+D".to_string(), "Clear Search"),
            ],
            TableMode::Jump => vec![("Enter".to_string(), "Jump to Page")],
            TableMode::Browse => {
                let first = self.page() == 1;
                let last = self.page() >= self.total_pages();
                vec![
                    ("↑ ↓".to_string(), "Navigate Records"),
                    (if first { theme::dim("←") } else { "←".to_string() }, "Previous Page"),
                    (if last { theme::dim("→") } else { "→".to_string() }, "Next Page"),
                    ("Enter".to_string(), "Select"),
                    ("q".to_string(), "Cancel"),
                    ("/".to_string(), "Search"),
                    ("j".to_string(), "Jump to Page"),
                ]
            }
        };
        hints
            .iter()
            .map(|(key, action)| format!("{key} {}", theme::dim(action)))
            .collect()
    }
}

impl Widget for DataTable {
    type Output = Vec<String>;
    type SubState = TableMode;

    fn handle_key(
        &mut self,
        key: &KeyToken,
        ctx: &mut KeyContext<'_, TableMode>,
    ) -> PromptResult<KeyOutcome> {
        let outcome = match ctx.sub_state() {
            TableMode::Browse => self.browse_key(key, ctx),
            TableMode::Search => {
                self.search_key(key, ctx);
                KeyOutcome::Continue
            }
            TableMode::Jump => {
                self.jump_key(key, ctx);
                KeyOutcome::Continue
            }
        };
        Ok(outcome)
    }

    fn value(&self) -> Vec<String> {
        self.selected_row().map(<[String]>::to_vec).unwrap_or_default()
    }

    fn render(&self, ctx: &RenderContext<'_, TableMode>) -> Frame {
        let mut frame = Frame::new();

        match ctx.state {
            PromptState::Submitted => {
                let row = self.selected_row().unwrap_or(&[]);
                frame.push(format!("  {}", theme::gray(&row.join(" │ "))));
                return frame;
            }
            PromptState::Cancelled => {
                if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, "") {
                    frame.push(footer);
                }
                return frame;
            }
            _ => {}
        }

        let mode = *ctx.sub_state;
        let input_width = INPUT_WIDTH.min(ctx.width.saturating_sub(17)).max(1);
        if mode == TableMode::Search {
            frame.push(format!("  Search: {}", self.query.render_active(input_width)));
        } else if !self.query.is_empty() {
            frame.push(format!("  {}{}", theme::dim("Search: "), self.query.value()));
        }
        if mode == TableMode::Jump {
            frame.push(format!("  Jump to Page: {}", self.jump.render_active(input_width)));
        }

        for line in self.table_lines(ctx.width) {
            frame.push(line);
        }
        frame.push(format!(
            "  {}{}{}{}",
            theme::dim("Page "),
            self.page(),
            theme::dim(" of "),
            self.total_pages().max(1)
        ));
        frame.blank();

        match theme::footer(ctx.state, ctx.error, ctx.cancel_message, "") {
            Some(footer) => frame.push(footer),
            None => {
                for line in pack_hints(&self.hints(mode), ctx.width.saturating_sub(2)) {
                    frame.push(format!("  {line}"));
                }
            }
        }
        frame.fit_to_width(ctx.width)
    }

    fn is_empty_value(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Join hints with a gap, starting a new line whenever the next hint would
/// pass `width` columns.
fn pack_hints(hints: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for hint in hints {
        let hint_width = display_width(&SafeTextFilter::strip(hint));
        if used > 0 && used + HINT_GAP.len() + hint_width > width {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        if used > 0 {
            current.push_str(HINT_GAP);
            used += HINT_GAP.len();
        }
        current.push_str(hint);
        used += hint_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
