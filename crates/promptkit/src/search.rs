//! Text field with a live list of matching options.

use promptkit_core::{
    apply_list_key, BoxError, Frame, KeyContext, KeyOutcome, KeyToken, PromptError, PromptResult,
    PromptState, RenderContext, Terminal, Validator, Viewport, Widget,
};

use crate::field::TextField;
use crate::select::DEFAULT_SCROLL;
use crate::theme::{self, BoxStyle};

/// Produces `(key, label)` results for a query.
pub type SearchFn = Box<dyn Fn(&str) -> Result<Vec<(String, String)>, BoxError>>;

/// Prompt that re-runs a search closure on every edit and lets the user pick
/// one of the results. The value is the chosen key.
///
/// An error from the closure aborts the prompt with
/// [`PromptError::Callback`].
///
/// ```no_run
/// use promptkit::SearchPrompt;
///
/// let users = ["Taylor", "Jess", "Nuno"];
/// let user = SearchPrompt::new("Search for a user", move |query| {
///     Ok(users
///         .iter()
///         .filter(|name| name.to_lowercase().contains(&query.to_lowercase()))
///         .map(|name| (name.to_lowercase(), name.to_string()))
///         .collect())
/// })
/// .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct SearchPrompt {
    label: String,
    hint: String,
    field: TextField,
    search: SearchFn,
    results: Vec<(String, String)>,
    viewport: Viewport,
    scroll: usize,
    validators: Vec<Validator<String>>,
}

impl SearchPrompt {
    pub fn new<F>(label: impl Into<String>, search: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<(String, String)>, BoxError> + 'static,
    {
        Self {
            label: label.into(),
            hint: String::new(),
            field: TextField::new(),
            search: Box::new(search),
            results: Vec::new(),
            viewport: Viewport::new(0, DEFAULT_SCROLL),
            scroll: DEFAULT_SCROLL,
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field = self.field.with_placeholder(placeholder);
        self
    }

    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll.max(1);
        self.viewport.set_window(self.scroll);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.validators
            .push(Validator::check(move |value: &String| validate(value.as_str())));
        self
    }

    pub fn query(&self) -> &str {
        self.field.value()
    }

    pub fn results(&self) -> &[(String, String)] {
        &self.results
    }

    /// Run the search closure for the current query and select the first
    /// result.
    pub fn refresh(&mut self) -> PromptResult<()> {
        let query = self.field.value();
        log::debug!("search refresh for {query:?}");
        self.results = (self.search)(query).map_err(PromptError::Callback)?;
        self.viewport = Viewport::new(self.results.len(), self.scroll);
        Ok(())
    }

    pub fn prompt(self) -> PromptResult<String> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<String> {
        self.refresh()?;
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }

    fn selected(&self) -> Option<&(String, String)> {
        self.results.get(self.viewport.selected())
    }
}

impl Widget for SearchPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(if self.results.is_empty() {
                KeyOutcome::Continue
            } else {
                KeyOutcome::Submit
            });
        }

        let before = self.field.value().to_string();
        if self.field.handle_key(key) {
            if self.field.value() != before {
                self.refresh()?;
            }
        } else {
            apply_list_key(&mut self.viewport, key, false);
        }
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.selected().map(|(key, _)| key.clone()).unwrap_or_default()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        let selected_label = self.selected().map(|(_, label)| label.as_str()).unwrap_or("");

        let body = match ctx.state {
            PromptState::Submitted => vec![theme::gray(selected_label)],
            PromptState::Cancelled => vec![theme::strikethrough(self.field.value())],
            _ => {
                let mut lines = vec![self.field.render_active(style.width)];
                if self.results.is_empty() {
                    lines.push(theme::dim("No results."));
                } else {
                    let rows = self.viewport.visible_range().map(|index| {
                        let (_, label) = &self.results[index];
                        if index == self.viewport.selected() {
                            format!("{} {label}", theme::cyan("›"))
                        } else {
                            format!("  {}", theme::dim(label))
                        }
                    });
                    lines.extend(theme::scrollbar(rows.collect(), &self.viewport, style.width));
                }
                lines
            }
        };

        let mut frame = Frame::from_lines(style.draw(&body));
        if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, &self.hint) {
            frame.push(footer);
        }
        frame
    }

    fn is_empty_value(&self) -> bool {
        self.results.is_empty()
    }
}
