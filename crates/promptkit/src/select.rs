//! Single choice from a scrolling list.

use promptkit_core::{
    apply_list_key, Frame, KeyContext, KeyOutcome, KeyToken, PromptError, PromptResult,
    PromptState, RenderContext, Terminal, Validator, Viewport, Widget,
};

use crate::theme::{self, BoxStyle};

/// Number of options shown at once unless configured.
pub const DEFAULT_SCROLL: usize = 5;

/// Prompt to pick one option. The value is the option's key.
///
/// ```no_run
/// use promptkit::SelectPrompt;
///
/// let role = SelectPrompt::new("What role should the user have?")
///     .with_option("member", "Member")
///     .with_option("contributor", "Contributor")
///     .with_option("owner", "Owner")
///     .with_default("contributor")
///     .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct SelectPrompt {
    label: String,
    hint: String,
    options: Vec<(String, String)>,
    default: Option<String>,
    scroll: usize,
    vi_keys: bool,
    viewport: Viewport,
    validators: Vec<Validator<String>>,
}

impl SelectPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: String::new(),
            options: Vec::new(),
            default: None,
            scroll: DEFAULT_SCROLL,
            vi_keys: true,
            viewport: Viewport::new(0, DEFAULT_SCROLL),
            validators: Vec::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push((key.into(), label.into()));
        self.reset_viewport();
        self
    }

    pub fn with_options<K, L>(mut self, options: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(k, l)| (k.into(), l.into())));
        self.reset_viewport();
        self
    }

    /// Preselect the option with this key.
    pub fn with_default(mut self, key: impl Into<String>) -> Self {
        self.default = Some(key.into());
        self.reset_viewport();
        self
    }

    /// How many options are visible at once.
    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll.max(1);
        self.reset_viewport();
        self
    }

    /// Whether `j` and `k` move the selection. On by default.
    pub fn with_vi_keys(mut self, enabled: bool) -> Self {
        self.vi_keys = enabled;
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

    /// Key of the highlighted option.
    pub fn selected_key(&self) -> Option<&str> {
        self.options
            .get(self.viewport.selected())
            .map(|(key, _)| key.as_str())
    }

    pub fn prompt(self) -> PromptResult<String> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<String> {
        if self.options.is_empty() {
            return Err(PromptError::InvalidConfiguration(
                "select prompt needs at least one option".to_string(),
            ));
        }
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }

    fn reset_viewport(&mut self) {
        let selected = self
            .default
            .as_ref()
            .and_then(|key| self.options.iter().position(|(k, _)| k == key))
            .unwrap_or(0);
        self.viewport = Viewport::with_selected(self.options.len(), self.scroll, selected);
    }

    fn selected_label(&self) -> &str {
        self.options
            .get(self.viewport.selected())
            .map(|(_, label)| label.as_str())
            .unwrap_or("")
    }
}

impl Widget for SelectPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(KeyOutcome::Submit);
        }
        apply_list_key(&mut self.viewport, key, self.vi_keys);
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.selected_key().unwrap_or_default().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        let body = match ctx.state {
            PromptState::Submitted => vec![theme::gray(self.selected_label())],
            PromptState::Cancelled => vec![theme::strikethrough(self.selected_label())],
            _ => {
                let rows = self.viewport.visible_range().map(|index| {
                    let (_, label) = &self.options[index];
                    if index == self.viewport.selected() {
                        format!("{} {} {}", theme::cyan("›"), theme::cyan("●"), label)
                    } else {
                        theme::dim(&format!("  ○ {label}"))
                    }
                });
                theme::scrollbar(rows.collect(), &self.viewport, style.width)
            }
        };

        let mut frame = Frame::from_lines(style.draw(&body));
        if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, &self.hint) {
            frame.push(footer);
        }
        frame
    }
}
