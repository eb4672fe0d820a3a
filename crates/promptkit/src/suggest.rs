//! Free text input with completion suggestions.

use promptkit_core::{
    BoxError, ControlKey, EscapeKey, Frame, KeyContext, KeyOutcome, KeyToken, PromptError,
    PromptResult, PromptState, RenderContext, Terminal, Validator, Viewport, Widget,
};

use crate::field::TextField;
use crate::select::DEFAULT_SCROLL;
use crate::text::DEFAULT_REQUIRED_MESSAGE;
use crate::theme::{self, BoxStyle};

type LookupFn = Box<dyn Fn(&str) -> Result<Vec<String>, BoxError>>;

/// Text prompt that offers completions as the user types. Any text is
/// accepted; Enter on a highlighted suggestion takes that suggestion.
///
/// ```no_run
/// use promptkit::SuggestPrompt;
///
/// let name = SuggestPrompt::new("What is your name?")
///     .with_options(["Taylor", "Dayle", "Jess", "Nuno"])
///     .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct SuggestPrompt {
    label: String,
    hint: String,
    field: TextField,
    lookup: LookupFn,
    matches: Vec<String>,
    highlighted: Option<usize>,
    viewport: Viewport,
    scroll: usize,
    validators: Vec<Validator<String>>,
}

impl SuggestPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: String::new(),
            field: TextField::new(),
            lookup: Box::new(|_: &str| Ok(Vec::new())),
            matches: Vec::new(),
            highlighted: None,
            viewport: Viewport::new(0, DEFAULT_SCROLL),
            scroll: DEFAULT_SCROLL,
            validators: Vec::new(),
        }
    }

    /// Suggest the options containing the typed text, ignoring case.
    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.lookup = Box::new(move |query: &str| {
            let query = query.to_lowercase();
            Ok(options
                .iter()
                .filter(|option| option.to_lowercase().contains(&query))
                .cloned()
                .collect())
        });
        self
    }

    /// Compute suggestions for each query. An error aborts the prompt with
    /// [`PromptError::Callback`].
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<String>, BoxError> + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field = self.field.with_placeholder(placeholder);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.field.set_value(default);
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

    pub fn required(self) -> Self {
        self.required_with(DEFAULT_REQUIRED_MESSAGE)
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.validators.push(Validator::required(message));
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

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted
            .and_then(|index| self.matches.get(index))
            .map(String::as_str)
    }

    /// Look up suggestions for the current text and clear the highlight.
    pub fn refresh(&mut self) -> PromptResult<()> {
        let query = self.field.value();
        log::debug!("suggest refresh for {query:?}");
        self.matches = (self.lookup)(query).map_err(PromptError::Callback)?;
        self.highlighted = None;
        self.viewport = Viewport::new(self.matches.len(), self.scroll);
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

    /// Step the highlight through the suggestions and back to none.
    fn highlight_next(&mut self) {
        self.highlighted = match self.highlighted {
            _ if self.matches.is_empty() => None,
            None => Some(0),
            Some(index) if index + 1 >= self.matches.len() => None,
            Some(index) => Some(index + 1),
        };
        self.follow_highlight();
    }

    fn highlight_previous(&mut self) {
        self.highlighted = match self.highlighted {
            _ if self.matches.is_empty() => None,
            None => Some(self.matches.len() - 1),
            Some(0) => None,
            Some(index) => Some(index - 1),
        };
        self.follow_highlight();
    }

    fn follow_highlight(&mut self) {
        match self.highlighted {
            Some(index) => self.viewport.select(index),
            None => self.viewport.select_first(),
        }
    }
}

impl Widget for SuggestPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        match key {
            KeyToken::Control(ControlKey::Enter) => {
                if let Some(choice) = self.highlighted().map(str::to_string) {
                    self.field.set_value(choice);
                }
                return Ok(KeyOutcome::Submit);
            }
            KeyToken::Escape(EscapeKey::Down)
            | KeyToken::Control(ControlKey::Tab | ControlKey::CtrlN) => self.highlight_next(),
            KeyToken::Escape(EscapeKey::Up | EscapeKey::BackTab)
            | KeyToken::Control(ControlKey::CtrlP) => self.highlight_previous(),
            _ => {
                let before = self.field.value().to_string();
                if self.field.handle_key(key) && self.field.value() != before {
                    self.refresh()?;
                }
            }
        }
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.field.value().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        let body = match ctx.state {
            PromptState::Submitted => vec![theme::gray(&self.field.render_plain())],
            PromptState::Cancelled => vec![self.field.render_cancelled()],
            _ => {
                let mut lines = vec![self.field.render_active(style.width)];
                let rows = self.viewport.visible_range().map(|index| {
                    let option = &self.matches[index];
                    if Some(index) == self.highlighted {
                        format!("{} {option}", theme::cyan("›"))
                    } else {
                        format!("  {}", theme::dim(option))
                    }
                });
                lines.extend(theme::scrollbar(rows.collect(), &self.viewport, style.width));
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
        self.field.value().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use promptkit_core::Prompt;

    const NAMES: [&str; 4] = ["Taylor", "Dayle", "Jess", "Nuno"];

    fn start(mut widget: SuggestPrompt) -> Prompt<SuggestPrompt> {
        widget.refresh().unwrap();
        let mut prompt = Prompt::new(widget);
        prompt.start().unwrap();
        prompt
    }

    #[test]
    fn test_typing_filters_and_clears_highlight() {
        let mut prompt = start(SuggestPrompt::new("Name").with_options(NAMES));
        assert_eq!(prompt.widget().matches().len(), 4);

        prompt.feed_key(&EscapeKey::Down.into()).unwrap();
        assert_eq!(prompt.widget().highlighted(), Some("Taylor"));

        prompt.feed_key(&'A'.into()).unwrap();
        prompt.feed_key(&'y'.into()).unwrap();
        assert_eq!(prompt.widget().matches(), ["Taylor", "Dayle"]);
        assert_eq!(prompt.widget().highlighted(), None);
    }

    #[test]
    fn test_highlight_cycles_through_none() {
        let mut prompt = start(SuggestPrompt::new("Name").with_options(["a1", "a2"]));
        prompt.feed_key(&EscapeKey::Up.into()).unwrap();
        assert_eq!(prompt.widget().highlighted(), Some("a2"));
        prompt.feed_key(&ControlKey::Tab.into()).unwrap();
        assert_eq!(prompt.widget().highlighted(), None);
        prompt.feed_key(&ControlKey::Tab.into()).unwrap();
        assert_eq!(prompt.widget().highlighted(), Some("a1"));
    }

    #[test]
    fn test_enter_takes_highlighted_suggestion() {
        let mut prompt = start(SuggestPrompt::new("Name").with_options(NAMES));
        prompt.feed_key(&'j'.into()).unwrap();
        prompt.feed_key(&EscapeKey::Down.into()).unwrap();
        prompt.feed_key(&ControlKey::Enter.into()).unwrap();
        assert_eq!(prompt.value().unwrap(), "Jess");
    }

    #[test]
    fn test_free_text_is_accepted() {
        let mut prompt = start(SuggestPrompt::new("Name").with_options(NAMES));
        for c in "Zoe".chars() {
            prompt.feed_key(&c.into()).unwrap();
        }
        assert!(prompt.widget().matches().is_empty());
        prompt.feed_key(&ControlKey::Enter.into()).unwrap();
        assert_eq!(prompt.value().unwrap(), "Zoe");
    }

    #[test]
    fn test_lookup_error_fails_prompt() {
        let mut prompt = start(SuggestPrompt::new("Name").with_lookup(|query: &str| {
            if query.is_empty() {
                Ok(Vec::new())
            } else {
                Err("directory offline".into())
            }
        }));
        let err = prompt.feed_key(&'a'.into()).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
        assert_eq!(prompt.state(), PromptState::Errored);
    }
}
