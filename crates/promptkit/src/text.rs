//! Free text and password input.

use promptkit_core::{
    Frame, KeyContext, KeyOutcome, KeyToken, PromptResult, PromptState, RenderContext, Terminal,
    Validator, Widget,
};

use crate::field::TextField;
use crate::theme::{self, BoxStyle};

/// Message used by `required()` when none is given.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required.";

/// Prompt for a line of text.
///
/// ```no_run
/// use promptkit::TextPrompt;
///
/// let name = TextPrompt::new("What is your name?")
///     .with_placeholder("E.g. Taylor Otwell")
///     .required()
///     .prompt()?;
/// # Ok::<(), promptkit::PromptError>(())
/// ```
pub struct TextPrompt {
    label: String,
    hint: String,
    field: TextField,
    validators: Vec<Validator<String>>,
}

impl TextPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: String::new(),
            field: TextField::new(),
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field = self.field.with_placeholder(placeholder);
        self
    }

    /// Pre-fill the input. Submitting without typing returns this value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.field.set_value(default);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Reject an empty answer with "Required.".
    pub fn required(self) -> Self {
        self.required_with(DEFAULT_REQUIRED_MESSAGE)
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.validators.push(Validator::required(message));
        self
    }

    /// Reject answers for which `validate` returns a message.
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.validators
            .push(Validator::check(move |value: &String| validate(value.as_str())));
        self
    }

    pub fn with_validator(mut self, validator: Validator<String>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn prompt(self) -> PromptResult<String> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<String> {
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }
}

impl Widget for TextPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(KeyOutcome::Submit);
        }
        self.field.handle_key(key);
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.field.value().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        render_field(&self.label, &self.hint, &self.field, ctx)
    }

    fn is_empty_value(&self) -> bool {
        self.field.value().trim().is_empty()
    }
}

/// Prompt for a secret; typed characters are shown as `•`.
pub struct PasswordPrompt {
    label: String,
    hint: String,
    field: TextField,
    validators: Vec<Validator<String>>,
}

impl PasswordPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: String::new(),
            field: TextField::new().masked('•'),
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field = self.field.with_placeholder(placeholder);
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

    pub fn prompt(self) -> PromptResult<String> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<String> {
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }
}

impl Widget for PasswordPrompt {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(KeyOutcome::Submit);
        }
        self.field.handle_key(key);
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.field.value().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        render_field(&self.label, &self.hint, &self.field, ctx)
    }

    fn is_empty_value(&self) -> bool {
        self.field.is_empty()
    }
}

fn render_field(label: &str, hint: &str, field: &TextField, ctx: &RenderContext<'_, ()>) -> Frame {
    let style = BoxStyle::new(label, ctx.state, ctx.width).with_error(ctx.error.is_some());
    let body = match ctx.state {
        PromptState::Submitted => theme::gray(&field.render_plain()),
        PromptState::Cancelled => field.render_cancelled(),
        _ => field.render_active(style.width),
    };

    let mut frame = Frame::from_lines(style.draw(&[body]));
    if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, hint) {
        frame.push(footer);
    }
    frame
}
