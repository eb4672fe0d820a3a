//! Multiple choice from a scrolling list.

use promptkit_core::{
    apply_list_key, ControlKey, Frame, KeyContext, KeyOutcome, KeyToken, PromptError,
    PromptResult, PromptState, RenderContext, Terminal, Validator, Viewport, Widget,
};

use crate::select::DEFAULT_SCROLL;
use crate::text::DEFAULT_REQUIRED_MESSAGE;
use crate::theme::{self, BoxStyle};

pub const DEFAULT_HINT: &str = "Use the space bar to select options.";

/// Prompt to pick any number of options. The value is the chosen keys in
/// option order.
pub struct MultiSelectPrompt {
    label: String,
    hint: String,
    options: Vec<(String, String)>,
    checked: Vec<bool>,
    scroll: usize,
    viewport: Viewport,
    validators: Vec<Validator<Vec<String>>>,
}

impl MultiSelectPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: DEFAULT_HINT.to_string(),
            options: Vec::new(),
            checked: Vec::new(),
            scroll: DEFAULT_SCROLL,
            viewport: Viewport::new(0, DEFAULT_SCROLL),
            validators: Vec::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push((key.into(), label.into()));
        self.checked.push(false);
        self.viewport.set_total(self.options.len());
        self
    }

    pub fn with_options<K, L>(mut self, options: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        for (key, label) in options {
            self = self.with_option(key, label);
        }
        self
    }

    /// Check the options with these keys up front.
    pub fn with_defaults<K: AsRef<str>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        for key in keys {
            if let Some(index) = self.options.iter().position(|(k, _)| k == key.as_ref()) {
                self.checked[index] = true;
            }
        }
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

    /// Require at least one checked option.
    pub fn required(self) -> Self {
        self.required_with(DEFAULT_REQUIRED_MESSAGE)
    }

    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.validators.push(Validator::required(message));
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&[String]) -> Option<String> + 'static,
    {
        self.validators
            .push(Validator::check(move |value: &Vec<String>| validate(value)));
        self
    }

    pub fn prompt(self) -> PromptResult<Vec<String>> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<Vec<String>> {
        if self.options.is_empty() {
            return Err(PromptError::InvalidConfiguration(
                "multiselect prompt needs at least one option".to_string(),
            ));
        }
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }

    fn toggle_all(&mut self) {
        let all = self.checked.iter().all(|c| *c);
        self.checked.iter_mut().for_each(|c| *c = !all);
    }

    fn checked_labels(&self) -> Vec<&str> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|((_, label), _)| label.as_str())
            .collect()
    }
}

impl Widget for MultiSelectPrompt {
    type Output = Vec<String>;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        match key {
            k if k.is_enter() => return Ok(KeyOutcome::Submit),
            KeyToken::Char(' ') => {
                if let Some(checked) = self.checked.get_mut(self.viewport.selected()) {
                    *checked = !*checked;
                }
            }
            KeyToken::Control(ControlKey::CtrlA) => self.toggle_all(),
            _ => {
                apply_list_key(&mut self.viewport, key, true);
            }
        }
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|((key, _), _)| key.clone())
            .collect()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let count = self.checked.iter().filter(|c| **c).count();
        let info = if count > 0 {
            format!("{count} selected")
        } else {
            String::new()
        };
        let mut style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        if !info.is_empty() && !ctx.state.is_terminal() {
            style = style.with_info(&info);
        }

        let body = match ctx.state {
            PromptState::Submitted => {
                let labels = self.checked_labels();
                if labels.is_empty() {
                    vec![theme::dim("None")]
                } else {
                    labels.into_iter().map(theme::gray).collect()
                }
            }
            PromptState::Cancelled => self
                .checked_labels()
                .into_iter()
                .map(theme::strikethrough)
                .collect(),
            _ => {
                let rows = self.viewport.visible_range().map(|index| {
                    let (_, label) = &self.options[index];
                    let active = index == self.viewport.selected();
                    let mark = match (self.checked[index], active) {
                        (true, _) => theme::cyan("◼"),
                        (false, true) => theme::cyan("◻"),
                        (false, false) => theme::dim("◻"),
                    };
                    if active {
                        format!("{} {mark} {label}", theme::cyan("›"))
                    } else {
                        format!("  {mark} {}", theme::dim(label))
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

    fn is_empty_value(&self) -> bool {
        !self.checked.iter().any(|c| *c)
    }
}
