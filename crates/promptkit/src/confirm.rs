use promptkit_core::{
    ControlKey, EscapeKey, Frame, KeyContext, KeyOutcome, KeyToken, PromptResult, PromptState,
    RenderContext, Terminal, Validator, Widget,
};

use crate::theme::{self, BoxStyle};

/// Yes/no question. `y` and `n` pick an answer, arrows and `h/j/k/l` toggle.
pub struct ConfirmPrompt {
    label: String,
    confirmed: bool,
    yes: String,
    no: String,
    hint: String,
    validators: Vec<Validator<bool>>,
}

impl ConfirmPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confirmed: true,
            yes: "Yes".to_string(),
            no: "No".to_string(),
            hint: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn with_default(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    /// Labels for the two answers.
    pub fn with_labels(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes = yes.into();
        self.no = no.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Only accept "yes", showing `message` otherwise.
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.validators.push(Validator::required(message));
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(bool) -> Option<String> + 'static,
    {
        self.validators
            .push(Validator::check(move |value: &bool| validate(*value)));
        self
    }

    /// Label of the current answer.
    pub fn label(&self) -> &str {
        if self.confirmed {
            &self.yes
        } else {
            &self.no
        }
    }

    pub fn prompt(self) -> PromptResult<bool> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(mut self, terminal: &Terminal) -> PromptResult<bool> {
        let validators = std::mem::take(&mut self.validators);
        crate::run_widget(self, validators, terminal)
    }

    fn option(&self, label: &str, selected: bool) -> String {
        if selected {
            format!("{} {}", theme::green("●"), label)
        } else {
            theme::dim(&format!("○ {label}"))
        }
    }
}

impl Widget for ConfirmPrompt {
    type Output = bool;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        match key {
            KeyToken::Control(ControlKey::Enter) => return Ok(KeyOutcome::Submit),
            KeyToken::Char('y') | KeyToken::Char('Y') => self.confirmed = true,
            KeyToken::Char('n') | KeyToken::Char('N') => self.confirmed = false,
            KeyToken::Char('h' | 'j' | 'k' | 'l')
            | KeyToken::Control(ControlKey::Tab)
            | KeyToken::Escape(
                EscapeKey::Up | EscapeKey::Down | EscapeKey::Left | EscapeKey::Right,
            ) => self.confirmed = !self.confirmed,
            _ => {}
        }
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> bool {
        self.confirmed
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let style = BoxStyle::new(&self.label, ctx.state, ctx.width).with_error(ctx.error.is_some());
        let body = match ctx.state {
            PromptState::Submitted => theme::gray(self.label()),
            PromptState::Cancelled => theme::strikethrough(self.label()),
            _ => format!(
                "{} {} {}",
                self.option(&self.yes, self.confirmed),
                theme::dim("/"),
                self.option(&self.no, !self.confirmed)
            ),
        };

        let mut frame = Frame::from_lines(style.draw(&[body]));
        if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, &self.hint) {
            frame.push(footer);
        }
        frame
    }

    fn is_empty_value(&self) -> bool {
        !self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptkit_core::Prompt;

    fn run_keys(prompt: ConfirmPrompt, keys: &[KeyToken]) -> Prompt<ConfirmPrompt> {
        let mut prompt = Prompt::new(prompt);
        prompt.start().unwrap();
        for key in keys {
            prompt.feed_key(key).unwrap();
        }
        prompt
    }

    #[test]
    fn test_default_answer() {
        let prompt = run_keys(ConfirmPrompt::new("Continue?"), &[ControlKey::Enter.into()]);
        assert_eq!(prompt.value().unwrap(), &true);
    }

    #[test]
    fn test_toggle_keys() {
        let prompt = run_keys(
            ConfirmPrompt::new("Continue?"),
            &['l'.into(), EscapeKey::Left.into(), 'j'.into(), ControlKey::Enter.into()],
        );
        assert_eq!(prompt.value().unwrap(), &false);
    }

    #[test]
    fn test_direct_answers() {
        let prompt = run_keys(
            ConfirmPrompt::new("Continue?").with_default(false),
            &['y'.into(), ControlKey::Enter.into()],
        );
        assert_eq!(prompt.value().unwrap(), &true);
    }

    #[test]
    fn test_submitted_frame_shows_answer_label() {
        let prompt = run_keys(
            ConfirmPrompt::new("Deploy?").with_labels("Ship it", "Hold"),
            &['n'.into(), ControlKey::Enter.into()],
        );
        let text = prompt.frame(80).plain_text();
        assert!(text.contains("Deploy?"));
        assert!(text.contains("Hold"));
        assert!(!text.contains("Ship it"));
    }

    #[test]
    fn test_required_rejects_no() {
        let mut prompt = Prompt::new(ConfirmPrompt::new("Accept the terms?").with_default(false))
            .with_validator(Validator::required("You must accept the terms."));
        prompt.start().unwrap();
        prompt.feed_key(&ControlKey::Enter.into()).unwrap();
        assert_eq!(prompt.state(), PromptState::Active);
        assert!(prompt.frame(80).contains("You must accept the terms."));
    }
}
