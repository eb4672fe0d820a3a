//! Wait for Enter before carrying on.

use promptkit_core::{
    wrap_lines, Frame, KeyContext, KeyOutcome, KeyToken, PromptResult, PromptState,
    RenderContext, Terminal, Widget,
};

use crate::theme;

pub const DEFAULT_MESSAGE: &str = "Press enter to continue...";

/// Show a message and block until Enter is pressed. Ctrl-C cancels.
pub struct PausePrompt {
    message: String,
}

impl PausePrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn prompt(self) -> PromptResult<bool> {
        crate::with_native_terminal(|terminal| self.prompt_on(terminal))
    }

    pub fn prompt_on(self, terminal: &Terminal) -> PromptResult<bool> {
        crate::run_widget(self, Vec::new(), terminal)
    }
}

impl Default for PausePrompt {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}

impl Widget for PausePrompt {
    type Output = bool;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(KeyOutcome::Submit);
        }
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> bool {
        true
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let paint: fn(&str) -> String = match ctx.state {
            PromptState::Submitted => theme::gray,
            PromptState::Cancelled => theme::strikethrough,
            _ => theme::green,
        };
        let mut frame = Frame::from_lines(
            wrap_lines(&self.message, ctx.width.saturating_sub(2).max(1))
                .iter()
                .map(|line| format!(" {}", paint(line))),
        );
        if let Some(footer) = theme::footer(ctx.state, ctx.error, ctx.cancel_message, "") {
            frame.push(footer);
        }
        frame
    }
}
