//! Prompt lifecycle state machine.
//!
//! A [`Prompt`] wraps a [`Widget`] (the concrete input control) and drives it
//! through its lifecycle:
//!
//! ```text
//! Idle --start--> Active --submit--> Validating --ok--> Submitted
//!                   ^                    |
//!                   +----- message ------+
//! Active --Ctrl-C / cancel key--> Cancelled
//! Active --callback error--> Errored
//! ```
//!
//! Widgets with several input modes (a table with a search box and a
//! jump-to-page box, for instance) describe each mode as a sub-state. Only the
//! listener for the current sub-state receives keys; entering a sub-state
//! replaces it and exiting restores the previous one.

use crate::console::Terminal;
use crate::error::{BoxError, PromptError, PromptResult};
use crate::key::KeyToken;
use crate::renderer::{Frame, RenderEngine};
use std::fmt;

/// Message shown in place of a prompt after it is cancelled.
pub const DEFAULT_CANCEL_MESSAGE: &str = "Cancelled.";

/// Lifecycle state of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptState {
    Idle,
    Active,
    /// Validators are running on a submitted value.
    Validating,
    Submitted,
    Cancelled,
    Errored,
}

impl PromptState {
    /// Whether no further keys will be accepted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PromptState::Submitted | PromptState::Cancelled | PromptState::Errored
        )
    }
}

/// What a widget's key listener asks the engine to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Submit,
    Cancel,
    /// Hand the terminal to [`Widget::run_suspended`] (e.g. to run a nested
    /// prompt) and resume afterwards.
    Suspend,
}

/// Result of feeding one key to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    /// Submit was requested but a validator returned a message.
    Rejected,
    Submitted,
    Cancelled,
    Suspend,
}

/// A named input mode of a widget.
pub trait SubState: Clone + PartialEq + fmt::Debug {
    fn name(&self) -> &'static str;
}

impl SubState for () {
    fn name(&self) -> &'static str {
        "default"
    }
}

/// Stack of active sub-states; the top one owns the keyboard.
#[derive(Debug, Clone)]
pub struct SubStates<S> {
    base: S,
    stack: Vec<S>,
}

impl<S: SubState> SubStates<S> {
    pub fn new(base: S) -> Self {
        Self {
            base,
            stack: Vec::new(),
        }
    }

    pub fn current(&self) -> &S {
        self.stack.last().unwrap_or(&self.base)
    }

    pub fn name(&self) -> &'static str {
        self.current().name()
    }

    /// Make `state` the active listener.
    pub fn enter(&mut self, state: S) {
        log::debug!("sub-state {} -> {}", self.name(), state.name());
        self.stack.push(state);
    }

    /// Return to the previous listener. The base state cannot be exited.
    pub fn exit(&mut self) -> Option<S> {
        let left = self.stack.pop();
        if let Some(left) = &left {
            log::debug!("sub-state {} -> {}", left.name(), self.name());
        }
        left
    }

    /// Drop every entered state and return to the base.
    pub fn exit_all(&mut self) {
        self.stack.clear();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// What a key listener may touch besides the widget itself.
pub struct KeyContext<'a, S> {
    sub_states: &'a mut SubStates<S>,
    width: usize,
}

impl<'a, S: SubState> KeyContext<'a, S> {
    pub fn new(sub_states: &'a mut SubStates<S>, width: usize) -> Self {
        Self { sub_states, width }
    }

    pub fn sub_state(&self) -> &S {
        self.sub_states.current()
    }

    pub fn enter(&mut self, state: S) {
        self.sub_states.enter(state);
    }

    pub fn exit(&mut self) -> Option<S> {
        self.sub_states.exit()
    }

    /// Terminal width in columns.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Everything a widget needs to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a, S> {
    pub state: PromptState,
    pub sub_state: &'a S,
    /// Validation or callback message to show inline.
    pub error: Option<&'a str>,
    pub cancel_message: &'a str,
    pub width: usize,
}

/// A concrete input control driven by [`Prompt`].
pub trait Widget {
    type Output: Clone;
    type SubState: SubState + Default;

    /// React to one key in the current sub-state.
    fn handle_key(
        &mut self,
        key: &KeyToken,
        ctx: &mut KeyContext<'_, Self::SubState>,
    ) -> PromptResult<KeyOutcome>;

    /// The value that would be submitted right now.
    fn value(&self) -> Self::Output;

    fn render(&self, ctx: &RenderContext<'_, Self::SubState>) -> Frame;

    /// Whether the current value counts as empty for [`Validator::Required`].
    fn is_empty_value(&self) -> bool {
        false
    }

    /// Run whatever the widget suspended itself for. The outer frame has
    /// been erased and is redrawn afterwards.
    fn run_suspended(&mut self, _terminal: &Terminal) -> PromptResult<()> {
        Ok(())
    }
}

/// Custom validation callback.
///
/// `Ok(Some(message))` rejects the value with `message`, `Ok(None)` accepts
/// it, and `Err` aborts the prompt.
pub type ValidateFn<T> = Box<dyn Fn(&T) -> Result<Option<String>, BoxError>>;

pub enum Validator<T> {
    /// Reject an empty value with the given message.
    Required(String),
    Custom(ValidateFn<T>),
}

impl<T> Validator<T> {
    pub fn required(message: impl Into<String>) -> Self {
        Validator::Required(message.into())
    }

    /// Fallible validator.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&T) -> Result<Option<String>, BoxError> + 'static,
    {
        Validator::Custom(Box::new(f))
    }

    /// Validator that cannot fail, only reject.
    pub fn check<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<String> + 'static,
    {
        Validator::Custom(Box::new(move |value| Ok(f(value))))
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Required(message) => f.debug_tuple("Required").field(message).finish(),
            Validator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Lifecycle engine around one widget.
pub struct Prompt<W: Widget> {
    widget: W,
    state: PromptState,
    sub_states: SubStates<W::SubState>,
    validators: Vec<Validator<W::Output>>,
    error_message: Option<String>,
    submitted: Option<W::Output>,
    cancel_message: String,
    width: usize,
}

impl<W: Widget> Prompt<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            state: PromptState::Idle,
            sub_states: SubStates::new(W::SubState::default()),
            validators: Vec::new(),
            error_message: None,
            submitted: None,
            cancel_message: DEFAULT_CANCEL_MESSAGE.to_string(),
            width: crate::console::DEFAULT_TERMINAL_WIDTH,
        }
    }

    pub fn with_validator(mut self, validator: Validator<W::Output>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn add_validator(&mut self, validator: Validator<W::Output>) {
        self.validators.push(validator);
    }

    pub fn with_cancel_message(mut self, message: impl Into<String>) -> Self {
        self.cancel_message = message.into();
        self
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    pub fn sub_state(&self) -> &W::SubState {
        self.sub_states.current()
    }

    /// The inline message currently shown, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Width used for key handling and rendering when not driven by
    /// [`Prompt::run`].
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Idle -> Active.
    pub fn start(&mut self) -> PromptResult<()> {
        if self.state != PromptState::Idle {
            return Err(PromptError::InvalidTransition {
                from: self.state,
                event: "start",
            });
        }
        self.set_state(PromptState::Active);
        Ok(())
    }

    /// Dispatch one key to the active listener.
    pub fn feed_key(&mut self, key: &KeyToken) -> PromptResult<Transition> {
        if self.state != PromptState::Active {
            return Err(PromptError::InvalidTransition {
                from: self.state,
                event: "feed_key",
            });
        }

        if key.is_interrupt() {
            self.cancel();
            return Ok(Transition::Cancelled);
        }

        self.error_message = None;

        let mut ctx = KeyContext::new(&mut self.sub_states, self.width);
        let outcome = match self.widget.handle_key(key, &mut ctx) {
            Ok(outcome) => outcome,
            Err(PromptError::Cancelled) => KeyOutcome::Cancel,
            Err(e) => return Err(self.fail(e)),
        };

        match outcome {
            KeyOutcome::Continue => Ok(Transition::Continue),
            KeyOutcome::Suspend => Ok(Transition::Suspend),
            KeyOutcome::Cancel => {
                self.cancel();
                Ok(Transition::Cancelled)
            }
            KeyOutcome::Submit => self.submit(),
        }
    }

    /// Run validators on the current value and submit it if they pass.
    pub fn submit(&mut self) -> PromptResult<Transition> {
        if self.state != PromptState::Active {
            return Err(PromptError::InvalidTransition {
                from: self.state,
                event: "submit",
            });
        }

        self.set_state(PromptState::Validating);
        let value = self.widget.value();

        match self.run_validators(&value) {
            Err(e) => Err(self.fail(PromptError::Callback(e))),
            Ok(Some(message)) => {
                log::debug!("validation rejected value: {message}");
                self.error_message = Some(message);
                self.set_state(PromptState::Active);
                Ok(Transition::Rejected)
            }
            Ok(None) => {
                self.submitted = Some(value);
                self.set_state(PromptState::Submitted);
                Ok(Transition::Submitted)
            }
        }
    }

    /// First rejection message, if any validator rejects `value`.
    fn run_validators(&self, value: &W::Output) -> Result<Option<String>, BoxError> {
        for validator in &self.validators {
            let message = match validator {
                Validator::Required(message) => {
                    self.widget.is_empty_value().then(|| message.clone())
                }
                Validator::Custom(validate) => validate(value)?.filter(|m| !m.is_empty()),
            };
            if message.is_some() {
                return Ok(message);
            }
        }
        Ok(None)
    }

    /// Move to `Cancelled` from any non-terminal state.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.set_state(PromptState::Cancelled);
        }
    }

    /// The submitted value.
    pub fn value(&self) -> PromptResult<&W::Output> {
        match (&self.state, &self.submitted) {
            (PromptState::Submitted, Some(value)) => Ok(value),
            (state, _) => Err(PromptError::NotSubmitted(*state)),
        }
    }

    /// Render the widget for the current state.
    ///
    /// A cancelled prompt always shows the cancel message, even if the widget
    /// does not draw it.
    pub fn frame(&self, width: usize) -> Frame {
        let ctx = RenderContext {
            state: self.state,
            sub_state: self.sub_states.current(),
            error: self.error_message.as_deref(),
            cancel_message: &self.cancel_message,
            width,
        };
        let mut frame = self.widget.render(&ctx);
        if self.state == PromptState::Cancelled && !frame.contains(&self.cancel_message) {
            frame.push(&self.cancel_message);
        }
        frame
    }

    /// Run the prompt to completion on `terminal`.
    ///
    /// Raw mode and a hidden cursor are held for the whole call and released
    /// on every exit path, including errors from callbacks and panics.
    pub fn run(&mut self, terminal: &Terminal) -> PromptResult<W::Output> {
        let _raw_mode = terminal.input().enable_raw_mode()?;
        self.width = terminal.width();
        let mut engine = RenderEngine::new(terminal.output()).with_width(self.width);

        self.start()?;

        let result = self.event_loop(terminal, &mut engine);
        match engine.restore() {
            Ok(()) => result,
            Err(e) if result.is_err() => {
                log::warn!("could not show cursor: {e}");
                result
            }
            Err(e) => Err(e.into()),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &Terminal,
        engine: &mut RenderEngine<'_>,
    ) -> PromptResult<W::Output> {
        engine.render_frame(&self.frame(self.width))?;

        loop {
            let Some(keys) = terminal.input().read_keys()? else {
                log::warn!("input closed while prompt was active");
                self.set_state(PromptState::Errored);
                self.render_final(engine);
                return Err(PromptError::InputClosed);
            };

            for key in &keys {
                let transition = match self.feed_key(key) {
                    Ok(transition) => transition,
                    Err(e) => {
                        self.render_final(engine);
                        return Err(e);
                    }
                };

                match transition {
                    Transition::Continue | Transition::Rejected => {}
                    Transition::Submitted => {
                        engine.render_frame(&self.frame(self.width))?;
                        return self.value().cloned();
                    }
                    Transition::Cancelled => {
                        engine.render_frame(&self.frame(self.width))?;
                        return Err(PromptError::Cancelled);
                    }
                    Transition::Suspend => {
                        engine.erase()?;
                        if let Err(e) = self.widget.run_suspended(terminal) {
                            let e = match e {
                                PromptError::Cancelled => {
                                    self.cancel();
                                    PromptError::Cancelled
                                }
                                other => self.fail(other),
                            };
                            engine.reset();
                            self.render_final(engine);
                            return Err(e);
                        }
                        engine.reset();
                        self.width = terminal.width();
                        engine.set_width(self.width);
                    }
                }
            }

            engine.render_frame(&self.frame(self.width))?;
        }
    }

    /// Draw the frame shown when the loop ends with an error. A failure to
    /// draw is logged so the error that ended the loop is the one returned.
    fn render_final(&self, engine: &mut RenderEngine<'_>) {
        if let Err(e) = engine.render_frame(&self.frame(self.width)) {
            log::warn!("could not draw final frame: {e}");
        }
    }

    fn fail(&mut self, error: PromptError) -> PromptError {
        log::debug!("prompt failed: {error}");
        self.error_message = Some(error.to_string());
        self.set_state(PromptState::Errored);
        error
    }

    fn set_state(&mut self, state: PromptState) {
        log::debug!("prompt state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

impl<W: Widget + fmt::Debug> fmt::Debug for Prompt<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("widget", &self.widget)
            .field("state", &self.state)
            .field("sub_state", self.sub_states.current())
            .field("error_message", &self.error_message)
            .finish()
    }
}
