use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use promptkit_core::{
    apply_text_key, ClearType, ConsoleError, ConsoleOutput, ConsoleResult, ControlKey, Frame,
    KeyContext, KeyOutcome, KeyToken, Prompt, PromptError, PromptResult, PromptState,
    RenderContext, Terminal, TextEditBuffer, Validator, Widget,
};
use promptkit_io::{fake_terminal, mock_terminal, typed, MockConsoleInput};

#[derive(Debug, Default)]
struct LineInput {
    buffer: TextEditBuffer,
}

impl Widget for LineInput {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        if key.is_enter() {
            return Ok(KeyOutcome::Submit);
        }
        apply_text_key(&mut self.buffer, key);
        Ok(KeyOutcome::Continue)
    }

    fn value(&self) -> String {
        self.buffer.text().to_string()
    }

    fn render(&self, ctx: &RenderContext<'_, ()>) -> Frame {
        let mut frame = Frame::new();
        match ctx.state {
            PromptState::Submitted => frame.push(format!("Name: {}", self.buffer.text())),
            _ => frame.push(format!("Name? {}", self.buffer.text())),
        }
        if let Some(error) = ctx.error {
            frame.push(error);
        }
        frame
    }

    fn is_empty_value(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Opens a nested line prompt on `n` and adopts its answer.
#[derive(Debug, Default)]
struct Picker {
    picked: String,
}

impl Widget for Picker {
    type Output = String;
    type SubState = ();

    fn handle_key(&mut self, key: &KeyToken, _ctx: &mut KeyContext<'_, ()>) -> PromptResult<KeyOutcome> {
        Ok(match key {
            KeyToken::Char('n') => KeyOutcome::Suspend,
            k if k.is_enter() => KeyOutcome::Submit,
            _ => KeyOutcome::Continue,
        })
    }

    fn value(&self) -> String {
        self.picked.clone()
    }

    fn render(&self, _ctx: &RenderContext<'_, ()>) -> Frame {
        Frame::from_lines([format!("Picked: {}", self.picked), "n: new".to_string()])
    }

    fn run_suspended(&mut self, terminal: &Terminal) -> PromptResult<()> {
        self.picked = Prompt::new(LineInput::default()).run(terminal)?;
        Ok(())
    }
}

fn enter() -> KeyToken {
    ControlKey::Enter.into()
}

#[test]
fn submits_typed_text() {
    let mut keys = typed("Jess");
    keys.push(enter());
    let (terminal, output) = fake_terminal(keys);

    let value = Prompt::new(LineInput::default()).run(&terminal).unwrap();

    assert_eq!(value, "Jess");
    assert_eq!(output.last_frame().unwrap().plain_lines(), vec!["Name: Jess"]);
    assert!(output.is_cursor_visible());
}

#[test]
fn backspace_and_delete_edit_in_place() {
    let mut keys = typed("Jess");
    keys.push(ControlKey::Backspace.into());
    keys.push(promptkit_core::EscapeKey::Left.into());
    keys.push(promptkit_core::EscapeKey::Delete.into());
    keys.push(enter());
    let (terminal, _) = fake_terminal(keys);

    let value = Prompt::new(LineInput::default()).run(&terminal).unwrap();

    assert_eq!(value, "Je");
}

#[test]
fn single_line_change_rewrites_only_that_line() {
    let mut keys = typed("J");
    keys.push(enter());
    let (terminal, output) = fake_terminal(keys);

    Prompt::new(LineInput::default()).run(&terminal).unwrap();

    let text = output.output();
    assert!(text.starts_with("\x1b[?25lName? \r\n"));
    assert!(text.contains("\x1b[1A\r\x1b[2KName? J\r\x1b[1B"));
    assert!(text.ends_with("\x1b[?25h"));
}

#[test]
fn whole_batch_is_applied_before_rendering() {
    let input = MockConsoleInput::new();
    input.queue_bytes(b"Jess\r");
    let (terminal, output) = mock_terminal(input);

    let value = Prompt::new(LineInput::default()).run(&terminal).unwrap();

    assert_eq!(value, "Jess");
    let frames: Vec<String> = output.frames().iter().map(Frame::plain_text).collect();
    assert_eq!(frames, vec!["Name? ", "Name: Jess"]);
}

#[test]
fn ctrl_c_cancels_and_restores_terminal() {
    let input = MockConsoleInput::with_keys(vec![KeyToken::Char('a'), ControlKey::CtrlC.into()]);
    let (terminal, output) = mock_terminal(input.clone());

    let err = Prompt::new(LineInput::default()).run(&terminal).unwrap_err();

    assert!(err.is_cancelled());
    assert!(output.last_frame().unwrap().contains("Cancelled."));
    assert!(output.is_cursor_visible());
    assert!(!input.is_raw_mode_active());
}

#[test]
fn closed_input_is_an_error() {
    let (terminal, output) = fake_terminal(typed("Je"));

    let err = Prompt::new(LineInput::default()).run(&terminal).unwrap_err();

    assert!(matches!(err, PromptError::InputClosed));
    assert!(output.is_cursor_visible());
}

#[test]
fn validation_message_shown_until_next_key() {
    let mut keys = vec![enter()];
    keys.extend(typed("Al"));
    keys.push(enter());
    let (terminal, output) = fake_terminal(keys);

    let value = Prompt::new(LineInput::default())
        .with_validator(Validator::required("Please enter a name."))
        .run(&terminal)
        .unwrap();

    assert_eq!(value, "Al");
    let frames = output.frames();
    assert_eq!(frames[1].plain_lines(), vec!["Name? ", "Please enter a name."]);
    assert_eq!(frames[2].plain_lines(), vec!["Name? A"]);
}

#[test]
fn failing_validator_aborts_with_callback_error() {
    let (terminal, output) = fake_terminal(vec![KeyToken::Char('x'), enter()]);

    let err = Prompt::new(LineInput::default())
        .with_validator(Validator::custom(|_: &String| Err("lookup failed".into())))
        .run(&terminal)
        .unwrap_err();

    assert_eq!(err.to_string(), "Callback failed: lookup failed");
    assert!(output.last_frame().unwrap().contains("lookup failed"));
    assert!(output.is_cursor_visible());
}

/// Output whose every call fails once `broken` is set.
struct BreakableOutput {
    broken: Arc<AtomicBool>,
}

impl BreakableOutput {
    fn check(&self) -> ConsoleResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(ConsoleError::Terminal("terminal went away".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ConsoleOutput for BreakableOutput {
    fn write_text(&self, _text: &str) -> ConsoleResult<()> {
        self.check()
    }

    fn move_cursor_relative(&self, _row_delta: i16, _col_delta: i16) -> ConsoleResult<()> {
        self.check()
    }

    fn clear(&self, _clear_type: ClearType) -> ConsoleResult<()> {
        self.check()
    }

    fn set_cursor_visible(&self, _visible: bool) -> ConsoleResult<()> {
        self.check()
    }

    fn flush(&self) -> ConsoleResult<()> {
        self.check()
    }
}

#[test]
fn draw_failure_keeps_callback_error() {
    let broken = Arc::new(AtomicBool::new(false));
    let input = MockConsoleInput::with_keys(vec![KeyToken::Char('x'), enter()]);
    let terminal = Terminal::new(
        Box::new(input.clone()),
        Box::new(BreakableOutput {
            broken: Arc::clone(&broken),
        }),
    );

    let trip = Arc::clone(&broken);
    let err = Prompt::new(LineInput::default())
        .with_validator(Validator::custom(move |_: &String| {
            trip.store(true, Ordering::SeqCst);
            Err("lookup failed".into())
        }))
        .run(&terminal)
        .unwrap_err();

    assert!(matches!(err, PromptError::Callback(_)));
    assert_eq!(err.to_string(), "Callback failed: lookup failed");
    assert!(!input.is_raw_mode_active());
}

#[test]
fn wide_lines_are_cut_to_terminal_width() {
    for width in [20u16, 40, 80] {
        let input = MockConsoleInput::with_keys(typed(&"x".repeat(120))).with_window_size(width, 24);
        let (terminal, output) = mock_terminal(input);

        let err = Prompt::new(LineInput::default()).run(&terminal).unwrap_err();

        assert!(matches!(err, PromptError::InputClosed));
        for frame in output.frames() {
            assert!(
                frame.max_width() <= width as usize,
                "width {width}: {:?}",
                frame.plain_lines()
            );
        }
        assert!(output.last_frame().unwrap().plain_text().ends_with('…'));
    }
}

#[test]
fn nested_prompt_runs_on_same_terminal() {
    let mut keys = vec![KeyToken::Char('n')];
    keys.extend(typed("inner"));
    keys.push(enter());
    keys.push(enter());
    let input = MockConsoleInput::with_keys(keys);
    let (terminal, output) = mock_terminal(input.clone());

    let value = Prompt::new(Picker::default()).run(&terminal).unwrap();

    assert_eq!(value, "inner");
    assert_eq!(input.raw_mode_entries(), 2);
    assert!(!input.is_raw_mode_active());
    assert!(output.is_cursor_visible());

    let frames: Vec<String> = output.frames().iter().map(Frame::plain_text).collect();
    assert_eq!(frames.first().map(String::as_str), Some("Picked: \nn: new"));
    assert!(frames.contains(&"Name: inner".to_string()));
    assert_eq!(frames.last().map(String::as_str), Some("Picked: inner\nn: new"));
}

#[test]
fn cancelled_nested_prompt_cancels_outer() {
    let (terminal, output) = fake_terminal(vec![KeyToken::Char('n'), ControlKey::CtrlC.into()]);

    let err = Prompt::new(Picker::default()).run(&terminal).unwrap_err();

    assert!(err.is_cancelled());
    assert!(output.last_frame().unwrap().contains("Cancelled."));
    assert!(output.is_cursor_visible());
}
