mod common;

use common::Step::{Key, Text};
use common::*;
use pretty_assertions::assert_eq;
use promptkit::{fake_terminal, mock_terminal, MockConsoleInput, PasswordPrompt, PromptError, TextPrompt};

fn run_text(prompt: TextPrompt, steps: &[Step]) -> Result<String, PromptError> {
    let (terminal, _) = fake_terminal(script(steps));
    prompt.prompt_on(&terminal)
}

#[test]
fn typed_name_is_returned() {
    let value = run_text(TextPrompt::new("Name"), &[Text("Jess"), Key(enter())]).unwrap();
    assert_eq!(value, "Jess");
}

#[test]
fn backspace_removes_typo() {
    let value = run_text(
        TextPrompt::new("Name"),
        &[Text("Jez"), Key(backspace()), Text("ss"), Key(enter())],
    )
    .unwrap();
    assert_eq!(value, "Jess");
}

#[test]
fn delete_removes_character_under_cursor() {
    let value = run_text(
        TextPrompt::new("Name"),
        &[Text("Jez"), Key(left()), Key(delete()), Text("ss"), Key(enter())],
    )
    .unwrap();
    assert_eq!(value, "Jess");
}

#[test]
fn default_is_submitted_untouched() {
    let value = run_text(TextPrompt::new("Name").with_default("Jess"), &[Key(enter())]).unwrap();
    assert_eq!(value, "Jess");
}

#[test]
fn ctrl_c_cancels() {
    let input = MockConsoleInput::with_keys(vec![ctrl_c()]);
    let (terminal, output) = mock_terminal(input.clone());

    let err = TextPrompt::new("Name").prompt_on(&terminal).unwrap_err();

    assert!(err.is_cancelled());
    let last = output.last_frame().unwrap();
    assert!(last.contains("Cancelled."));
    assert!(output.is_cursor_visible());
    assert!(!input.is_raw_mode_active());
}

#[test]
fn invalid_value_keeps_input_and_shows_message() {
    let (terminal, output) = fake_terminal(script(&[
        Text("Jo"),
        Key(enter()),
        Key(backspace()),
        Text("ess"),
        Key(enter()),
    ]));

    let value = TextPrompt::new("Name")
        .validate(|name| (name.len() < 3).then(|| "Invalid name.".to_string()))
        .prompt_on(&terminal)
        .unwrap();

    assert_eq!(value, "Jess");
    let frames = output.frames();
    let rejected = frames.iter().position(|f| f.contains("⚠ Invalid name.")).unwrap();
    assert!(frames[rejected].contains("Jo"));
    assert!(!frames[rejected + 1].contains("Invalid name."));
}

#[test]
fn required_rejects_empty_submit() {
    let (terminal, output) = fake_terminal(script(&[Key(enter()), Text("x"), Key(enter())]));

    let value = TextPrompt::new("Name").required().prompt_on(&terminal).unwrap();

    assert_eq!(value, "x");
    assert!(output.frames()[1].contains("⚠ Required."));
}

#[test]
fn submitted_frame_replaces_input_box() {
    let (terminal, output) = fake_terminal(script(&[Text("Jess"), Key(enter())]));
    TextPrompt::new("What is your name?")
        .with_placeholder("E.g. Taylor")
        .prompt_on(&terminal)
        .unwrap();

    let first = output.frames()[0].plain_text();
    assert!(first.contains("What is your name?"));
    assert!(first.contains("E.g. Taylor"));

    let last = output.last_frame().unwrap();
    assert!(last.contains("Jess"));
    assert!(!last.contains("E.g. Taylor"));
    assert_eq!(last.len(), 3);
}

#[test]
fn pasted_text_is_inserted_as_one_line() {
    let input = MockConsoleInput::new();
    input.queue_bytes(b"\x1b[200~Jess\nSmith\x1b[201~");
    input.queue_key(enter());
    let (terminal, _) = mock_terminal(input);

    let value = TextPrompt::new("Name").prompt_on(&terminal).unwrap();

    assert_eq!(value, "Jess Smith");
}

#[test]
fn password_is_never_echoed() {
    let (terminal, output) = fake_terminal(script(&[Text("hunter2"), Key(enter())]));

    let value = PasswordPrompt::new("Password").prompt_on(&terminal).unwrap();

    assert_eq!(value, "hunter2");
    assert!(!output.plain_output().contains("hunter2"));
    assert!(output.last_frame().unwrap().contains("•••••••"));
}

#[test]
fn closed_input_reports_error() {
    let (terminal, output) = fake_terminal(script(&[Text("Je")]));

    let err = TextPrompt::new("Name").prompt_on(&terminal).unwrap_err();

    assert!(matches!(err, PromptError::InputClosed));
    assert!(output.is_cursor_visible());
}
