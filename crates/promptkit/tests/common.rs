// Shared helpers for driving widgets through the mock terminal.

#![allow(dead_code)]

use promptkit::{ControlKey, EscapeKey, KeyToken};

pub fn enter() -> KeyToken {
    ControlKey::Enter.into()
}

pub fn backspace() -> KeyToken {
    ControlKey::Backspace.into()
}

pub fn ctrl_c() -> KeyToken {
    ControlKey::CtrlC.into()
}

pub fn up() -> KeyToken {
    EscapeKey::Up.into()
}

pub fn down() -> KeyToken {
    EscapeKey::Down.into()
}

pub fn left() -> KeyToken {
    EscapeKey::Left.into()
}

pub fn right() -> KeyToken {
    EscapeKey::Right.into()
}

pub fn delete() -> KeyToken {
    EscapeKey::Delete.into()
}

/// Build a key script from text and individual keys.
///
/// ```ignore
/// let keys = script(&[Text("Jez"), Key(backspace()), Text("ss"), Key(enter())]);
/// ```
pub fn script(steps: &[Step]) -> Vec<KeyToken> {
    steps
        .iter()
        .flat_map(|step| match step {
            Step::Text(text) => promptkit::typed(text),
            Step::Key(key) => vec![key.clone()],
        })
        .collect()
}

pub enum Step {
    Text(&'static str),
    Key(KeyToken),
}
