//! Console backends for promptkit.
//!
//! - [`UnixConsoleInput`] / [`UnixConsoleOutput`]: POSIX terminal in raw mode
//! - [`mock::MockConsoleInput`] / [`mock::MockConsoleOutput`]: scripted keys
//!   and recorded output for tests
//!
//! [`native_terminal`] builds a [`Terminal`] for the current process;
//! [`fake_terminal`] builds one that replays keys and records frames.

use promptkit_core::{ConsoleResult, KeyToken, Terminal};

pub mod debug;
pub mod mock;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{UnixConsoleInput, UnixConsoleOutput};

pub use mock::{MockConsoleInput, MockConsoleOutput};

/// Terminal attached to the process's stdin and stdout.
///
/// Also installs the debug file logger when `PROMPTKIT_DEBUG` is set.
pub fn native_terminal() -> ConsoleResult<Terminal> {
    debug::init();

    #[cfg(unix)]
    {
        let input = UnixConsoleInput::new()?;
        let output = UnixConsoleOutput::new()?;
        Ok(Terminal::new(Box::new(input), Box::new(output)))
    }

    #[cfg(not(unix))]
    {
        Err(promptkit_core::ConsoleError::UnsupportedFeature {
            feature: "console".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Terminal that delivers `keys` one per read and records all output.
///
/// The returned handle shares state with the terminal's output.
pub fn fake_terminal<I>(keys: I) -> (Terminal, MockConsoleOutput)
where
    I: IntoIterator<Item = KeyToken>,
{
    mock_terminal(MockConsoleInput::with_keys(keys))
}

/// Terminal reading from a prepared mock input.
pub fn mock_terminal(input: MockConsoleInput) -> (Terminal, MockConsoleOutput) {
    let output = MockConsoleOutput::new();
    let terminal = Terminal::new(Box::new(input), Box::new(output.clone()));
    (terminal, output)
}

/// Key sequence that types `text` character by character.
pub fn typed(text: &str) -> Vec<KeyToken> {
    text.chars().map(KeyToken::Char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptkit_core::ControlKey;

    #[test]
    fn test_fake_terminal_shares_output() {
        let (terminal, output) = fake_terminal(typed("a"));
        terminal.write_lines(&["hello"]).unwrap();
        assert_eq!(output.output(), "hello\r\n");
        assert_eq!(
            terminal.input().read_keys().unwrap(),
            Some(vec![KeyToken::Char('a')])
        );
        assert_eq!(terminal.input().read_keys().unwrap(), None);
    }

    #[test]
    fn test_typed() {
        let mut keys = typed("hi");
        keys.push(ControlKey::Enter.into());
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1], KeyToken::Char('i'));
    }

    #[test]
    fn test_fake_terminal_width() {
        let (terminal, _) = mock_terminal(MockConsoleInput::new().with_window_size(0, 0));
        assert_eq!(terminal.width(), 80);
        assert_eq!(terminal.height(), 24);
    }
}
