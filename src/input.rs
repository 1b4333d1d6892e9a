use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io;

/// Decoded key events. `Ok(None)` ends the session.
pub trait InputSource {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;
}

/// Reads key presses from the terminal in raw mode. Raw mode is left when
/// the value is dropped.
pub struct TerminalInput {
    raw: bool,
}

impl TerminalInput {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { raw: true })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.raw {
            self.raw = false;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl InputSource for TerminalInput {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        loop {
            match event::read()? {
                // Release and repeat events would echo every key twice
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
                _ => {}
            }
        }
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("failed to leave raw mode: {err}");
        }
    }
}

/// A fixed key sequence, for tests and replays.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        Ok(self.keys.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_scripted_input_in_order() {
        let mut input = ScriptedInput::new([
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        ]);

        assert_eq!(input.next_key().unwrap().map(|k| k.code), Some(KeyCode::Char('a')));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.next_key().unwrap().map(|k| k.code), Some(KeyCode::Enter));
        assert_eq!(input.next_key().unwrap(), None);
    }
}
