//! Yes/no confirmation on the terminal.

use std::collections::VecDeque;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::error::SyncError;

/// A single decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Ctrl+C.
    Interrupt,
    /// Anything else: arrows, function keys, escape sequences.
    Other,
}

impl Key {
    /// Decodes a terminal key event.
    pub fn from_event(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Source of single keypresses.
pub trait KeySource {
    /// Blocks until one key is pressed.
    fn read_key(&mut self) -> Result<Key>;
}

/// Guard that disables raw mode on drop.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads keys from the controlling terminal in raw mode.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<Key> {
        enable_raw_mode()?;
        let _guard = RawModeGuard;

        loop {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    return Ok(Key::from_event(key_event));
                }
            }
        }
    }
}

/// Pre-recorded keys, for unattended runs and tests.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    /// Creates a source that yields `keys` in order.
    pub fn new<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more keys to read"))
    }
}

/// Asks the operator a yes/no question.
pub trait Confirm {
    /// Returns `true` for yes, `false` for no.
    ///
    /// An interrupt surfaces as [`SyncError::Interrupted`].
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Confirmation driven by single keypresses.
///
/// Accepts `y`/`Y` and `n`/`N`; any other key re-prompts.
pub struct KeyConfirm<K, W> {
    keys: K,
    out: W,
}

impl<K: KeySource, W: Write> KeyConfirm<K, W> {
    /// Creates a prompt reading from `keys` and echoing to `out`.
    pub fn new(keys: K, out: W) -> Self {
        Self { keys, out }
    }

    /// Consumes the prompt, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}

impl KeyConfirm<TerminalKeys, io::Stderr> {
    /// Prompts on stderr and reads from the terminal.
    pub fn terminal() -> Self {
        Self::new(TerminalKeys, io::stderr())
    }
}

impl<K: KeySource, W: Write> Confirm for KeyConfirm<K, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            write!(self.out, "{prompt} ")?;
            self.out.flush()?;

            match self.keys.read_key()? {
                Key::Char('y' | 'Y') => {
                    writeln!(self.out, "Y")?;
                    return Ok(true);
                }
                Key::Char('n' | 'N') => {
                    writeln!(self.out, "N")?;
                    return Ok(false);
                }
                Key::Interrupt => {
                    writeln!(self.out)?;
                    return Err(SyncError::Interrupted.into());
                }
                Key::Char(_) | Key::Other => {
                    writeln!(self.out, "Only Y and N is allowed")?;
                }
            }
        }
    }
}
