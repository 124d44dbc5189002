//! core-keymap: key chords to editing commands.
//!
//! Design principles:
//! - Pure lookup: resolution depends only on the key event and the table.
//! - Bindings name a `CommandKind`; only payload-free kinds can be bound.
//! - Later bindings override earlier ones for the same chord (logged at
//!   TRACE under target `keymap`).
//!
//! Chord strings are `+`-separated, case-insensitive, modifiers first:
//! `tab`, `shift+tab`, `ctrl+]`, `alt+enter`. The command name `none`
//! removes a binding.

use core_actions::{Command, CommandKind, UnknownCommand};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// Normalized logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in MODIFIER_NAMES {
            if self.mods.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
        }
    }
}

const MODIFIER_NAMES: [(KeyModifiers, &str); 3] = [
    (KeyModifiers::CTRL, "ctrl"),
    (KeyModifiers::ALT, "alt"),
    (KeyModifiers::SHIFT, "shift"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapError {
    #[error("empty key chord")]
    EmptyChord,
    #[error("unknown key `{key}` in chord `{chord}`")]
    UnknownKey { chord: String, key: String },
    #[error("unknown modifier `{modifier}` in chord `{chord}`")]
    UnknownModifier { chord: String, modifier: String },
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),
    #[error("command `{0}` needs a payload and cannot be bound to a key")]
    NotBindable(CommandKind),
}

fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "tab" => KeyCode::Tab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "plus" => KeyCode::Char('+'),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Parse a chord string such as `shift+tab` or `ctrl+]`.
pub fn parse_chord(chord: &str) -> Result<KeyEvent, KeymapError> {
    let normalized = chord.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(KeymapError::EmptyChord);
    }
    let parts: SmallVec<[&str; 4]> = normalized.split('+').map(str::trim).collect();
    let Some((key, modifiers)) = parts.split_last() else {
        return Err(KeymapError::EmptyChord);
    };

    let mut mods = KeyModifiers::empty();
    for modifier in modifiers {
        mods |= match *modifier {
            "ctrl" | "control" => KeyModifiers::CTRL,
            "alt" | "option" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            other => {
                return Err(KeymapError::UnknownModifier {
                    chord: chord.to_string(),
                    modifier: other.to_string(),
                });
            }
        };
    }
    let code = parse_key(key).ok_or_else(|| KeymapError::UnknownKey {
        chord: chord.to_string(),
        key: key.to_string(),
    })?;
    Ok(KeyEvent::new(code, mods))
}

/// Key chord to command table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<KeyEvent, CommandKind>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `tab` indent, `shift+tab` outdent, `enter` split-block.
    pub fn defaults() -> Self {
        let mut map = Self::empty();
        map.bind(KeyEvent::plain(KeyCode::Tab), CommandKind::Indent);
        map.bind(
            KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT),
            CommandKind::Outdent,
        );
        map.bind(KeyEvent::plain(KeyCode::Enter), CommandKind::SplitBlock);
        map
    }

    /// Bind `key`, returning the command it replaced.
    pub fn bind(&mut self, key: KeyEvent, command: CommandKind) -> Option<CommandKind> {
        let previous = self.bindings.insert(key, command);
        if let Some(prev) = previous {
            trace!(target: "keymap", key = %key, previous = prev.as_str(), command = command.as_str(), "binding_override");
        }
        previous
    }

    pub fn unbind(&mut self, key: &KeyEvent) -> Option<CommandKind> {
        self.bindings.remove(key)
    }

    /// Bind from strings; command `none` removes the chord's binding.
    pub fn bind_str(&mut self, chord: &str, command: &str) -> Result<(), KeymapError> {
        let key = parse_chord(chord)?;
        if command.trim().eq_ignore_ascii_case("none") {
            self.unbind(&key);
            return Ok(());
        }
        let kind: CommandKind = command.parse()?;
        if !kind.is_bare() {
            return Err(KeymapError::NotBindable(kind));
        }
        self.bind(key, kind);
        Ok(())
    }

    /// Apply `(chord, command)` overrides on top of this map.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self, KeymapError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut applied = 0usize;
        for (chord, command) in overrides {
            self.bind_str(chord, command)?;
            applied += 1;
        }
        debug!(target: "keymap", applied, bindings = self.bindings.len(), "overrides_applied");
        Ok(self)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<CommandKind> {
        let kind = self.bindings.get(key).copied();
        trace!(target: "keymap", key = %key, command = kind.map(CommandKind::as_str), "resolve");
        kind
    }

    /// Ready-to-dispatch command for `key`.
    pub fn command_for(&self, key: &KeyEvent) -> Option<Command> {
        self.resolve(key).and_then(Command::bare)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by chord text.
    pub fn bindings(&self) -> Vec<(String, CommandKind)> {
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .map(|(k, c)| (k.to_string(), *c))
            .collect();
        out.sort();
        out
    }
}
