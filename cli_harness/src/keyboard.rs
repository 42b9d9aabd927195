//! Terminal key events to the core's key transitions.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use pingpong_core::{InputEvent, InputSender, Key};

/// Without release events a key counts as released this long after a single press.
/// Longer than the usual first autorepeat delay.
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(700);

/// Same, once the key is autorepeating
pub const REPEAT_TIMEOUT: Duration = Duration::from_millis(150);

/// Keyboard capability detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardMode {
    /// Terminal reports press, repeat and release
    Enhanced,
    /// Presses only; releases are synthesized after `HOLD_TIMEOUT` or `REPEAT_TIMEOUT`
    HoldTimeout,
}

impl KeyboardMode {
    pub fn description(self) -> &'static str {
        match self {
            KeyboardMode::Enhanced => "Enhanced (key release reported)",
            KeyboardMode::HoldTimeout => "Hold timeout (no key release)",
        }
    }
}

pub fn map_keycode(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::D),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::S),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
        _ => None,
    }
}

/// Forwards game keys into the simulation's input queue
pub struct KeyForwarder {
    mode: KeyboardMode,
    sender: InputSender,
    /// Last press of each key currently considered held, and whether it repeats
    held: HashMap<Key, (Instant, bool)>,
}

impl KeyForwarder {
    pub fn new(mode: KeyboardMode, sender: InputSender) -> Self {
        KeyForwarder {
            mode,
            sender,
            held: HashMap::new(),
        }
    }

    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    /// Forward a terminal key event. Returns false for keys the game ignores.
    pub fn handle(&mut self, event: KeyEvent, now: Instant) -> bool {
        let Some(key) = map_keycode(event.code) else {
            return false;
        };

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                // Plain terminals report autorepeat as more presses
                let repeating = self.held.contains_key(&key);
                self.held.insert(key, (now, repeating));
                self.sender.send(InputEvent::KeyDown(key));
            }
            KeyEventKind::Release => {
                self.held.remove(&key);
                self.sender.send(InputEvent::KeyUp(key));
            }
        }
        true
    }

    /// Synthesize releases for keys that stopped repeating
    pub fn release_stale(&mut self, now: Instant) {
        if self.mode != KeyboardMode::HoldTimeout {
            return;
        }

        let sender = &self.sender;
        self.held.retain(|&key, &mut (pressed, repeating)| {
            let timeout = if repeating { REPEAT_TIMEOUT } else { HOLD_TIMEOUT };
            let stale = now.saturating_duration_since(pressed) > timeout;
            if stale {
                sender.send(InputEvent::KeyUp(key));
            }
            !stale
        });
    }

    /// Forget held keys, e.g. when a new match starts
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
