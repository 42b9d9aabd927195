//! Keyboard input: key map, player actions and the event queue feeding the tick loop.

use std::sync::mpsc;

use crate::types::Side;

/// Keys the game listens to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    S,
    W,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "KeyA" => Some(Key::A),
            "KeyD" => Some(Key::D),
            "KeyS" => Some(Key::S),
            "KeyW" => Some(Key::W),
            _ => None,
        }
    }
}

/// Raw key transition
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
}

/// What a player asked for
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    MoveLeft(Side),
    MoveRight(Side),
    Stop(Side),
    Serve(Side),
}

impl Action {
    pub fn side(self) -> Side {
        match self {
            Action::MoveLeft(side)
            | Action::MoveRight(side)
            | Action::Stop(side)
            | Action::Serve(side) => side,
        }
    }
}

/// Control a key is bound to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Serve,
}

/// Key bindings for both players
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(Key, Side, Control)>,
}

impl Default for KeyMap {
    /// Player one: arrows, serving with ↑. Player two: A/D, serving with S.
    fn default() -> Self {
        KeyMap {
            bindings: vec![
                (Key::ArrowLeft, Side::One, Control::Left),
                (Key::ArrowRight, Side::One, Control::Right),
                (Key::ArrowUp, Side::One, Control::Serve),
                (Key::A, Side::Two, Control::Left),
                (Key::D, Side::Two, Control::Right),
                (Key::S, Side::Two, Control::Serve),
            ],
        }
    }
}

impl KeyMap {
    pub fn new() -> Self {
        KeyMap {
            bindings: Vec::new(),
        }
    }

    /// Bind a key, replacing any previous binding of that key
    pub fn bind(&mut self, key: Key, side: Side, control: Control) {
        self.bindings.retain(|(bound, _, _)| *bound != key);
        self.bindings.push((key, side, control));
    }

    pub fn lookup(&self, key: Key) -> Option<(Side, Control)> {
        self.bindings
            .iter()
            .find(|(bound, _, _)| *bound == key)
            .map(|&(_, side, control)| (side, control))
    }

    /// Translate a key transition. Every key-down of a move key pushes again;
    /// releasing it stops the paddle.
    pub fn action(&self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::KeyDown(key) => match self.lookup(key)? {
                (side, Control::Left) => Some(Action::MoveLeft(side)),
                (side, Control::Right) => Some(Action::MoveRight(side)),
                (side, Control::Serve) => Some(Action::Serve(side)),
            },
            InputEvent::KeyUp(key) => match self.lookup(key)? {
                (side, Control::Left | Control::Right) => Some(Action::Stop(side)),
                (_, Control::Serve) => None,
            },
        }
    }
}

/// Sending half of the input queue; cheap to clone and usable from any thread
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: mpsc::Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns false once the simulation side is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Receiving half, drained only by the tick loop
#[derive(Debug)]
pub struct InputQueue {
    receiver: mpsc::Receiver<InputEvent>,
}

impl InputQueue {
    /// Create a connected sender/queue pair
    pub fn channel() -> (InputSender, InputQueue) {
        let (sender, receiver) = mpsc::channel();
        (InputSender { sender }, InputQueue { receiver })
    }

    /// Take every event queued so far, oldest first
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.receiver.try_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let map = KeyMap::default();

        assert_eq!(
            map.action(InputEvent::KeyDown(Key::ArrowLeft)),
            Some(Action::MoveLeft(Side::One))
        );
        assert_eq!(
            map.action(InputEvent::KeyUp(Key::ArrowLeft)),
            Some(Action::Stop(Side::One))
        );
        assert_eq!(
            map.action(InputEvent::KeyDown(Key::D)),
            Some(Action::MoveRight(Side::Two))
        );
        assert_eq!(
            map.action(InputEvent::KeyDown(Key::S)),
            Some(Action::Serve(Side::Two))
        );
        assert_eq!(map.action(InputEvent::KeyUp(Key::ArrowUp)), None);
        assert_eq!(map.action(InputEvent::KeyDown(Key::W)), None);
    }

    #[test]
    fn test_rebind() {
        let mut map = KeyMap::default();
        map.bind(Key::W, Side::Two, Control::Serve);
        map.bind(Key::ArrowUp, Side::One, Control::Right);

        assert_eq!(map.lookup(Key::W), Some((Side::Two, Control::Serve)));
        assert_eq!(
            map.action(InputEvent::KeyDown(Key::ArrowUp)),
            Some(Action::MoveRight(Side::One))
        );
        assert!(KeyMap::new().lookup(Key::ArrowUp).is_none());
    }

    #[test]
    fn test_dom_codes() {
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::ArrowRight));
        assert_eq!(Key::from_code("KeyA"), Some(Key::A));
        assert_eq!(Key::from_code("Space"), None);
    }

    #[test]
    fn test_queue_from_other_thread() {
        let (sender, queue) = InputQueue::channel();

        let handle = std::thread::spawn(move || {
            sender.send(InputEvent::KeyDown(Key::ArrowLeft));
            sender.send(InputEvent::KeyUp(Key::ArrowLeft));
        });
        handle.join().unwrap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::KeyDown(Key::ArrowLeft),
                InputEvent::KeyUp(Key::ArrowLeft)
            ]
        );
        assert_eq!(queue.drain().count(), 0);
    }

    #[test]
    fn test_send_after_queue_dropped() {
        let (sender, queue) = InputQueue::channel();
        drop(queue);
        assert!(!sender.send(InputEvent::KeyDown(Key::A)));
    }
}
