//! Input buffering between window events and the game tick
//!
//! Window callbacks run on their own thread and push events into an
//! [`InputBuffer`]; once per tick the game drains it into a [`TickInput`].
//! Keyboard and mouse state sit behind separate locks so the two event
//! sources never contend.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Game action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputKey {
    Forward,
    Left,
    Backward,
    Right,
    Shoot,
    Reset,
}

impl InputKey {
    pub const ALL: [InputKey; 6] = [
        InputKey::Forward,
        InputKey::Left,
        InputKey::Backward,
        InputKey::Right,
        InputKey::Shoot,
        InputKey::Reset,
    ];

    /// Characters that trigger this action (Latin and Cyrillic layouts)
    pub fn key_chars(&self) -> &'static str {
        match self {
            InputKey::Forward => "WwцЦ",
            InputKey::Left => "AaфФ",
            InputKey::Backward => "SsыЫ",
            InputKey::Right => "DdвВ",
            InputKey::Shoot => " ",
            InputKey::Reset => "RrкК",
        }
    }

    /// Platform key codes (arrow keys and space)
    pub fn key_codes(&self) -> &'static [u32] {
        match self {
            InputKey::Forward => &[38],
            InputKey::Left => &[37],
            InputKey::Backward => &[40],
            InputKey::Right => &[39],
            InputKey::Shoot => &[32],
            InputKey::Reset => &[],
        }
    }

    /// Single-type actions fire once per press instead of while held
    pub fn is_single_type(&self) -> bool {
        matches!(self, InputKey::Shoot | InputKey::Reset)
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.key_chars().contains(c))
    }

    pub fn from_key_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.key_codes().contains(&code))
    }
}

/// Everything the tick consumes from one drain of the buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement keys held down, in a stable order
    pub held: Vec<InputKey>,
    /// Single-type keys pressed since the last drain
    pub typed: Vec<InputKey>,
    /// Accumulated horizontal mouse motion (pixels, right is positive)
    pub mouse_dx: i32,
    /// Left button clicked since the last drain
    pub fire: bool,
}

#[derive(Debug, Default)]
struct KeyboardState {
    pressed: BTreeSet<InputKey>,
    typed: BTreeSet<InputKey>,
}

#[derive(Debug, Default)]
struct MouseState {
    dx: i32,
    clicked: bool,
}

/// Thread-safe accumulator of input events
#[derive(Debug, Default)]
pub struct InputBuffer {
    keyboard: Mutex<KeyboardState>,
    mouse: Mutex<MouseState>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn keyboard(&self) -> MutexGuard<'_, KeyboardState> {
        self.keyboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mouse(&self) -> MutexGuard<'_, MouseState> {
        self.mouse.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A held key went down; single-type keys are ignored here
    pub fn key_pressed(&self, key: InputKey) {
        if !key.is_single_type() {
            self.keyboard().pressed.insert(key);
        }
    }

    pub fn key_released(&self, key: InputKey) {
        if !key.is_single_type() {
            self.keyboard().pressed.remove(&key);
        }
    }

    /// A key was typed; only single-type keys are recorded
    pub fn key_typed(&self, key: InputKey) {
        if key.is_single_type() {
            log::debug!("{:?} typed", key);
            self.keyboard().typed.insert(key);
        }
    }

    pub fn mouse_moved(&self, dx: i32) {
        let mut mouse = self.mouse();
        mouse.dx = mouse.dx.saturating_add(dx);
    }

    pub fn left_click(&self) {
        self.mouse().clicked = true;
    }

    /// Take this tick's input; typed keys, mouse motion and clicks reset,
    /// held keys persist until released
    pub fn drain(&self) -> TickInput {
        let (held, typed) = {
            let mut keyboard = self.keyboard();
            let held = keyboard.pressed.iter().copied().collect();
            let typed = std::mem::take(&mut keyboard.typed).into_iter().collect();
            (held, typed)
        };
        let mut mouse = self.mouse();
        TickInput {
            held,
            typed,
            mouse_dx: std::mem::take(&mut mouse.dx),
            fire: std::mem::take(&mut mouse.clicked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_from_char_both_layouts() {
        assert_eq!(InputKey::from_char('w'), Some(InputKey::Forward));
        assert_eq!(InputKey::from_char('Ц'), Some(InputKey::Forward));
        assert_eq!(InputKey::from_char('ф'), Some(InputKey::Left));
        assert_eq!(InputKey::from_char(' '), Some(InputKey::Shoot));
        assert_eq!(InputKey::from_char('к'), Some(InputKey::Reset));
        assert_eq!(InputKey::from_char('x'), None);
        assert_eq!(InputKey::from_key_code(40), Some(InputKey::Backward));
        assert_eq!(InputKey::from_key_code(13), None);
    }

    #[test]
    fn test_held_keys_persist_typed_keys_drain() {
        let buffer = InputBuffer::new();
        buffer.key_pressed(InputKey::Forward);
        buffer.key_pressed(InputKey::Shoot);
        buffer.key_typed(InputKey::Shoot);
        buffer.key_typed(InputKey::Forward);

        let input = buffer.drain();
        assert_eq!(input.held, vec![InputKey::Forward]);
        assert_eq!(input.typed, vec![InputKey::Shoot]);

        let input = buffer.drain();
        assert_eq!(input.held, vec![InputKey::Forward]);
        assert!(input.typed.is_empty());

        buffer.key_released(InputKey::Forward);
        assert!(buffer.drain().held.is_empty());
    }

    #[test]
    fn test_mouse_accumulates_until_drained() {
        let buffer = InputBuffer::new();
        buffer.mouse_moved(5);
        buffer.mouse_moved(-2);
        buffer.left_click();
        let input = buffer.drain();
        assert_eq!(input.mouse_dx, 3);
        assert!(input.fire);

        let input = buffer.drain();
        assert_eq!(input.mouse_dx, 0);
        assert!(!input.fire);
    }

    #[test]
    fn test_events_from_another_thread() {
        let buffer = Arc::new(InputBuffer::new());
        let writer = Arc::clone(&buffer);
        std::thread::spawn(move || {
            for _ in 0..100 {
                writer.mouse_moved(1);
            }
            writer.key_pressed(InputKey::Right);
        })
        .join()
        .unwrap();

        let input = buffer.drain();
        assert_eq!(input.mouse_dx, 100);
        assert_eq!(input.held, vec![InputKey::Right]);
    }
}
