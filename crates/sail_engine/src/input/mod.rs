//! Input state tracking
//!
//! The platform layer feeds raw key/mouse/touch events into [`InputState`];
//! the simulation reads it once per tick through the [`InputSnapshot`] trait
//! and the driver calls [`InputState::end_frame`] afterwards to clear the
//! one-tick edges (pressed, released, wheel).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Read-only view of input for one tick
pub trait InputSnapshot {
    /// Is the key currently held
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Did the key go down during this tick
    fn is_key_pressed(&self, key: KeyCode) -> bool;

    /// Did the key go up during this tick
    fn is_key_released(&self, key: KeyCode) -> bool;

    /// Is the mouse button currently held
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    /// Cursor position in canvas coordinates
    fn mouse_position(&self) -> (f32, f32) {
        (0.0, 0.0)
    }

    /// Wheel direction this tick (-1, 0 or 1)
    fn mouse_wheel(&self) -> i8 {
        0
    }
}

/// Input manager fed by the platform layer
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    mouse_wheel: i8,
    touches: HashMap<u32, (f32, f32)>,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Clear the one-tick state; call once after every tick
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_wheel = 0;
    }
    
    /// Key went down; auto-repeat while held does not count as a new press
    pub fn key_down(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    /// Key went up
    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
        self.keys_released.insert(key);
    }
    
    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }
    
    /// Handle mouse button input
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }
    
    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        self.mouse_position = (x, y);
    }

    /// Handle mouse wheel; only the direction is kept
    pub fn handle_mouse_wheel(&mut self, delta_y: f32) {
        self.mouse_wheel = if delta_y > 0.0 {
            1
        } else if delta_y < 0.0 {
            -1
        } else {
            0
        };
    }

    /// Replace the set of active touch points
    pub fn set_touches(&mut self, touches: impl IntoIterator<Item = (u32, (f32, f32))>) {
        self.touches.clear();
        self.touches.extend(touches);
    }

    /// Active touch points by identifier
    pub fn touches(&self) -> &HashMap<u32, (f32, f32)> {
        &self.touches
    }

    /// Whether any finger is on the screen
    pub fn is_touching(&self) -> bool {
        !self.touches.is_empty()
    }
}

impl InputSnapshot for InputState {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    fn mouse_wheel(&self) -> i8 {
        self.mouse_wheel
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// P key
    P,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Shift key
    Shift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl KeyCode {
    /// Every supported key
    pub const ALL: [KeyCode; 14] = [
        KeyCode::A, KeyCode::D, KeyCode::P, KeyCode::Q, KeyCode::S, KeyCode::W,
        KeyCode::Space, KeyCode::Enter, KeyCode::Escape, KeyCode::Shift,
        KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right,
    ];

    /// Browser-style code name (`"KeyA"`, `"Enter"`, `"ArrowUp"`)
    pub fn code(self) -> &'static str {
        match self {
            KeyCode::A => "KeyA",
            KeyCode::D => "KeyD",
            KeyCode::P => "KeyP",
            KeyCode::Q => "KeyQ",
            KeyCode::S => "KeyS",
            KeyCode::W => "KeyW",
            KeyCode::Space => "Space",
            KeyCode::Enter => "Enter",
            KeyCode::Escape => "Escape",
            KeyCode::Shift => "ShiftLeft",
            KeyCode::Up => "ArrowUp",
            KeyCode::Down => "ArrowDown",
            KeyCode::Left => "ArrowLeft",
            KeyCode::Right => "ArrowRight",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unrecognised key name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key code '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for KeyCode {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::ALL
            .into_iter()
            .find(|key| key.code() == s)
            .or(match s {
                "ShiftRight" => Some(KeyCode::Shift),
                _ => None,
            })
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    /// Map a DOM-style button index (0 left, 1 middle, 2 right)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}
