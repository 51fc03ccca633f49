//! Input mappings: raw input conditions bound to named actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::{InputSnapshot, KeyCode, MouseButton};

/// Raw input condition checked against a tick's input snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCondition {
    /// Key is held
    KeyDown(KeyCode),
    /// Key went down this tick
    KeyPressed(KeyCode),
    /// Key went up this tick
    KeyReleased(KeyCode),
    /// Mouse button is held
    MouseDown(MouseButton),
}

impl InputCondition {
    /// Whether the condition holds for `input`
    pub fn holds(&self, input: &dyn InputSnapshot) -> bool {
        match *self {
            InputCondition::KeyDown(key) => input.is_key_down(key),
            InputCondition::KeyPressed(key) => input.is_key_pressed(key),
            InputCondition::KeyReleased(key) => input.is_key_released(key),
            InputCondition::MouseDown(button) => input.is_mouse_button_down(button),
        }
    }
}

/// Extra check over the whole snapshot, e.g. a modifier key
pub type InputGuard = Box<dyn Fn(&dyn InputSnapshot) -> bool>;

/// Binding from an input condition to an action name and optional payload
pub struct InputMapping<P = ()> {
    condition: InputCondition,
    guard: Option<InputGuard>,
    action: String,
    payload: Option<P>,
}

impl<P> InputMapping<P> {
    /// Bind `condition` to `action`
    pub fn new(condition: InputCondition, action: impl Into<String>) -> Self {
        Self {
            condition,
            guard: None,
            action: action.into(),
            payload: None,
        }
    }

    /// Only fire when `guard` also passes
    #[must_use]
    pub fn with_guard(mut self, guard: impl Fn(&dyn InputSnapshot) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Payload passed along with the action
    #[must_use]
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The input condition
    pub fn condition(&self) -> InputCondition {
        self.condition
    }

    /// The action name (also the event name used for transitions)
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The payload, if any
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Condition holds and the guard (if any) passes
    pub fn is_triggered(&self, input: &dyn InputSnapshot) -> bool {
        self.condition.holds(input) && self.guard.as_ref().map_or(true, |guard| guard(input))
    }
}

impl<P: fmt::Debug> fmt::Debug for InputMapping<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputMapping")
            .field("condition", &self.condition)
            .field("guarded", &self.guard.is_some())
            .field("action", &self.action)
            .field("payload", &self.payload)
            .finish()
    }
}
