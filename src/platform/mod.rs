//! Platform abstraction layer
//!
//! Translates browser key codes into logical actions. Pointer and touch
//! controls are expected to be mapped onto the same vocabulary upstream.

use serde::{Deserialize, Serialize};

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
    Dig,
    ToggleFly,
}

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_code(code: &str) -> Option<Action> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Action::Left),
        "ArrowRight" | "KeyD" => Some(Action::Right),
        "ArrowUp" | "KeyW" => Some(Action::Up),
        "ArrowDown" | "KeyS" => Some(Action::Down),
        "Space" => Some(Action::Jump),
        "KeyJ" => Some(Action::Attack),
        "KeyK" => Some(Action::Dig),
        "KeyF" => Some(Action::ToggleFly),
        _ => None,
    }
}
