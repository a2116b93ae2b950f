use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::KeyState;

/// A per-frame scene mutation derived from held keys.
///
/// The update step consumes actions, never raw key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate the light cube by a delta.
    MoveLight(Vec3),
    /// Translate the camera by a delta.
    MoveCamera(Vec3),
}

/// What a bound key drives while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    LightUp,
    LightDown,
    CameraLeft,
    CameraRight,
}

impl Control {
    fn action(self, step: f32) -> Action {
        match self {
            Control::LightUp => Action::MoveLight(Vec3::Y * step),
            Control::LightDown => Action::MoveLight(Vec3::NEG_Y * step),
            Control::CameraLeft => Action::MoveCamera(Vec3::NEG_X * step),
            Control::CameraRight => Action::MoveCamera(Vec3::X * step),
        }
    }
}

/// Key-to-control mapping plus the per-frame step applied while a key is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    pub light_up: char,
    pub light_down: char,
    pub camera_left: char,
    pub camera_right: char,
    /// World units per frame.
    pub step: f32,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            light_up: 'w',
            light_down: 's',
            camera_left: 'a',
            camera_right: 'd',
            step: 0.05,
        }
    }
}

impl InputBindings {
    /// Bound keys with their controls, in evaluation order.
    pub fn bindings(&self) -> [(char, Control); 4] {
        [
            (self.light_up, Control::LightUp),
            (self.light_down, Control::LightDown),
            (self.camera_left, Control::CameraLeft),
            (self.camera_right, Control::CameraRight),
        ]
    }

    /// A key state that tracks exactly the bound keys.
    pub fn key_state(&self) -> KeyState {
        KeyState::tracking(self.bindings().map(|(c, _)| c))
    }

    /// Actions produced by the currently held keys for one frame.
    pub fn actions(&self, keys: &KeyState) -> Vec<Action> {
        self.bindings()
            .into_iter()
            .filter(|(key, _)| keys.is_held(*key))
            .map(|(_, control)| control.action(self.step))
            .collect()
    }
}
