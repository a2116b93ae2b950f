//! Keyboard input: held-key flags and the bindings that turn them into actions.
//!
//! # Invariants
//! - Key state is an explicit value passed into the update step, never a global.
//! - Keys are matched case-insensitively by their lowercase character.
//! - Actions are derived from held keys once per frame; no auto-repeat handling.

pub mod action;
pub mod keys;

pub use action::{Action, Control, InputBindings};
pub use keys::KeyState;
