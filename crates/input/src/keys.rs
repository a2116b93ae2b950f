use std::collections::BTreeMap;

/// Held flags for a fixed set of single-character keys.
///
/// Only tracked keys change state; anything else is ignored so stray presses
/// never grow the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyState {
    held: BTreeMap<char, bool>,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::tracking(['w', 'a', 's', 'd'])
    }
}

impl KeyState {
    /// Track the default `w`, `a`, `s`, `d` keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an explicit set of keys, all released.
    pub fn tracking(keys: impl IntoIterator<Item = char>) -> Self {
        Self {
            held: keys
                .into_iter()
                .map(|c| (c.to_ascii_lowercase(), false))
                .collect(),
        }
    }

    /// Mark a key as held. Returns `true` if the key is tracked.
    pub fn key_down(&mut self, key: char) -> bool {
        self.set(key, true)
    }

    /// Mark a key as released. Returns `true` if the key is tracked.
    pub fn key_up(&mut self, key: char) -> bool {
        self.set(key, false)
    }

    /// Apply a key event given as text, as delivered by windowing layers.
    /// Multi-character text (IME commits, named keys) is ignored.
    pub fn apply_text(&mut self, text: &str, pressed: bool) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.set(c, pressed),
            _ => false,
        }
    }

    pub fn is_held(&self, key: char) -> bool {
        self.held
            .get(&key.to_ascii_lowercase())
            .copied()
            .unwrap_or(false)
    }

    pub fn is_tracked(&self, key: char) -> bool {
        self.held.contains_key(&key.to_ascii_lowercase())
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for flag in self.held.values_mut() {
            *flag = false;
        }
    }

    /// Currently held keys in sorted order.
    pub fn held_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.held.iter().filter(|(_, held)| **held).map(|(c, _)| *c)
    }

    fn set(&mut self, key: char, pressed: bool) -> bool {
        match self.held.get_mut(&key.to_ascii_lowercase()) {
            Some(flag) => {
                if *flag != pressed {
                    tracing::trace!(key = %key, pressed, "key state changed");
                }
                *flag = pressed;
                true
            }
            None => false,
        }
    }
}
