use std::collections::HashSet;

/// Point-in-time keyboard state, keyed by lowercase key identifiers.
///
/// Key-down/key-up signals arrive asynchronously from the front-end; the
/// simulation reads the snapshot once per tick. Besides the held set, every
/// up→down transition is recorded as a pending press that stays available
/// until the simulation consumes it with [`InputSnapshot::take_press`] or the
/// key is released. Auto-repeated key-down signals for an already held key
/// do not create new presses.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    keys_down: HashSet<String>,
    pending_presses: HashSet<String>,
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key-down signal.
    pub fn on_key_down(&mut self, key: &str) {
        let key = normalize(key);
        if self.keys_down.insert(key.clone()) {
            self.pending_presses.insert(key);
        }
    }

    /// Register a key-up signal. Drops any unconsumed press of that key.
    pub fn on_key_up(&mut self, key: &str) {
        let key = normalize(key);
        self.keys_down.remove(&key);
        self.pending_presses.remove(&key);
    }

    /// Check if a key is currently held.
    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key) || self.keys_down.contains(&normalize(key))
    }

    /// Check if any of the given keys is held.
    pub fn any_down<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter().any(|k| self.is_key_down(k.as_ref()))
    }

    /// Check for an unconsumed press without consuming it.
    pub fn has_pending_press(&self, key: &str) -> bool {
        self.pending_presses.contains(&normalize(key))
    }

    /// Consume a pending press of `key`. Returns whether one was pending.
    pub fn take_press(&mut self, key: &str) -> bool {
        self.pending_presses.remove(&normalize(key))
    }

    /// Consume the first pending press among `keys`.
    pub fn take_any_press<S: AsRef<str>>(&mut self, keys: &[S]) -> bool {
        keys.iter().any(|k| self.take_press(k.as_ref()))
    }

    /// Forget every held key and pending press (focus loss, restart).
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.pending_presses.clear();
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.keys_down.len()
    }
}
