use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A family of timed modifiers. Implemented by each game's kind enum.
pub trait PowerUpKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Seconds the modifier lasts once applied.
    fn duration(&self) -> f32;
}

/// One running modifier and the seconds it has left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActivePowerUp<K: PowerUpKind> {
    pub kind: K,
    pub remaining: f32,
}

impl<K: PowerUpKind> ActivePowerUp<K> {
    pub fn new(kind: K) -> Self {
        Self::with_duration(kind, kind.duration())
    }

    pub fn with_duration(kind: K, duration: f32) -> Self {
        Self {
            kind,
            remaining: duration,
        }
    }

    /// Count down by `dt` seconds. Negative or non-finite `dt` is ignored.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.remaining -= dt;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Holds at most one active power-up. Applying a new one replaces the
/// current one outright, discarding its remaining time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PowerUpSlot<K: PowerUpKind> {
    active: Option<ActivePowerUp<K>>,
}

impl<K: PowerUpKind> Default for PowerUpSlot<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: PowerUpKind> PowerUpSlot<K> {
    /// Activate `kind` for its default duration. Returns the replaced kind, if any.
    pub fn apply(&mut self, kind: K) -> Option<K> {
        self.apply_for(kind, kind.duration())
    }

    /// Activate `kind` for `duration` seconds. Returns the replaced kind, if any.
    pub fn apply_for(&mut self, kind: K, duration: f32) -> Option<K> {
        self.active
            .replace(ActivePowerUp::with_duration(kind, duration))
            .map(|prev| prev.kind)
    }

    pub fn active(&self) -> Option<&ActivePowerUp<K>> {
        self.active.as_ref()
    }

    pub fn kind(&self) -> Option<K> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Count down the active power-up. Returns its kind on the tick it
    /// expires, leaving the slot empty.
    pub fn tick(&mut self, dt: f32) -> Option<K> {
        let active = self.active.as_mut()?;
        active.tick(dt);
        if active.is_expired() {
            self.active.take().map(|a| a.kind)
        } else {
            None
        }
    }
}
