use serde::{Deserialize, Serialize};

/// Overall phase of a run. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    #[default]
    NotStarted,
    Playing,
    /// Suspended for a dialogue choice.
    Paused,
    Won,
    Lost,
}

impl LifecyclePhase {
    /// Won and Lost hold until an explicit reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecyclePhase::Won | LifecyclePhase::Lost)
    }
}

/// Phase plus countdown timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    phase: LifecyclePhase,
    time_left: f32,
    time_limit: f32,
}

impl Lifecycle {
    pub fn new(time_limit: f32) -> Self {
        Self {
            phase: LifecyclePhase::NotStarted,
            time_left: time_limit,
            time_limit,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Seconds remaining, never negative.
    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn time_limit(&self) -> f32 {
        self.time_limit
    }

    pub fn is_playing(&self) -> bool {
        self.phase == LifecyclePhase::Playing
    }

    fn transition(&mut self, from: LifecyclePhase, to: LifecyclePhase) -> bool {
        if self.phase != from {
            tracing::warn!(current = ?self.phase, ?from, ?to, "ignored lifecycle transition");
            return false;
        }
        tracing::debug!(?from, ?to, "lifecycle transition");
        self.phase = to;
        true
    }

    /// NotStarted → Playing.
    pub fn start(&mut self) -> bool {
        self.transition(LifecyclePhase::NotStarted, LifecyclePhase::Playing)
    }

    /// Any phase → NotStarted with a full timer.
    pub fn reset(&mut self) {
        tracing::debug!(from = ?self.phase, "lifecycle reset");
        self.phase = LifecyclePhase::NotStarted;
        self.reset_timer();
    }

    pub fn reset_timer(&mut self) {
        self.time_left = self.time_limit;
    }

    /// Playing → Paused.
    pub fn pause(&mut self) -> bool {
        self.transition(LifecyclePhase::Playing, LifecyclePhase::Paused)
    }

    /// Paused → Playing.
    pub fn resume(&mut self) -> bool {
        self.transition(LifecyclePhase::Paused, LifecyclePhase::Playing)
    }

    /// Playing → Won.
    pub fn win(&mut self) -> bool {
        self.transition(LifecyclePhase::Playing, LifecyclePhase::Won)
    }

    /// Count down while Playing. On reaching zero the timer clamps to 0 and
    /// the run is Lost; returns true on that tick only.
    pub fn tick_timer(&mut self, dt: f32) -> bool {
        if !self.is_playing() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.transition(LifecyclePhase::Playing, LifecyclePhase::Lost)
        } else {
            false
        }
    }
}
