use serde::{Deserialize, Serialize};

use crate::powerups::ModifierKind;

/// Presentation signals emitted by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdventureEvent {
    /// A run began (start action or restart).
    Started,
    CoinCollected { total: usize },
    MonsterContact { monster: usize },
    /// The level was rebuilt in place after a monster contact.
    LevelRegenerated,
    /// The whole run was restarted after a monster contact.
    RunRestarted,
    /// Play paused for a dialogue; answer with a modifier choice.
    ThresholdCrossed { index: usize, x: f32 },
    ModifierApplied { kind: ModifierKind },
    ModifierExpired { kind: ModifierKind },
    LevelWon { coins: usize, time_left: f32 },
    TimeExpired,
}

impl AdventureEvent {
    /// Whether this event ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::LevelWon { .. } | Self::TimeExpired)
    }
}
