use serde::{Deserialize, Serialize};

use whisker_core::powerup;

use crate::config::{PhysicsConfig, PowerUpConfig};
use crate::physics::MovementParams;

/// Seconds a modifier stays active.
pub const MODIFIER_DURATION: f32 = 5.0;
/// Jump power while the spring is active.
pub const SPRING_JUMP_POWER: f32 = 22.0;
/// Speed while the fish is active (also grants dash).
pub const FISH_SPEED: f32 = 5.0;
/// Gravity while the balloon is active.
pub const BALLOON_GRAVITY: f32 = 0.3;

/// Timed movement modifiers offered by the dialogue choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    Spring,
    Fish,
    Balloon,
}

impl powerup::PowerUpKind for ModifierKind {
    fn duration(&self) -> f32 {
        MODIFIER_DURATION
    }
}

impl ModifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::Spring => "spring",
            ModifierKind::Fish => "fish",
            ModifierKind::Balloon => "balloon",
        }
    }

    /// The following kind in the dialogue rotation, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            ModifierKind::Spring => ModifierKind::Fish,
            ModifierKind::Fish => ModifierKind::Balloon,
            ModifierKind::Balloon => ModifierKind::Spring,
        }
    }
}

impl std::fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single active modifier slot.
pub type ModifierSlot = powerup::PowerUpSlot<ModifierKind>;

/// Activate `kind`, replacing whatever was active, and override the
/// parameters it governs. Groups changed by a replaced modifier are left
/// as they are until expiry resets everything.
pub fn apply_modifier(
    slot: &mut ModifierSlot,
    params: &mut MovementParams,
    kind: ModifierKind,
    cfg: &PowerUpConfig,
) -> Option<ModifierKind> {
    let replaced = slot.apply_for(kind, cfg.duration_secs);
    match kind {
        ModifierKind::Spring => params.jump_power = cfg.spring_jump_power,
        ModifierKind::Fish => {
            params.speed = cfg.fish_speed;
            params.dash_enabled = true;
        },
        ModifierKind::Balloon => params.gravity = cfg.balloon_gravity,
    }
    replaced
}

/// Count the active modifier down. On expiry every parameter group goes
/// back to the configured defaults, whichever modifier was active.
pub fn tick_modifier(
    slot: &mut ModifierSlot,
    params: &mut MovementParams,
    dt: f32,
    physics: &PhysicsConfig,
) -> Option<ModifierKind> {
    let expired = slot.tick(dt)?;
    *params = MovementParams::from_config(physics);
    Some(expired)
}

/// Drop any active modifier and restore default parameters.
pub fn clear_modifier(
    slot: &mut ModifierSlot,
    params: &mut MovementParams,
    physics: &PhysicsConfig,
) {
    slot.clear();
    *params = MovementParams::from_config(physics);
}
