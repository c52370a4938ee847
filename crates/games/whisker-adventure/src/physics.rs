use serde::{Deserialize, Serialize};

use whisker_core::geometry::Rect;
use whisker_core::input::InputSnapshot;

use crate::config::{KeyBindings, PhysicsConfig};
use crate::level_gen::Coin;

/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.8;
/// Horizontal speed per tick.
pub const MOVE_SPEED: f32 = 3.0;
/// Initial upward velocity of a jump.
pub const JUMP_POWER: f32 = 15.0;
/// Jumps between landings (double jump).
pub const MAX_JUMPS: u8 = 2;
/// Speed multiplier while dashing.
pub const DASH_MULTIPLIER: f32 = 1.8;
pub const PLAYER_WIDTH: f32 = 70.0;
pub const PLAYER_HEIGHT: f32 = 70.0;
/// Depth below a platform top within which a falling player lands.
pub const LAND_TOLERANCE: f32 = 20.0;

/// Movement parameters the power-up system overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementParams {
    pub speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    pub dash_enabled: bool,
}

impl MovementParams {
    pub fn from_config(cfg: &PhysicsConfig) -> Self {
        Self {
            speed: cfg.speed,
            jump_power: cfg.jump_power,
            gravity: cfg.gravity,
            dash_enabled: false,
        }
    }
}

/// The player-controlled sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub jumps_left: u8,
    pub max_jumps: u8,
    /// Landed on a platform during the last tick.
    pub grounded: bool,
    pub params: MovementParams,
}

impl PlayerState {
    pub fn new(spawn_x: f32, spawn_y: f32, cfg: &PhysicsConfig) -> Self {
        Self {
            x: spawn_x,
            y: spawn_y,
            vx: 0.0,
            vy: 0.0,
            w: cfg.player_width,
            h: cfg.player_height,
            jumps_left: cfg.max_jumps,
            max_jumps: cfg.max_jumps,
            grounded: false,
            params: MovementParams::from_config(cfg),
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Move back to a spawn point with zero velocity and all jumps restored.
    /// Movement parameters are left to the power-up system.
    pub fn reset_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.jumps_left = self.max_jumps;
        self.grounded = false;
    }
}

/// Per-tick movement intent, derived from the input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// -1 (left), 0, +1 (right).
    pub move_dir: f32,
    pub jump: bool,
    pub dash: bool,
}

impl PlayerIntent {
    /// Read held keys and the jump press. The press is only consumed when a
    /// jump is actually available, so a press made mid-air with no jumps
    /// left waits for the next landing while the key stays held.
    pub fn read(input: &mut InputSnapshot, keys: &KeyBindings, can_jump: bool) -> Self {
        let mut move_dir = 0.0;
        if input.any_down(&keys.move_left) {
            move_dir -= 1.0;
        }
        if input.any_down(&keys.move_right) {
            move_dir += 1.0;
        }
        Self {
            move_dir,
            jump: can_jump && input.take_any_press(&keys.jump),
            dash: input.any_down(&keys.dash),
        }
    }
}

/// Advance the player one tick: intent, jump, integration, platform landing.
///
/// Gravity and velocity are applied once per tick regardless of the frame's
/// measured duration. Returns whether the player landed this tick.
pub fn tick_player(
    player: &mut PlayerState,
    intent: &PlayerIntent,
    platforms: &[Rect],
    cfg: &PhysicsConfig,
    level_length: f32,
) -> bool {
    // Horizontal movement (sanitize NaN/Inf)
    let move_dir = if intent.move_dir.is_finite() {
        intent.move_dir.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let mut speed = player.params.speed;
    if intent.dash && player.params.dash_enabled {
        speed *= cfg.dash_multiplier;
    }
    player.vx = move_dir * speed;

    if intent.jump && player.jumps_left > 0 {
        player.vy = -player.params.jump_power;
        player.jumps_left -= 1;
    }

    let prev_bottom = player.y + player.h;
    player.vy += player.params.gravity;
    player.x += player.vx;
    player.y += player.vy;
    player.x = player.x.clamp(0.0, (level_length - player.w).max(0.0));

    resolve_platforms(player, platforms, prev_bottom, cfg.land_tolerance)
}

/// Land a falling player on any platform under its feet.
///
/// A platform catches the player when the spans overlap horizontally, the
/// player is not moving up, and its bottom edge either sits inside the
/// tolerance band below the platform top or crossed the top this tick.
pub(crate) fn resolve_platforms(
    player: &mut PlayerState,
    platforms: &[Rect],
    prev_bottom: f32,
    tolerance: f32,
) -> bool {
    player.grounded = false;
    for platform in platforms {
        if player.vy < 0.0 || !player.hitbox().overlaps_horizontally(platform) {
            continue;
        }
        let bottom = player.y + player.h;
        let in_band = bottom > platform.y && bottom < platform.y + tolerance;
        let crossed = prev_bottom <= platform.y && bottom >= platform.y;
        if in_band || crossed {
            player.y = platform.y - player.h;
            player.vy = 0.0;
            player.jumps_left = player.max_jumps;
            player.grounded = true;
        }
    }
    player.grounded
}

/// Mark every uncollected coin touching `player` as collected.
/// Returns how many were picked up by this call.
pub fn collect_coins(player: &Rect, coins: &mut [Coin], coin_size: f32) -> usize {
    let mut picked = 0;
    for coin in coins.iter_mut().filter(|c| !c.collected) {
        if player.overlaps(&coin.hitbox(coin_size)) {
            coin.collected = true;
            picked += 1;
        }
    }
    picked
}

/// Index of the first monster overlapping `player`.
pub fn monster_contact(player: &Rect, monsters: &[Rect]) -> Option<usize> {
    monsters.iter().position(|m| m.overlaps(player))
}
