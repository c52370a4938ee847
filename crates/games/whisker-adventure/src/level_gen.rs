use serde::{Deserialize, Serialize};

use whisker_core::geometry::Rect;

/// Level length in world units; the ground spans all of it.
pub const LEVEL_LENGTH: f32 = 4000.0;
/// Top edge of the ground strip.
pub const GROUND_Y: f32 = 450.0;
const GROUND_HEIGHT: f32 = 50.0;

/// Number of floating ledges.
pub const LEDGE_COUNT: usize = 8;
const LEDGE_START_X: f32 = 400.0;
const LEDGE_SPACING: f32 = 300.0;
const LEDGE_BASE_Y: f32 = 320.0;
const LEDGE_STEP_Y: f32 = 60.0;
const LEDGE_WIDTH: f32 = 120.0;
const LEDGE_HEIGHT: f32 = 16.0;

/// Number of coins placed in the level.
pub const COIN_COUNT: usize = 10;
const COIN_START_X: f32 = 350.0;
const COIN_SPACING: f32 = 260.0;
const COIN_BASE_Y: f32 = 260.0;
const COIN_STEP_Y: f32 = 40.0;

/// Number of monsters standing on the ground.
pub const MONSTER_COUNT: usize = 7;
const MONSTER_START_X: f32 = 700.0;
const MONSTER_SPACING: f32 = 420.0;
const MONSTER_Y: f32 = 390.0;
const MONSTER_SIZE: f32 = 60.0;

/// Player spawn (top-left of the player box).
pub const SPAWN_X: f32 = 100.0;
pub const SPAWN_Y: f32 = 380.0;

/// A collectible coin. Its pickup box size is a rule, not part of the coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Coin {
    pub fn hitbox(&self, size: f32) -> Rect {
        Rect::new(self.x, self.y, size, size)
    }
}

/// Static world layout. Only `Coin::collected` changes after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Ground first, then ledges left to right.
    pub platforms: Vec<Rect>,
    pub coins: Vec<Coin>,
    pub monsters: Vec<Rect>,
    pub length: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Level {
    pub fn collected_count(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }
}

/// Build the fixed level layout. No randomness: every call is identical.
pub fn generate_level() -> Level {
    let mut platforms = Vec::with_capacity(LEDGE_COUNT + 1);
    platforms.push(Rect::new(0.0, GROUND_Y, LEVEL_LENGTH, GROUND_HEIGHT));
    platforms.extend((0..LEDGE_COUNT).map(|i| {
        Rect::new(
            LEDGE_START_X + i as f32 * LEDGE_SPACING,
            LEDGE_BASE_Y - (i % 3) as f32 * LEDGE_STEP_Y,
            LEDGE_WIDTH,
            LEDGE_HEIGHT,
        )
    }));

    let coins = (0..COIN_COUNT)
        .map(|i| Coin {
            x: COIN_START_X + i as f32 * COIN_SPACING,
            y: COIN_BASE_Y - (i % 4) as f32 * COIN_STEP_Y,
            collected: false,
        })
        .collect();

    let monsters = (0..MONSTER_COUNT)
        .map(|i| {
            Rect::new(
                MONSTER_START_X + i as f32 * MONSTER_SPACING,
                MONSTER_Y,
                MONSTER_SIZE,
                MONSTER_SIZE,
            )
        })
        .collect();

    Level {
        platforms,
        coins,
        monsters,
        length: LEVEL_LENGTH,
        spawn_x: SPAWN_X,
        spawn_y: SPAWN_Y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PLAYER_HEIGHT, PLAYER_WIDTH};

    #[test]
    fn deterministic_generation() {
        assert_eq!(generate_level(), generate_level());
    }

    #[test]
    fn entity_counts() {
        let level = generate_level();
        assert_eq!(level.platforms.len(), 1 + LEDGE_COUNT);
        assert_eq!(level.coins.len(), COIN_COUNT);
        assert_eq!(level.monsters.len(), MONSTER_COUNT);
    }

    #[test]
    fn ground_spans_level() {
        let level = generate_level();
        let ground = &level.platforms[0];
        assert_eq!(ground.x, 0.0);
        assert_eq!(ground.right(), level.length);
        assert_eq!(ground.y, GROUND_Y);
    }

    #[test]
    fn ledge_layout_follows_pattern() {
        let level = generate_level();
        let ledges = &level.platforms[1..];
        assert_eq!(ledges[0], Rect::new(400.0, 320.0, 120.0, 16.0));
        assert_eq!(ledges[1], Rect::new(700.0, 260.0, 120.0, 16.0));
        assert_eq!(ledges[2], Rect::new(1000.0, 200.0, 120.0, 16.0));
        assert_eq!(ledges[3], Rect::new(1300.0, 320.0, 120.0, 16.0));
        assert_eq!(ledges[7].x, 2500.0);
    }

    #[test]
    fn platforms_do_not_overlap() {
        let level = generate_level();
        for (i, a) in level.platforms.iter().enumerate() {
            for b in &level.platforms[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn coin_layout_follows_pattern() {
        let level = generate_level();
        let positions: Vec<(f32, f32)> = level.coins.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions[0], (350.0, 260.0));
        assert_eq!(positions[1], (610.0, 220.0));
        assert_eq!(positions[3], (1130.0, 140.0));
        assert_eq!(positions[4], (1390.0, 260.0));
        assert_eq!(positions[9], (2690.0, 220.0));
        assert!(level.coins.iter().all(|c| !c.collected));
        assert_eq!(level.collected_count(), 0);
    }

    #[test]
    fn monsters_stand_on_ground() {
        let level = generate_level();
        for (i, m) in level.monsters.iter().enumerate() {
            assert_eq!(m.x, 700.0 + i as f32 * 420.0);
            assert_eq!(m.bottom(), GROUND_Y);
            assert_eq!((m.w, m.h), (60.0, 60.0));
        }
    }

    #[test]
    fn spawn_rests_on_ground_clear_of_monsters() {
        let level = generate_level();
        let spawn = Rect::new(level.spawn_x, level.spawn_y, PLAYER_WIDTH, PLAYER_HEIGHT);
        assert_eq!(spawn.bottom(), GROUND_Y);
        assert!(level.monsters.iter().all(|m| !m.overlaps(&spawn)));
    }
}
