use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;

/// Horizontal scroll offset, recomputed from the player every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Keep the player `lead` units from the left edge, never scrolling
    /// before the level start.
    pub fn follow(&mut self, player_x: f32, cfg: &CameraConfig) {
        self.x = (player_x - cfg.lead).max(0.0);
    }

    /// Scroll offset of the background layer.
    pub fn background_x(&self, cfg: &CameraConfig) -> f32 {
        self.x * cfg.parallax
    }
}
