//! Read-only surface for the render consumer and HUD text.

use whisker_core::geometry::Rect;

use crate::level_gen::Coin;
use crate::lifecycle::LifecyclePhase;
use crate::powerups::ModifierKind;

/// Snapshot of everything a renderer draws for one frame. Borrowed from the
/// simulation after the tick completes.
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub player: Rect,
    pub platforms: &'a [Rect],
    pub coins: &'a [Coin],
    pub monsters: &'a [Rect],
    pub camera_x: f32,
    pub background_x: f32,
    pub coins_collected: usize,
    pub coin_total: usize,
    pub time_left: f32,
    pub phase: LifecyclePhase,
    /// Active modifier and its remaining seconds.
    pub active_modifier: Option<(ModifierKind, f32)>,
}

impl RenderView<'_> {
    pub fn coin_counter_text(&self) -> String {
        coin_counter_text(self.coins_collected, self.coin_total)
    }

    pub fn timer_text(&self) -> String {
        timer_text(self.time_left)
    }

    pub fn ending_message(&self) -> Option<&'static str> {
        ending_message(self.phase)
    }
}

pub fn coin_counter_text(collected: usize, total: usize) -> String {
    format!("Coins: {collected} / {total}")
}

/// One decimal place, never negative (not even "-0.0").
pub fn timer_text(time_left: f32) -> String {
    let shown = if time_left > 0.0 { time_left } else { 0.0 };
    format!("Time: {shown:.1}")
}

/// End-screen line for a terminal phase.
pub fn ending_message(phase: LifecyclePhase) -> Option<&'static str> {
    match phase {
        LifecyclePhase::Won => Some("Thank you for adventuring with me! Play again?"),
        LifecyclePhase::Lost => Some("Time is up! Try again!"),
        _ => None,
    }
}
