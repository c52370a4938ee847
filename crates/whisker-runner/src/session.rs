use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use whisker_adventure::CatAdventure;
use whisker_adventure::events::AdventureEvent;
use whisker_adventure::hud::{RenderView, timer_text};
use whisker_adventure::lifecycle::LifecyclePhase;
use whisker_core::game_trait::WhiskerGame;
use whisker_core::input::InputSnapshot;

use crate::autopilot::Autopilot;
use crate::config::RunnerConfig;

/// Produces per-frame durations: the nominal frame time with seeded jitter,
/// standing in for a display refresh callback.
pub struct FrameClock {
    base: f32,
    jitter: f32,
    rng: StdRng,
}

impl FrameClock {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            base: config.frame_secs(),
            jitter: config.frame_jitter,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn next_dt(&mut self) -> f32 {
        if self.jitter <= 0.0 {
            return self.base;
        }
        let factor = 1.0 + self.rng.random_range(-self.jitter..=self.jitter);
        self.base * factor
    }
}

/// Logs HUD text whenever what a player would see changes.
#[derive(Debug, Default)]
struct HudLog {
    coins: String,
    whole_seconds: Option<u32>,
}

impl HudLog {
    fn observe(&mut self, view: &RenderView<'_>) {
        let coins = view.coin_counter_text();
        if coins != self.coins {
            tracing::info!(hud = %coins, "coin counter");
            self.coins = coins;
        }
        let secs = view.time_left.ceil() as u32;
        if self.whole_seconds != Some(secs) {
            tracing::debug!(hud = %timer_text(view.time_left), "timer");
            self.whole_seconds = Some(secs);
        }
    }
}

/// Running counts of presentation signals. The simulation already logs
/// starts, contacts and endings at info, so those are traced at debug here.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EventTally {
    pub coins_collected: usize,
    pub monster_contacts: usize,
    pub dialogues: usize,
    pub modifiers_applied: usize,
    pub modifiers_expired: usize,
    pub restarts: usize,
}

impl EventTally {
    fn record(&mut self, frame: u64, events: &[AdventureEvent]) {
        for event in events {
            match event {
                AdventureEvent::Started => tracing::debug!(frame, "run started"),
                AdventureEvent::CoinCollected { total } => {
                    self.coins_collected += 1;
                    tracing::debug!(frame, total, "coin collected");
                },
                AdventureEvent::MonsterContact { monster } => {
                    self.monster_contacts += 1;
                    tracing::debug!(frame, monster, "monster contact");
                },
                AdventureEvent::LevelRegenerated => tracing::debug!(frame, "level regenerated"),
                AdventureEvent::RunRestarted => {
                    self.restarts += 1;
                    tracing::debug!(frame, "run restarted");
                },
                AdventureEvent::ThresholdCrossed { index, x } => {
                    self.dialogues += 1;
                    tracing::info!(frame, index, x, "dialogue");
                },
                AdventureEvent::ModifierApplied { kind } => {
                    self.modifiers_applied += 1;
                    tracing::info!(frame, %kind, "modifier applied");
                },
                AdventureEvent::ModifierExpired { kind } => {
                    self.modifiers_expired += 1;
                    tracing::debug!(frame, %kind, "modifier expired");
                },
                AdventureEvent::LevelWon { coins, time_left } => {
                    tracing::debug!(frame, coins, time_left, "level won");
                },
                AdventureEvent::TimeExpired => tracing::debug!(frame, "time expired"),
            }
        }
    }
}

/// Final report printed by the runner.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub outcome: LifecyclePhase,
    pub ending_message: Option<String>,
    pub frames: u64,
    pub simulated_secs: f32,
    pub coins: String,
    pub time_left: f32,
    pub player_x: f32,
    pub events: EventTally,
}

/// Drive `game` from start to a terminal phase (or `max_frames`), feeding
/// autopilot input and jittered frame times.
pub async fn run_session(game: &mut CatAdventure, config: &RunnerConfig) -> SessionSummary {
    let mut clock = FrameClock::new(config);
    let mut autopilot = Autopilot::new(&game.config().keys);
    let mut input = InputSnapshot::new();
    let mut hud = HudLog::default();
    let mut tally = EventTally::default();

    let mut interval = config.realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(config.frame_secs()));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval
    });

    tally.record(0, &game.start());
    hud.observe(&game.view());

    let mut frames = 0;
    let mut simulated_secs = 0.0;
    while frames < config.max_frames && !game.is_over() {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        frames += 1;

        if game.phase() == LifecyclePhase::Paused {
            let choice = autopilot.answer();
            tally.record(frames, &game.choose_modifier(choice));
        }

        autopilot.drive(game.state(), &mut input);
        let dt = clock.next_dt();
        simulated_secs += dt;
        let events = game.update(dt, &mut input);
        tally.record(frames, &events);
        hud.observe(&game.view());
    }

    let view = game.view();
    if let Some(message) = view.ending_message() {
        tracing::info!("{message}");
    } else {
        tracing::warn!(frames, phase = ?view.phase, "frame budget exhausted before the run ended");
    }

    SessionSummary {
        outcome: view.phase,
        ending_message: view.ending_message().map(str::to_string),
        frames,
        simulated_secs,
        coins: view.coin_counter_text(),
        time_left: view.time_left,
        player_x: view.player.x,
        events: tally,
    }
}
