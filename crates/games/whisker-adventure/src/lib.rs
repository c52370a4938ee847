pub mod camera;
pub mod config;
pub mod events;
pub mod hud;
pub mod level_gen;
pub mod lifecycle;
pub mod narrative;
pub mod physics;
pub mod powerups;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use whisker_core::game_trait::{GameMetadata, WhiskerGame};
use whisker_core::input::InputSnapshot;
use whisker_core::whisker_game_boilerplate;

use camera::Camera;
use config::{AdventureConfig, MonsterContactPolicy};
use events::AdventureEvent;
use hud::RenderView;
use level_gen::{Level, generate_level};
use lifecycle::{Lifecycle, LifecyclePhase};
use narrative::NarrativeTrack;
use physics::{PlayerIntent, PlayerState, collect_coins, monster_contact, tick_player};
use powerups::{ModifierKind, ModifierSlot, apply_modifier, clear_modifier, tick_modifier};

/// Everything the tick mutates. Owned by a single game instance; renderers
/// only read it between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub player: PlayerState,
    pub level: Level,
    pub camera: Camera,
    pub lifecycle: Lifecycle,
    pub modifier: ModifierSlot,
    pub narrative: NarrativeTrack,
    pub coins_collected: usize,
    /// Simulated ticks since the last (re)generation.
    pub ticks: u64,
}

impl SimulationState {
    pub fn new(cfg: &AdventureConfig) -> Self {
        let level = generate_level();
        let player = PlayerState::new(level.spawn_x, level.spawn_y, &cfg.physics);
        let mut state = Self {
            player,
            level,
            camera: Camera::default(),
            lifecycle: Lifecycle::new(cfg.rules.time_limit_secs),
            modifier: ModifierSlot::default(),
            narrative: NarrativeTrack::new(cfg.narrative.thresholds.clone()),
            coins_collected: 0,
            ticks: 0,
        };
        state.camera.follow(state.player.x, &cfg.camera);
        state
    }

    /// Replace the world with a freshly generated level, respawn the player,
    /// refill the timer, drop any modifier and re-arm the dialogue thresholds.
    /// The lifecycle phase is left alone.
    pub fn regenerate(&mut self, cfg: &AdventureConfig) {
        self.level = generate_level();
        self.player.reset_to(self.level.spawn_x, self.level.spawn_y);
        clear_modifier(&mut self.modifier, &mut self.player.params, &cfg.physics);
        self.lifecycle.reset_timer();
        self.narrative.rewind();
        self.coins_collected = 0;
        self.ticks = 0;
        self.camera.follow(self.player.x, &cfg.camera);
    }

    fn has_met_win_condition(&self, cfg: &AdventureConfig) -> bool {
        self.player.x > cfg.rules.goal_x && self.coins_collected >= cfg.rules.coins_to_win as usize
    }
}

/// Regenerate and enter Playing. Only valid from NotStarted.
fn start_run(state: &mut SimulationState, cfg: &AdventureConfig) -> Vec<AdventureEvent> {
    if state.lifecycle.phase() != LifecyclePhase::NotStarted {
        tracing::warn!(phase = ?state.lifecycle.phase(), "start ignored: run already started");
        return Vec::new();
    }
    state.regenerate(cfg);
    state.lifecycle.start();
    tracing::info!(time_limit = cfg.rules.time_limit_secs, "run started");
    vec![AdventureEvent::Started]
}

/// Advance the simulation by one tick.
///
/// Does nothing unless the lifecycle is Playing. Order within a tick:
/// movement and landing, coin pickup, monster contact (ends the tick after
/// the reset), dialogue threshold, modifier countdown, camera, win check
/// (ends the tick), timer. A crossed threshold pauses at the end of the
/// tick, so the crossing tick still spends its `dt` on the timer and the
/// active modifier. A run that ends on that tick does not pause.
pub fn step(
    state: &mut SimulationState,
    input: &mut InputSnapshot,
    dt: f32,
    cfg: &AdventureConfig,
) -> Vec<AdventureEvent> {
    let mut events = Vec::new();
    if !state.lifecycle.is_playing() {
        return events;
    }
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
    state.ticks += 1;

    let intent = PlayerIntent::read(input, &cfg.keys, state.player.jumps_left > 0);
    tick_player(
        &mut state.player,
        &intent,
        &state.level.platforms,
        &cfg.physics,
        state.level.length,
    );

    let hitbox = state.player.hitbox();
    let picked = collect_coins(&hitbox, &mut state.level.coins, cfg.rules.coin_size);
    for _ in 0..picked {
        state.coins_collected += 1;
        events.push(AdventureEvent::CoinCollected {
            total: state.coins_collected,
        });
    }

    if let Some(monster) = monster_contact(&hitbox, &state.level.monsters) {
        events.push(AdventureEvent::MonsterContact { monster });
        match cfg.rules.monster_contact {
            MonsterContactPolicy::RegenerateLevel => {
                tracing::info!(monster, "monster contact, regenerating level");
                state.regenerate(cfg);
                events.push(AdventureEvent::LevelRegenerated);
            },
            MonsterContactPolicy::RestartRun => {
                tracing::info!(monster, "monster contact, restarting run");
                input.release_all();
                state.lifecycle.reset();
                events.extend(start_run(state, cfg));
                events.push(AdventureEvent::RunRestarted);
            },
        }
        return events;
    }

    let crossed = if cfg.narrative.enabled {
        state.narrative.check(state.player.x)
    } else {
        None
    };

    if let Some(kind) = tick_modifier(
        &mut state.modifier,
        &mut state.player.params,
        dt,
        &cfg.physics,
    ) {
        tracing::debug!(%kind, "modifier expired");
        events.push(AdventureEvent::ModifierExpired { kind });
    }

    state.camera.follow(state.player.x, &cfg.camera);

    if state.has_met_win_condition(cfg) && state.lifecycle.win() {
        tracing::info!(
            coins = state.coins_collected,
            time_left = state.lifecycle.time_left(),
            "level won"
        );
        events.push(AdventureEvent::LevelWon {
            coins: state.coins_collected,
            time_left: state.lifecycle.time_left(),
        });
        return events;
    }

    if state.lifecycle.tick_timer(dt) {
        tracing::info!(coins = state.coins_collected, "time expired");
        events.push(AdventureEvent::TimeExpired);
        return events;
    }

    if let Some(index) = crossed
        && state.lifecycle.pause()
    {
        let x = state.narrative.threshold(index).unwrap_or(state.player.x);
        tracing::debug!(index, x, "dialogue threshold crossed");
        events.push(AdventureEvent::ThresholdCrossed { index, x });
    }

    events
}

/// The cat platformer: one player, one level, one countdown.
pub struct CatAdventure {
    config: AdventureConfig,
    state: SimulationState,
}

impl CatAdventure {
    pub fn new() -> Self {
        Self::with_config(AdventureConfig::default())
    }

    pub fn with_config(config: AdventureConfig) -> Self {
        let state = SimulationState::new(&config);
        Self { config, state }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn config(&self) -> &AdventureConfig {
        &self.config
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.lifecycle.phase()
    }

    /// Answer the pending dialogue: apply `kind` and resume play.
    pub fn choose_modifier(&mut self, kind: ModifierKind) -> Vec<AdventureEvent> {
        if self.phase() != LifecyclePhase::Paused {
            tracing::warn!(
                %kind,
                phase = ?self.phase(),
                "modifier choice outside a dialogue ignored"
            );
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.config.power_ups.enabled {
            let replaced = apply_modifier(
                &mut self.state.modifier,
                &mut self.state.player.params,
                kind,
                &self.config.power_ups,
            );
            tracing::debug!(%kind, ?replaced, "modifier applied");
            events.push(AdventureEvent::ModifierApplied { kind });
        } else {
            tracing::warn!(%kind, "power-ups disabled, resuming without modifier");
        }
        self.state.lifecycle.resume();
        events
    }

    /// Leave a dialogue without choosing a modifier.
    pub fn resume(&mut self) -> bool {
        self.state.lifecycle.resume()
    }

    /// Read-only view for the render consumer.
    pub fn view(&self) -> RenderView<'_> {
        let s = &self.state;
        RenderView {
            player: s.player.hitbox(),
            platforms: &s.level.platforms,
            coins: &s.level.coins,
            monsters: &s.level.monsters,
            camera_x: s.camera.x,
            background_x: s.camera.background_x(&self.config.camera),
            coins_collected: s.coins_collected,
            coin_total: s.level.coins.len(),
            time_left: s.lifecycle.time_left(),
            phase: s.lifecycle.phase(),
            active_modifier: s.modifier.active().map(|a| (a.kind, a.remaining)),
        }
    }
}

impl Default for CatAdventure {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiskerGame for CatAdventure {
    type Event = AdventureEvent;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Whisker Adventure".to_string(),
            description: "Collect coins, dodge monsters and reach the goal before time runs out."
                .to_string(),
            estimated_round_duration: Duration::try_from_secs_f32(
                self.state.lifecycle.time_limit(),
            )
            .unwrap_or_default(),
        }
    }

    fn start(&mut self) -> Vec<AdventureEvent> {
        start_run(&mut self.state, &self.config)
    }

    fn update(&mut self, dt: f32, input: &mut InputSnapshot) -> Vec<AdventureEvent> {
        step(&mut self.state, input, dt, &self.config)
    }

    fn restart(&mut self) -> Vec<AdventureEvent> {
        tracing::info!(phase = ?self.phase(), "restart requested");
        self.state.lifecycle.reset();
        start_run(&mut self.state, &self.config)
    }

    fn is_over(&self) -> bool {
        self.phase().is_terminal()
    }

    whisker_game_boilerplate!(state_type: SimulationState);
}

#[cfg(test)]
mod tests {
    use super::*;
    use whisker_core::test_helpers::{
        contract_eventually_over, contract_not_started_ignores_updates,
        contract_rejects_garbage_snapshot, contract_snapshot_roundtrip_preserves,
        contract_update_advances_state, hold_keys, run_ticks,
    };

    const DT: f32 = 1.0 / 60.0;

    fn started() -> CatAdventure {
        let mut game = CatAdventure::new();
        game.start();
        game
    }

    fn quiet_config() -> AdventureConfig {
        let mut cfg = AdventureConfig::default();
        cfg.narrative.enabled = false;
        cfg
    }

    #[test]
    fn contract_suite() {
        contract_not_started_ignores_updates(&mut CatAdventure::new());
        contract_update_advances_state(&mut CatAdventure::new());
        contract_snapshot_roundtrip_preserves(&mut started());
        contract_rejects_garbage_snapshot(&mut started());
        contract_eventually_over(&mut CatAdventure::new(), 200, 1.0);
    }

    #[test]
    fn start_enters_playing_once() {
        let mut game = CatAdventure::new();
        assert_eq!(game.phase(), LifecyclePhase::NotStarted);
        assert_eq!(game.start(), vec![AdventureEvent::Started]);
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert!(game.start().is_empty(), "second start is ignored");
    }

    #[test]
    fn state_roundtrip_through_msgpack() {
        let mut game = started();
        let mut input = hold_keys(&["d"]);
        run_ticks(&mut game, &mut input, 30, DT);

        let bytes = rmp_serde::to_vec(game.state()).unwrap();
        let back: SimulationState = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(&back, game.state());
    }

    #[test]
    fn apply_state_restores_snapshot() {
        let mut game = started();
        let snapshot = game.serialize_state().unwrap();
        let mut input = hold_keys(&["d"]);
        run_ticks(&mut game, &mut input, 20, DT);
        assert!(game.state().player.x > 100.0);

        game.apply_state(&snapshot).unwrap();
        assert_eq!(game.state().player.x, 100.0);
    }

    #[test]
    fn coin_event_carries_running_total() {
        let mut game = CatAdventure::with_config(quiet_config());
        game.start();
        let coin = game.state().level.coins[0].clone();
        let player = &mut game.state_mut().player;
        player.x = coin.x;
        player.y = coin.y;
        player.jumps_left = 0;

        let events = game.update(DT, &mut InputSnapshot::new());
        assert!(events.contains(&AdventureEvent::CoinCollected { total: 1 }));
        assert_eq!(game.state().coins_collected, 1);
    }

    #[test]
    fn monster_contact_regenerates_in_place() {
        let mut game = CatAdventure::with_config(quiet_config());
        game.start();
        game.state_mut().level.coins[2].collected = true;
        game.state_mut().coins_collected = 1;
        let monster = game.state().level.monsters[0];
        game.state_mut().player.x = monster.x;

        let events = game.update(DT, &mut InputSnapshot::new());
        assert_eq!(
            events,
            vec![
                AdventureEvent::MonsterContact { monster: 0 },
                AdventureEvent::LevelRegenerated
            ]
        );
        let state = game.state();
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert_eq!((state.player.x, state.player.y), (100.0, 380.0));
        assert_eq!(state.coins_collected, 0);
        assert_eq!(state.level.collected_count(), 0);
        assert_eq!(state.lifecycle.time_left(), 90.0);
    }

    #[test]
    fn monster_contact_can_restart_the_run() {
        let mut cfg = quiet_config();
        cfg.rules.monster_contact = MonsterContactPolicy::RestartRun;
        let mut game = CatAdventure::with_config(cfg);
        game.start();
        let monster = game.state().level.monsters[1];
        game.state_mut().player.x = monster.x;

        let mut input = hold_keys(&["d"]);
        let events = game.update(DT, &mut input);
        assert_eq!(
            events,
            vec![
                AdventureEvent::MonsterContact { monster: 1 },
                AdventureEvent::Started,
                AdventureEvent::RunRestarted
            ]
        );
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert!(!input.is_key_down("d"), "restart drops held keys");
    }

    #[test]
    fn contact_clears_active_modifier() {
        let mut game = started();
        let mut input = hold_keys(&["d"]);
        run_ticks(&mut game, &mut input, 400, DT);
        assert_eq!(game.phase(), LifecyclePhase::Paused);
        game.choose_modifier(ModifierKind::Balloon);
        assert_eq!(game.state().player.params.gravity, 0.3);

        let monster = game.state().level.monsters[0];
        game.state_mut().player.x = monster.x;
        game.state_mut().player.y = monster.y;
        game.update(DT, &mut InputSnapshot::new());
        assert!(game.state().modifier.is_empty());
        assert_eq!(game.state().player.params.gravity, 0.8);
    }

    #[test]
    fn dialogue_pauses_and_choice_resumes() {
        let mut game = started();
        game.state_mut().player.x = 590.0;
        let mut input = hold_keys(&["d"]);
        let events = run_ticks(&mut game, &mut input, 10, DT);

        assert_eq!(
            events,
            vec![AdventureEvent::ThresholdCrossed { index: 0, x: 600.0 }]
        );
        assert_eq!(game.phase(), LifecyclePhase::Paused);
        let frozen = game.state().clone();
        run_ticks(&mut game, &mut input, 10, DT);
        assert_eq!(game.state(), &frozen, "paused simulation must not move");

        let events = game.choose_modifier(ModifierKind::Spring);
        assert_eq!(
            events,
            vec![AdventureEvent::ModifierApplied {
                kind: ModifierKind::Spring
            }]
        );
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert_eq!(game.state().player.params.jump_power, 22.0);
    }

    #[test]
    fn choice_outside_dialogue_is_ignored() {
        let mut game = started();
        assert!(game.choose_modifier(ModifierKind::Fish).is_empty());
        assert!(game.state().modifier.is_empty());
        assert_eq!(game.state().player.params.speed, 3.0);
    }

    #[test]
    fn disabled_power_ups_resume_without_modifier() {
        let mut cfg = AdventureConfig::default();
        cfg.power_ups.enabled = false;
        let mut game = CatAdventure::with_config(cfg);
        game.start();
        game.state_mut().player.x = 601.0;
        game.update(DT, &mut InputSnapshot::new());
        assert_eq!(game.phase(), LifecyclePhase::Paused);

        assert!(game.choose_modifier(ModifierKind::Fish).is_empty());
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert!(game.state().modifier.is_empty());
    }

    #[test]
    fn modifier_expires_after_its_duration() {
        let mut game = started();
        game.state_mut().player.x = 601.0;
        game.update(DT, &mut InputSnapshot::new());
        game.choose_modifier(ModifierKind::Fish);

        let events = run_ticks(&mut game, &mut InputSnapshot::new(), 320, DT);
        assert!(events.contains(&AdventureEvent::ModifierExpired {
            kind: ModifierKind::Fish
        }));
        assert!(!game.state().player.params.dash_enabled);
        assert_eq!(game.state().player.params.speed, 3.0);
    }

    #[test]
    fn held_jump_fires_once() {
        let mut game = started();
        let mut input = hold_keys(&["w"]);
        game.update(DT, &mut input);
        assert_eq!(game.state().player.jumps_left, 1);
        run_ticks(&mut game, &mut input, 5, DT);
        assert_eq!(game.state().player.jumps_left, 1, "holding must not re-jump");

        input.on_key_up("w");
        input.on_key_down("w");
        game.update(DT, &mut input);
        assert_eq!(game.state().player.jumps_left, 0, "second press double-jumps");
    }

    #[test]
    fn terminal_phase_freezes_simulation() {
        let mut cfg = quiet_config();
        cfg.rules.time_limit_secs = 0.5;
        let mut game = CatAdventure::with_config(cfg);
        game.start();
        let events = run_ticks(&mut game, &mut InputSnapshot::new(), 2, 0.3);
        assert_eq!(events, vec![AdventureEvent::TimeExpired]);
        assert!(game.is_over());

        let frozen = game.state().clone();
        let mut input = hold_keys(&["d", "w"]);
        assert!(run_ticks(&mut game, &mut input, 10, DT).is_empty());
        assert_eq!(game.state(), &frozen);
    }

    #[test]
    fn restart_leaves_terminal_phase() {
        let mut cfg = quiet_config();
        cfg.rules.time_limit_secs = 0.1;
        let mut game = CatAdventure::with_config(cfg);
        game.start();
        game.update(0.5, &mut InputSnapshot::new());
        assert_eq!(game.phase(), LifecyclePhase::Lost);

        assert_eq!(game.restart(), vec![AdventureEvent::Started]);
        assert_eq!(game.phase(), LifecyclePhase::Playing);
        assert_eq!(game.state().lifecycle.time_left(), 0.1);
    }

    #[test]
    fn view_reflects_state() {
        let mut game = started();
        game.state_mut().player.x = 500.0;
        game.update(DT, &mut InputSnapshot::new());
        let view = game.view();
        assert_eq!(view.camera_x, 300.0);
        assert!((view.background_x - 120.0).abs() < 1e-3);
        assert_eq!(view.coin_total, 10);
        assert_eq!(view.platforms.len(), 9);
        assert_eq!(view.monsters.len(), 7);
        assert_eq!(view.coin_counter_text(), "Coins: 0 / 10");
        assert_eq!(view.phase, LifecyclePhase::Playing);
        assert_eq!(view.ending_message(), None);
    }

    #[test]
    fn metadata_reports_time_limit() {
        let game = CatAdventure::new();
        let meta = game.metadata();
        assert_eq!(meta.name, "Whisker Adventure");
        assert_eq!(meta.estimated_round_duration, Duration::from_secs(90));
        assert_eq!(game.tick_rate(), 60.0);
    }

    #[test]
    fn metadata_tolerates_unvalidated_time_limit() {
        let mut cfg = AdventureConfig::default();
        cfg.rules.time_limit_secs = -1.0;
        let game = CatAdventure::with_config(cfg);
        assert_eq!(game.metadata().estimated_round_duration, Duration::ZERO);

        let mut cfg = AdventureConfig::default();
        cfg.rules.time_limit_secs = f32::NAN;
        let game = CatAdventure::with_config(cfg);
        assert_eq!(game.metadata().estimated_round_duration, Duration::ZERO);
    }
}
