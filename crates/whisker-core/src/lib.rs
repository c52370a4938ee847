pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod snapshot;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::WhiskerGame;
    use crate::input::InputSnapshot;

    /// Build an input snapshot with the given keys held (and freshly pressed).
    pub fn hold_keys(keys: &[&str]) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        for key in keys {
            input.on_key_down(key);
        }
        input
    }

    /// Run N game ticks against the same input snapshot, returning all accumulated events.
    pub fn run_ticks<G: WhiskerGame>(
        game: &mut G,
        input: &mut InputSnapshot,
        n: usize,
        dt: f32,
    ) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, input));
        }
        all_events
    }

    /// Run ticks with no keys held until `pred` matches an emitted event or
    /// `max_ticks` is reached. Returns the tick index (0-based) of the match.
    pub fn run_until<G: WhiskerGame>(
        game: &mut G,
        max_ticks: usize,
        dt: f32,
        mut pred: impl FnMut(&G::Event) -> bool,
    ) -> Option<usize> {
        let mut input = InputSnapshot::new();
        for tick in 0..max_ticks {
            if game.update(dt, &mut input).iter().any(&mut pred) {
                return Some(tick);
            }
        }
        None
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every WhiskerGame implementation is expected to pass these. Game
    // crates call them from their own tests with a fresh game instance.

    /// update() before start() must not touch the simulation.
    pub fn contract_not_started_ignores_updates<G: WhiskerGame>(game: &mut G) {
        let before = game.serialize_state().expect("state must encode");
        let mut input = hold_keys(&["d", "w"]);
        let events = game.update(1.0, &mut input);
        let after = game.serialize_state().expect("state must encode");
        assert!(events.is_empty(), "no events may be emitted before start");
        assert_eq!(before, after, "state must not change before start");
    }

    /// After start(), update(dt>0) must advance the simulation (timer at minimum).
    pub fn contract_update_advances_state<G: WhiskerGame>(game: &mut G) {
        game.start();
        let before = game.serialize_state().expect("state must encode");
        let mut input = InputSnapshot::new();
        game.update(0.5, &mut input);
        let after = game.serialize_state().expect("state must encode");
        assert_ne!(before, after, "update(dt>0) must advance game state");
    }

    /// serialize_state → apply_state must reproduce identical bytes.
    pub fn contract_snapshot_roundtrip_preserves<G: WhiskerGame>(game: &mut G) {
        let state_a = game.serialize_state().expect("state must encode");
        game.apply_state(&state_a).expect("own snapshot must decode");
        let state_b = game.serialize_state().expect("state must encode");
        assert_eq!(state_a, state_b, "snapshot roundtrip must be lossless");
    }

    /// Garbage bytes must be rejected without touching the current state.
    pub fn contract_rejects_garbage_snapshot<G: WhiskerGame>(game: &mut G) {
        let before = game.serialize_state().expect("state must encode");
        assert!(game.apply_state(&[0xc1, 0xff, 0x00]).is_err());
        let after = game.serialize_state().expect("state must encode");
        assert_eq!(before, after, "rejected snapshot must leave state intact");
    }

    /// An idle game must eventually reach a terminal phase.
    pub fn contract_eventually_over<G: WhiskerGame>(game: &mut G, max_ticks: usize, dt: f32) {
        game.start();
        let mut input = InputSnapshot::new();
        for _ in 0..max_ticks {
            game.update(dt, &mut input);
            if game.is_over() {
                return;
            }
        }
        assert!(
            game.is_over(),
            "game must be over after {max_ticks} idle ticks of {dt}s"
        );
    }
}
