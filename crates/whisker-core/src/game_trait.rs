use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::InputSnapshot;
use crate::snapshot::SnapshotError;

/// Core trait implemented by every Whisker simulation.
///
/// The runner owns the frame source and the input surface; the game only
/// advances its own state and reports what happened as events.
pub trait WhiskerGame {
    /// Presentation signal emitted by `start`, `update` and `restart`.
    type Event: Debug + Clone;

    /// Descriptive metadata shown by front-ends.
    fn metadata(&self) -> GameMetadata;

    /// Frame cadence in Hz the game was tuned for.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Leave the not-started phase and begin a run.
    fn start(&mut self) -> Vec<Self::Event>;

    /// Advance the simulation by one frame. `dt` is measured wall time in seconds.
    fn update(&mut self, dt: f32, input: &mut InputSnapshot) -> Vec<Self::Event>;

    /// Externally requested full reset: regenerate and return to playing.
    fn restart(&mut self) -> Vec<Self::Event>;

    /// Whether the run has reached a terminal phase.
    fn is_over(&self) -> bool;

    /// Encode the complete simulation state.
    fn serialize_state(&self) -> Result<Vec<u8>, SnapshotError>;

    /// Replace the simulation state with a previously encoded one.
    fn apply_state(&mut self, state: &[u8]) -> Result<(), SnapshotError>;
}

/// Game metadata for front-end title screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub estimated_round_duration: Duration,
}

/// Generates the snapshot methods that are identical across games:
/// `serialize_state` and `apply_state`.
///
/// Requires the implementing struct to have a `state: $StateType` field.
#[macro_export]
macro_rules! whisker_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Result<Vec<u8>, $crate::snapshot::SnapshotError> {
            $crate::snapshot::encode(&self.state)
        }

        fn apply_state(&mut self, state: &[u8]) -> Result<(), $crate::snapshot::SnapshotError> {
            self.state = $crate::snapshot::decode::<$StateType>(state)?;
            Ok(())
        }
    };
}
