use whisker_adventure::SimulationState;
use whisker_adventure::config::KeyBindings;
use whisker_adventure::powerups::ModifierKind;
use whisker_core::input::InputSnapshot;

/// Gap (world units) between the cat's right edge and a monster at which
/// the autopilot takes off.
const JUMP_LEAD: f32 = 40.0;

/// Scripted keyboard: walks right, double-jumps over monsters and answers
/// every dialogue with the next modifier in rotation.
#[derive(Debug, Clone)]
pub struct Autopilot {
    right_key: String,
    jump_key: String,
    next_choice: ModifierKind,
}

impl Autopilot {
    pub fn new(keys: &KeyBindings) -> Self {
        Self {
            right_key: first_or(&keys.move_right, "d"),
            jump_key: first_or(&keys.jump, "w"),
            next_choice: ModifierKind::Spring,
        }
    }

    /// Update the held keys for the coming frame.
    ///
    /// The jump key is held for one frame and released on the next so the
    /// simulation sees a fresh press each time.
    pub fn drive(&self, state: &SimulationState, input: &mut InputSnapshot) {
        if !input.is_key_down(&self.right_key) {
            input.on_key_down(&self.right_key);
        }
        if self.wants_jump(state) && !input.is_key_down(&self.jump_key) {
            input.on_key_down(&self.jump_key);
        } else if input.is_key_down(&self.jump_key) {
            input.on_key_up(&self.jump_key);
        }
    }

    /// Take off from the ground when a monster is close ahead, and spend the
    /// second jump once the first one starts falling.
    pub fn wants_jump(&self, state: &SimulationState) -> bool {
        let player = &state.player;
        let front = player.x + player.w;
        let threat = state
            .level
            .monsters
            .iter()
            .any(|m| m.right() > player.x && m.x - front <= JUMP_LEAD);
        if !threat || player.jumps_left == 0 {
            return false;
        }
        player.grounded || player.vy >= 0.0
    }

    /// Pick the modifier for a pending dialogue.
    pub fn answer(&mut self) -> ModifierKind {
        let choice = self.next_choice;
        self.next_choice = choice.next();
        choice
    }
}

fn first_or(bindings: &[String], fallback: &str) -> String {
    bindings
        .first()
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}
