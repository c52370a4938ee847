use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::level_gen::COIN_COUNT;
use crate::physics::{
    DASH_MULTIPLIER, GRAVITY, JUMP_POWER, LAND_TOLERANCE, MAX_JUMPS, MOVE_SPEED, PLAYER_HEIGHT,
    PLAYER_WIDTH,
};
use crate::powerups::{BALLOON_GRAVITY, FISH_SPEED, MODIFIER_DURATION, SPRING_JUMP_POWER};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "WHISKER_ADVENTURE_CONFIG";
/// Config file read when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/whisker.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Player movement tuning. These are the defaults the power-up system
/// restores when a modifier expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration applied once per tick.
    pub gravity: f32,
    /// Horizontal speed (units per tick).
    pub speed: f32,
    /// Initial upward velocity of a jump.
    pub jump_power: f32,
    /// Jumps available between landings (2 = double jump).
    pub max_jumps: u8,
    /// Speed multiplier while dashing (needs dash capability).
    pub dash_multiplier: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Depth below a platform top within which a falling player lands.
    pub land_tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            speed: MOVE_SPEED,
            jump_power: JUMP_POWER,
            max_jumps: MAX_JUMPS,
            dash_multiplier: DASH_MULTIPLIER,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            land_tolerance: LAND_TOLERANCE,
        }
    }
}

/// What touching a monster does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterContactPolicy {
    /// Regenerate the level in place; the lifecycle stays in Playing.
    #[default]
    RegenerateLevel,
    /// Re-run the start action, as if the player pressed Start again.
    RestartRun,
}

/// Win/lose rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub time_limit_secs: f32,
    /// The player must get strictly past this x to win.
    pub goal_x: f32,
    pub coins_to_win: u32,
    /// Edge length of a coin's pickup box.
    pub coin_size: f32,
    pub monster_contact: MonsterContactPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 90.0,
            goal_x: 3600.0,
            coins_to_win: 7,
            coin_size: 36.0,
            monster_contact: MonsterContactPolicy::default(),
        }
    }
}

/// Timed modifier tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub enabled: bool,
    pub duration_secs: f32,
    pub spring_jump_power: f32,
    pub fish_speed: f32,
    pub balloon_gravity: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: MODIFIER_DURATION,
            spring_jump_power: SPRING_JUMP_POWER,
            fish_speed: FISH_SPEED,
            balloon_gravity: BALLOON_GRAVITY,
        }
    }
}

/// Dialogue pauses at scripted x positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub enabled: bool,
    /// Strictly increasing x positions.
    pub thresholds: Vec<f32>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds: vec![600.0, 1400.0, 2200.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance kept between the left screen edge and the player.
    pub lead: f32,
    /// Background scroll factor relative to the camera.
    pub parallax: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lead: 200.0,
            parallax: 0.4,
        }
    }
}

/// Key identifiers bound to each action. Several keys may share an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub jump: Vec<String>,
    pub dash: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["a".to_string()],
            move_right: vec!["d".to_string()],
            jump: vec!["w".to_string()],
            dash: vec!["shift".to_string()],
        }
    }
}

impl KeyBindings {
    fn groups_mut(&mut self) -> [&mut Vec<String>; 4] {
        [
            &mut self.move_left,
            &mut self.move_right,
            &mut self.jump,
            &mut self.dash,
        ]
    }

    /// Lowercase every identifier so lookups match the input snapshot.
    pub fn normalize(&mut self) {
        for group in self.groups_mut() {
            for key in group.iter_mut() {
                *key = key.to_lowercase();
            }
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventureConfig {
    pub physics: PhysicsConfig,
    pub rules: RulesConfig,
    pub power_ups: PowerUpConfig,
    pub narrative: NarrativeConfig,
    pub camera: CameraConfig,
    pub keys: KeyBindings,
}

impl AdventureConfig {
    /// Load config from `WHISKER_ADVENTURE_CONFIG` or `config/whisker.toml`.
    /// A missing file yields defaults; a broken one yields defaults with a warning.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(cfg) => {
                tracing::debug!(%path, "loaded adventure config");
                cfg
            },
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse, normalize key bindings, and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut cfg: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.keys.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let positive = [
            ("physics.gravity", p.gravity),
            ("physics.speed", p.speed),
            ("physics.jump_power", p.jump_power),
            ("physics.player_width", p.player_width),
            ("physics.player_height", p.player_height),
            ("physics.land_tolerance", p.land_tolerance),
            ("rules.time_limit_secs", self.rules.time_limit_secs),
            ("rules.coin_size", self.rules.coin_size),
            ("power_ups.duration_secs", self.power_ups.duration_secs),
            ("power_ups.spring_jump_power", self.power_ups.spring_jump_power),
            ("power_ups.fish_speed", self.power_ups.fish_speed),
            ("power_ups.balloon_gravity", self.power_ups.balloon_gravity),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if p.max_jumps == 0 {
            return Err(ConfigError::Invalid("physics.max_jumps must be >= 1".into()));
        }
        if !(p.dash_multiplier.is_finite() && p.dash_multiplier >= 1.0) {
            return Err(ConfigError::Invalid(
                "physics.dash_multiplier must be >= 1".into(),
            ));
        }
        if !self.rules.goal_x.is_finite() {
            return Err(ConfigError::Invalid("rules.goal_x must be finite".into()));
        }
        if self.rules.coins_to_win as usize > COIN_COUNT {
            return Err(ConfigError::Invalid(format!(
                "rules.coins_to_win ({}) exceeds the {COIN_COUNT} coins in the level",
                self.rules.coins_to_win
            )));
        }
        let thresholds = &self.narrative.thresholds;
        if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(ConfigError::Invalid(
                "narrative.thresholds must be finite and strictly increasing".into(),
            ));
        }
        if !(self.camera.lead.is_finite() && self.camera.lead >= 0.0) {
            return Err(ConfigError::Invalid("camera.lead must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.camera.parallax) {
            return Err(ConfigError::Invalid(
                "camera.parallax must be within [0, 1]".into(),
            ));
        }
        let k = &self.keys;
        for (name, group) in [
            ("keys.move_left", &k.move_left),
            ("keys.move_right", &k.move_right),
            ("keys.jump", &k.jump),
            ("keys.dash", &k.dash),
        ] {
            if group.is_empty() || group.iter().any(|key| key.is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} needs at least one non-empty key"
                )));
            }
        }
        if self.narrative.enabled && !self.power_ups.enabled {
            tracing::warn!(
                "narrative pauses enabled without power-ups; dialogue choices will only resume play"
            );
        }
        Ok(())
    }
}
