/// Frame-source settings for the headless runner, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Pace frames against the wall clock instead of running flat out.
    pub realtime: bool,
    pub frame_hz: f32,
    /// Relative frame-time jitter, 0.0 = perfectly even frames.
    pub frame_jitter: f32,
    pub max_frames: u64,
    pub seed: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            frame_hz: 60.0,
            frame_jitter: 0.1,
            // Two full time limits at 60 Hz.
            max_frames: 10_800,
            seed: 0x5EED_CA7,
        }
    }
}

/// Largest accepted jitter; keeps every frame duration positive.
const MAX_JITTER: f32 = 0.9;

/// Highest accepted frame rate; keeps the realtime frame period above 1 ms.
const MAX_FRAME_HZ: f32 = 1000.0;

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable or out-of-range values are
    /// ignored with a warning and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("WHISKER_REALTIME")
            && !val.is_empty()
        {
            config.realtime = matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(val) = lookup("WHISKER_FRAME_HZ") {
            match val.trim().parse::<f32>() {
                Ok(hz) if hz > 0.0 && hz <= MAX_FRAME_HZ => config.frame_hz = hz,
                _ => tracing::warn!(value = %val, "ignoring WHISKER_FRAME_HZ"),
            }
        }
        if let Some(val) = lookup("WHISKER_FRAME_JITTER") {
            match val.trim().parse::<f32>() {
                Ok(j) if (0.0..=MAX_JITTER).contains(&j) => config.frame_jitter = j,
                _ => tracing::warn!(value = %val, "ignoring WHISKER_FRAME_JITTER"),
            }
        }
        if let Some(val) = lookup("WHISKER_MAX_FRAMES")
            && let Ok(n) = val.trim().parse::<u64>()
        {
            config.max_frames = n;
        }
        if let Some(val) = lookup("WHISKER_SEED")
            && let Ok(n) = val.trim().parse::<u64>()
        {
            config.seed = n;
        }

        config
    }

    /// Nominal seconds per frame.
    pub fn frame_secs(&self) -> f32 {
        1.0 / self.frame_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(RunnerConfig::from_lookup(|_| None), RunnerConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let cfg = RunnerConfig::from_lookup(lookup(&[
            ("WHISKER_REALTIME", "true"),
            ("WHISKER_FRAME_HZ", "30"),
            ("WHISKER_FRAME_JITTER", "0"),
            ("WHISKER_MAX_FRAMES", "500"),
            ("WHISKER_SEED", "42"),
        ]));
        assert!(cfg.realtime);
        assert_eq!(cfg.frame_hz, 30.0);
        assert_eq!(cfg.frame_jitter, 0.0);
        assert_eq!(cfg.max_frames, 500);
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = RunnerConfig::from_lookup(lookup(&[
            ("WHISKER_FRAME_HZ", "-5"),
            ("WHISKER_FRAME_JITTER", "2.5"),
            ("WHISKER_MAX_FRAMES", "lots"),
        ]));
        let defaults = RunnerConfig::default();
        assert_eq!(cfg.frame_hz, defaults.frame_hz);
        assert_eq!(cfg.frame_jitter, defaults.frame_jitter);
        assert_eq!(cfg.max_frames, defaults.max_frames);
    }

    #[test]
    fn frame_rate_is_capped() {
        for hz in ["1e10", "inf", "NaN", "1000.5"] {
            let cfg = RunnerConfig::from_lookup(lookup(&[("WHISKER_FRAME_HZ", hz)]));
            assert_eq!(cfg.frame_hz, 60.0, "{hz}");
        }
        let cfg = RunnerConfig::from_lookup(lookup(&[("WHISKER_FRAME_HZ", "1000")]));
        assert_eq!(cfg.frame_hz, 1000.0);
        assert!(Duration::from_secs_f32(cfg.frame_secs()) >= Duration::from_millis(1));
    }

    #[test]
    fn realtime_flag_spellings() {
        for off in ["0", "false", "no"] {
            let cfg = RunnerConfig::from_lookup(lookup(&[("WHISKER_REALTIME", off)]));
            assert!(!cfg.realtime, "{off}");
        }
        let cfg = RunnerConfig::from_lookup(lookup(&[("WHISKER_REALTIME", "ON ")]));
        assert!(cfg.realtime);
    }
}
