//! Runtime configuration loaded from `invaders.toml`.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Lookup order: `$INVADERS_CONFIG`, then `./invaders.toml`, then the
//! built-in defaults.

use color_eyre::eyre::{Result, WrapErr, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "INVADERS_CONFIG";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "invaders.toml";

/// Gameplay tunables. Times are in ms, speeds in field units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Play field ───────────────────────────────────────────────────────────
    pub field_width: f64,
    pub field_height: f64,
    /// Bullets flying above this y explode
    pub ceiling: f64,
    /// Terrain baseline sits this far above the bottom edge
    pub ground_offset: f64,
    /// Invaders reaching this far above the bottom edge end the round
    pub breach_offset: f64,

    // ── Player ───────────────────────────────────────────────────────────────
    pub starting_lives: u32,
    pub player_speed: f64,
    pub player_shot_cooldown_ms: f64,
    pub player_respawn_ms: f64,

    // ── Swarm ────────────────────────────────────────────────────────────────
    pub invader_base_speed: f64,
    pub invader_shoot_delay_ms: f64,

    // ── Bonus ship ───────────────────────────────────────────────────────────
    pub bonus_spawn_interval_ms: f64,
    /// Chance per tick of spawning once the interval has passed
    pub bonus_spawn_chance: f64,
    pub bonus_lifespan_ms: f64,

    // ── Bunkers ──────────────────────────────────────────────────────────────
    /// Chance that a hit on a fully damaged bunker destroys it
    pub bunker_destroy_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 560.0,
            field_height: 640.0,
            ceiling: 50.0,
            ground_offset: 60.0,
            breach_offset: 60.0,

            starting_lives: 3,
            player_speed: 150.0,
            player_shot_cooldown_ms: 500.0,
            player_respawn_ms: 1000.0,

            invader_base_speed: 5.0,
            invader_shoot_delay_ms: 1500.0,

            bonus_spawn_interval_ms: 16000.0,
            bonus_spawn_chance: 0.05,
            bonus_lifespan_ms: 10000.0,

            bunker_destroy_chance: 0.35,
        }
    }
}

impl GameConfig {
    /// y of the destructible ground line
    pub fn baseline(&self) -> f64 {
        self.field_height - self.ground_offset
    }

    /// y an invader's bottom edge must not reach
    pub fn breach_line(&self) -> f64 {
        self.field_height - self.breach_offset
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("ceiling", self.ceiling),
            ("ground_offset", self.ground_offset),
            ("breach_offset", self.breach_offset),
        ] {
            if !value.is_finite() {
                bail!("{name} must be a finite number, got {value}");
            }
        }
        // The 11-column formation needs 400 units plus the 22 unit edge margins
        if self.field_width < 448.0 {
            bail!("field_width must be at least 448, got {}", self.field_width);
        }
        if self.field_height < 480.0 {
            bail!("field_height must be at least 480, got {}", self.field_height);
        }
        if self.ground_offset <= 0.0 || self.ground_offset >= self.field_height {
            bail!("ground_offset must be inside the field, got {}", self.ground_offset);
        }
        if self.breach_offset <= 0.0 || self.breach_offset >= self.field_height {
            bail!("breach_offset must be inside the field, got {}", self.breach_offset);
        }
        if self.ceiling <= 0.0 || self.ceiling >= self.baseline() {
            bail!(
                "ceiling must lie between 0 and the ground at {}, got {}",
                self.baseline(),
                self.ceiling
            );
        }
        if self.starting_lives == 0 {
            bail!("starting_lives must be at least 1");
        }
        for (name, value) in [
            ("player_speed", self.player_speed),
            ("player_shot_cooldown_ms", self.player_shot_cooldown_ms),
            ("player_respawn_ms", self.player_respawn_ms),
            ("invader_base_speed", self.invader_base_speed),
            ("invader_shoot_delay_ms", self.invader_shoot_delay_ms),
            ("bonus_spawn_interval_ms", self.bonus_spawn_interval_ms),
            ("bonus_lifespan_ms", self.bonus_lifespan_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be a positive number, got {value}");
            }
        }
        for (name, value) in [
            ("bonus_spawn_chance", self.bonus_spawn_chance),
            ("bunker_destroy_chance", self.bunker_destroy_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be between 0 and 1, got {value}");
            }
        }
        Ok(())
    }
}

/// Sound settings for the rodio backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory holding the .wav cues
    pub asset_dir: PathBuf,
    pub volume: f32,
    /// The bonus ship loop plays louder than everything else
    pub bonus_volume: f32,
    pub start_muted: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets/audio"),
            volume: 0.4,
            bonus_volume: 1.0,
            start_muted: false,
        }
    }
}

/// Frame pacing and input timing for the terminal host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep between frames
    pub frame_ms: u64,
    /// Longest dt handed to the simulation after a stall
    pub max_frame_ms: f64,
    /// How long a key counts as held when the terminal can't report releases
    pub key_hold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            max_frame_ms: 100.0,
            key_hold_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log output file (the terminal itself is taken by the game)
    pub log_file: PathBuf,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    pub game: GameConfig,
    pub audio: AudioConfig,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("invaders.log"),
            seed: None,
            game: GameConfig::default(),
            audio: AudioConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).wrap_err("invalid config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).wrap_err_with(|| format!("in {}", path.display()))
    }

    /// Finds the config file to use and loads it. Returns the path it came from.
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::load(&local)?, Some(local)));
        }
        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate().wrap_err("[game]")?;
        if !(0.0..=1.0).contains(&self.audio.volume) {
            bail!("[audio] volume must be between 0 and 1, got {}", self.audio.volume);
        }
        if !(0.0..=1.0).contains(&self.audio.bonus_volume) {
            bail!(
                "[audio] bonus_volume must be between 0 and 1, got {}",
                self.audio.bonus_volume
            );
        }
        if !(self.timing.max_frame_ms.is_finite() && self.timing.max_frame_ms > 0.0) {
            bail!("[timing] max_frame_ms must be a positive number");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.starting_lives, 3);
        assert_eq!(config.game.baseline(), 580.0);
        assert_eq!(config.game.breach_line(), 580.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            "seed = 42\n\n[game]\nstarting_lives = 5\n\n[timing]\nframe_ms = 10\n",
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.game.starting_lives, 5);
        assert_eq!(config.game.field_width, 560.0);
        assert_eq!(config.timing.frame_ms, 10);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_narrow_field() {
        let err = Config::from_toml("[game]\nfield_width = 300.0\n").unwrap_err();
        assert!(format!("{err:?}").contains("field_width"));
    }

    #[test]
    fn test_rejects_non_finite_geometry() {
        for field in [
            "field_width",
            "field_height",
            "ceiling",
            "ground_offset",
            "breach_offset",
        ] {
            for value in ["nan", "inf", "-inf"] {
                let text = format!("[game]\n{field} = {value}\n");
                let err = Config::from_toml(&text).unwrap_err();
                assert!(format!("{err:?}").contains(field), "{field} = {value}");
            }
        }
    }

    #[test]
    fn test_rejects_non_finite_frame_cap() {
        assert!(Config::from_toml("[timing]\nmax_frame_ms = nan\n").is_err());
        assert!(Config::from_toml("[timing]\nmax_frame_ms = inf\n").is_err());
    }

    #[test]
    fn test_rejects_ceiling_below_ground() {
        assert!(Config::from_toml("[game]\nceiling = 900.0\n").is_err());
        assert!(Config::from_toml("[game]\nceiling = 580.0\n").is_err());
        assert!(Config::from_toml("[game]\nceiling = 0.0\n").is_err());
        assert!(Config::from_toml("[game]\nceiling = 10.0\n").is_ok());
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(Config::from_toml("[game]\nbunker_destroy_chance = 1.5\n").is_err());
        assert!(Config::from_toml("[game]\nbonus_spawn_chance = -0.1\n").is_err());
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        assert!(Config::from_toml("[game]\nplayer_speed = 0.0\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(Config::from_toml("[game\nstarting_lives = 5").is_err());
        assert!(Config::from_toml("[game]\nstarting_lives = \"three\"\n").is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
