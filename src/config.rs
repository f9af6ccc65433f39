//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`]. At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! The arena layout and its cell size live here too. They are read exactly once
//! when the arena is built ([`crate::maze::MazeLayout`]); nothing else keeps its
//! own copy.

use crate::combat::{CombatRules, HitRule};
use crate::constants::*;
use crate::director::SpawnPolicy;
use crate::error::{
    require_duration_secs, require_non_negative, require_nonzero, require_positive, GameError,
    GameResult,
};
use crate::maze::MazeLayout;
use crate::state::Vitals;
use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

/// Location of the optional override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/game.toml";

/// Runtime-tunable gameplay configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Player ───────────────────────────────────────────────────────────────
    pub max_health: u32,
    pub max_ammo: u32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub eye_height: f32,

    // ── Arena ────────────────────────────────────────────────────────────────
    pub cell_size: f32,
    pub maze_rows: Vec<String>,

    // ── Enemies ──────────────────────────────────────────────────────────────
    pub enemy_max_alive: usize,
    pub enemy_spawn_cooldown_secs: f32,
    pub enemy_spawn_attempts: u32,
    pub enemy_min_spawn_distance_cells: f32,
    pub enemy_spawn_height: f32,
    pub enemy_max_health: u32,
    /// Fixed seed for the spawn RNG; `None` seeds from entropy.
    pub rng_seed: Option<u64>,

    // ── Combat ───────────────────────────────────────────────────────────────
    pub hit_rule: HitRule,
    pub hit_range: f32,
    pub enemy_hit_radius: f32,
    pub kill_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            max_ammo: PLAYER_MAX_AMMO,
            move_speed: MOVE_SPEED,
            look_sensitivity: LOOK_SENSITIVITY,
            eye_height: EYE_HEIGHT,
            cell_size: CELL_SIZE,
            maze_rows: DEFAULT_MAZE.iter().map(|row| row.to_string()).collect(),
            enemy_max_alive: ENEMY_MAX_ALIVE,
            enemy_spawn_cooldown_secs: ENEMY_SPAWN_COOLDOWN_SECS,
            enemy_spawn_attempts: ENEMY_SPAWN_ATTEMPTS,
            enemy_min_spawn_distance_cells: ENEMY_MIN_SPAWN_DISTANCE_CELLS,
            enemy_spawn_height: ENEMY_SPAWN_HEIGHT,
            enemy_max_health: ENEMY_MAX_HEALTH,
            rng_seed: None,
            hit_rule: HitRule::default(),
            hit_range: HIT_RANGE,
            enemy_hit_radius: ENEMY_HIT_RADIUS,
            kill_score: KILL_SCORE,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot work with.
    pub fn validate(&self) -> GameResult<()> {
        require_nonzero("max_health", self.max_health)?;
        require_nonzero("max_ammo", self.max_ammo)?;
        require_non_negative("move_speed", self.move_speed)?;
        require_non_negative("look_sensitivity", self.look_sensitivity)?;
        require_non_negative("eye_height", self.eye_height)?;
        require_positive("cell_size", self.cell_size)?;
        require_duration_secs("enemy_spawn_cooldown_secs", self.enemy_spawn_cooldown_secs)?;
        require_nonzero("enemy_spawn_attempts", self.enemy_spawn_attempts)?;
        require_non_negative(
            "enemy_min_spawn_distance_cells",
            self.enemy_min_spawn_distance_cells,
        )?;
        require_non_negative("enemy_spawn_height", self.enemy_spawn_height)?;
        require_non_negative("hit_range", self.hit_range)?;
        require_positive("enemy_hit_radius", self.enemy_hit_radius)?;
        if self.enemy_max_health == 0 || self.enemy_max_health > ENEMY_MAX_HEALTH {
            return Err(GameError::InvalidValue {
                name: "enemy_max_health",
                value: self.enemy_max_health.to_string(),
                expected: "an integer in 1..=100",
            });
        }
        self.maze()?;
        Ok(())
    }

    /// Starting vitals for every run.
    pub fn vitals(&self) -> Vitals {
        Vitals {
            max_health: self.max_health,
            max_ammo: self.max_ammo,
        }
    }

    /// Spawn policy for the [`crate::director::EnemyDirector`].
    pub fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy {
            max_alive: self.enemy_max_alive,
            cooldown: self.spawn_cooldown(),
            attempts: self.enemy_spawn_attempts,
            min_distance: self.enemy_min_spawn_distance_cells * self.cell_size,
            enemy_health: self.enemy_max_health,
        }
    }

    /// Cooldown between spawns. An unrepresentable value (only possible when
    /// the config skipped [`Self::validate`]) falls back to the default.
    fn spawn_cooldown(&self) -> Duration {
        require_duration_secs("enemy_spawn_cooldown_secs", self.enemy_spawn_cooldown_secs)
            .unwrap_or_else(|err| {
                warn!("{err}; using {ENEMY_SPAWN_COOLDOWN_SECS}s");
                Duration::from_secs_f32(ENEMY_SPAWN_COOLDOWN_SECS)
            })
    }

    /// Hit resolution parameters for [`crate::combat::resolve`].
    pub fn combat_rules(&self) -> CombatRules {
        CombatRules {
            hit_rule: self.hit_rule,
            range: self.hit_range,
            enemy_radius: self.enemy_hit_radius,
            kill_score: self.kill_score,
        }
    }

    /// Build the arena layout described by `maze_rows` and `cell_size`.
    pub fn maze(&self) -> GameResult<MazeLayout> {
        MazeLayout::parse(
            &self.maze_rows,
            self.cell_size,
            self.eye_height,
            self.enemy_spawn_height,
        )
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with the values in the file.
///
/// Missing keys retain their compiled defaults. Parse and validation errors
/// are logged and the defaults are kept. A missing file is not an error.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {CONFIG_PATH}");
            }
            Err(err) => {
                error!("{err}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = GameConfig::from_toml_str(
            r#"
            max_ammo = 12
            hit_rule = "ray"
            rng_seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.max_ammo, 12);
        assert_eq!(config.hit_rule, HitRule::Ray);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.max_health, PLAYER_MAX_HEALTH);
        assert_eq!(config.maze_rows.len(), DEFAULT_MAZE.len());
    }

    #[test]
    fn unparseable_toml_is_a_config_parse_error() {
        let err = GameConfig::from_toml_str("max_ammo = \"lots\"").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let err = GameConfig::from_toml_str("cell_size = 0.0").unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidValue {
                name: "cell_size",
                ..
            }
        ));
    }

    #[test]
    fn oversized_spawn_cooldown_is_rejected() {
        let err = GameConfig::from_toml_str("enemy_spawn_cooldown_secs = 1e30").unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidValue {
                name: "enemy_spawn_cooldown_secs",
                ..
            }
        ));
    }

    #[test]
    fn unvalidated_oversized_cooldown_falls_back_to_default() {
        let config = GameConfig {
            enemy_spawn_cooldown_secs: 1e30,
            ..Default::default()
        };
        assert_eq!(
            config.spawn_policy().cooldown,
            Duration::from_secs_f32(ENEMY_SPAWN_COOLDOWN_SECS)
        );
    }

    #[test]
    fn enemy_health_above_hundred_is_rejected() {
        assert!(GameConfig::from_toml_str("enemy_max_health = 150").is_err());
    }

    #[test]
    fn min_spawn_distance_scales_with_cell_size() {
        let config = GameConfig {
            cell_size: 4.0,
            ..Default::default()
        };
        assert!((config.spawn_policy().min_distance - 8.0).abs() < 1e-6);
    }
}
