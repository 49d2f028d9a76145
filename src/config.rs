//! Game configuration (config/settings.json).
//!
//! `game`, `player` and `worlds` must be present; the tuning sections fall
//! back to the stock values when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: WindowConfig,
    pub player: PlayerConfig,
    pub worlds: Vec<WorldConfig>,
    #[serde(default)]
    pub rounds: RoundConfig,
    #[serde(default)]
    pub loot: LootConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    /// Restart the round counter at 1 whenever a new world begins.
    #[serde(default = "default_true")]
    pub reset_rounds_on_world_advance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Pixels per second.
    pub speed: f32,
    pub max_hp: i32,
    pub damage: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub world: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub rounds: u32,
    pub enemy_health_multiplier: f32,
    pub enemy_speed_multiplier: f32,
    #[serde(default = "default_multiplier")]
    pub enemy_damage_multiplier: f32,
}

/// Wave pacing and per-round difficulty scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub enemies_per_round: u32,
    pub enemies_increment: u32,
    pub spawn_interval: f32,
    pub break_duration: f32,
    pub base_enemy_hp: i32,
    pub base_enemy_speed: f32,
    pub base_enemy_damage: i32,
    pub hp_scale: f32,
    pub speed_scale: f32,
    pub damage_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Probability that a killed enemy leaves a drop at all.
    pub drop_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Seconds before the shop closes on its own.
    pub time_limit: f32,
}

fn default_true() -> bool { true }
fn default_fps() -> u32 { 60 }
fn default_multiplier() -> f32 { 1.0 }
fn default_title() -> String { "Pixel Survivor: Worlds".to_string() }

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            enemies_per_round: 5,
            enemies_increment: 2,
            spawn_interval: 1.5,
            break_duration: 3.0,
            base_enemy_hp: 30,
            base_enemy_speed: 80.0,
            base_enemy_damage: 10,
            hp_scale: 1.15,
            speed_scale: 1.05,
            damage_scale: 1.10,
        }
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self { drop_chance: 0.5 }
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self { time_limit: 15.0 }
    }
}

impl Default for GameConfig {
    /// The stock settings shipped in config/settings.json.
    fn default() -> Self {
        let world = |id: u32, rounds: u32, hp: f32, speed: f32, damage: f32| WorldConfig {
            world: id,
            name: None,
            rounds,
            enemy_health_multiplier: hp,
            enemy_speed_multiplier: speed,
            enemy_damage_multiplier: damage,
        };
        Self {
            game: WindowConfig {
                title: default_title(),
                window_width: 800,
                window_height: 600,
                fps: 60,
            },
            player: PlayerConfig {
                speed: 300.0,
                max_hp: 100,
                damage: 10,
            },
            worlds: vec![
                world(1, 3, 1.0, 1.0, 1.0),
                world(2, 4, 1.3, 1.1, 1.2),
                world(3, 5, 1.7, 1.2, 1.4),
            ],
            rounds: RoundConfig::default(),
            loot: LootConfig::default(),
            shop: ShopConfig::default(),
            reset_rounds_on_world_advance: true,
        }
    }
}

impl GameConfig {
    /// Read and validate the configuration document at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::info!(
            "Loaded config {} ({} worlds, {}x{})",
            path.display(),
            config.worlds.len(),
            config.game.window_width,
            config.game.window_height
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worlds.is_empty() {
            return Err(ConfigError::NoWorlds);
        }
        if self.game.window_width == 0 || self.game.window_height == 0 {
            return Err(ConfigError::InvalidWindow {
                width: self.game.window_width,
                height: self.game.window_height,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.game.window_width as f32
    }

    pub fn height(&self) -> f32 {
        self.game.window_height as f32
    }
}
