//! Game configuration, stored as TOML
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [economy]
//! starting_money = 1000
//!
//! [timing]
//! spawn_cooldown_ms = 500
//! ```

use sandtide_schema::LevelRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{default_waves, EnemyTable, TurretTable, Wave};
use crate::{SimError, TurretKind};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub timing: TimingConfig,
    pub map: MapConfig,
    pub balance: BalanceConfig,
}

impl GameConfig {
    /// Load a config file. Missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded game config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_health: i32,
    pub starting_money: u32,
    pub upgrade_cost: u32,
    /// Fraction of the buy cost refunded on sale
    pub sell_return_rate: f32,
    pub buy_costs: BuyCosts,
    /// Paid when a wave is completed or skipped
    pub wave_reward: u32,
    pub tidal_cost: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_health: 100,
            starting_money: 700,
            upgrade_cost: 100,
            sell_return_rate: 0.3,
            buy_costs: BuyCosts::default(),
            wave_reward: 50,
            tidal_cost: 50,
        }
    }
}

impl EconomyConfig {
    pub fn buy_cost(&self, kind: TurretKind) -> u32 {
        match kind {
            TurretKind::Standard => self.buy_costs.standard,
            TurretKind::Camo => self.buy_costs.camo,
            TurretKind::Purple => self.buy_costs.purple,
        }
    }

    /// Money returned when a turret of this kind is sold, rounded down
    pub fn sell_price(&self, kind: TurretKind) -> u32 {
        (self.buy_cost(kind) as f32 * self.sell_return_rate) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyCosts {
    pub standard: u32,
    pub camo: u32,
    pub purple: u32,
}

impl Default for BuyCosts {
    fn default() -> Self {
        Self {
            standard: 200,
            camo: 200,
            purple: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulated frames per second
    pub fps: u32,
    pub spawn_cooldown_ms: u64,
    /// Time between two frames of a turret's firing animation
    pub animation_delay_ms: u64,
    pub tidal_duration_ms: u64,
    /// Range and damage multiplier of a tidal upgrade
    pub tidal_multiplier: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            spawn_cooldown_ms: 800,
            animation_delay_ms: 15,
            tidal_duration_ms: 30_000,
            tidal_multiplier: 1.25,
        }
    }
}

impl TimingConfig {
    /// Simulated milliseconds elapsed after `frame` frames
    pub fn frame_time_ms(&self, frame: u64) -> u64 {
        frame * 1000 / u64::from(self.fps.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_size: u32,
    pub rows: u32,
    pub cols: u32,
    /// GID of the only tile turrets may be built on
    pub buildable_gid: u32,
    pub tile_layer: String,
    pub waypoint_layer: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: 48,
            rows: 20,
            cols: 20,
            buildable_gid: 161,
            tile_layer: "Background".to_string(),
            waypoint_layer: "waypoints".to_string(),
        }
    }
}

impl MapConfig {
    /// Rules a level must pass to be played with this config
    pub fn level_rules(&self) -> LevelRules {
        LevelRules {
            tile_layer: self.tile_layer.clone(),
            waypoint_layer: self.waypoint_layer.clone(),
            expected_size: Some((self.cols, self.rows)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub enemies: EnemyTable,
    pub turrets: TurretTable,
    pub waves: Vec<Wave>,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            enemies: EnemyTable::default(),
            turrets: TurretTable::default(),
            waves: default_waves(),
        }
    }
}
