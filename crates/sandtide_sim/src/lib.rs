//! Headless tower-defense simulation for sandtide levels
//!
//! Enemies walk the waypoint path of a Tiled level while turrets built on
//! buildable tiles shoot them. The simulation is frame-stepped and
//! deterministic for a given seed: enemy speeds are pixels per frame and all
//! timers run on simulated milliseconds derived from the frame count.
//!
//! # Example
//!
//! ```rust,ignore
//! use sandtide_sim::{load_map, Game, GameConfig, TurretKind};
//!
//! let config = GameConfig::default();
//! let level = load_map("assets/levels/map1.tmj".as_ref(), &config)?;
//! let mut game = Game::new(config, &[level], 7)?;
//! game.select_map(0)?;
//! game.arm_placement(TurretKind::Purple)?;
//! game.place_turret(3, 4)?;
//! let outcome = game.run(100_000);
//! ```

mod config;
mod data;
mod enemy;
mod error;
mod game;
mod turret;
mod world;

pub use config::{BalanceConfig, BuyCosts, EconomyConfig, GameConfig, MapConfig, TimingConfig};
pub use data::{
    default_waves, Difficulty, EnemyKind, EnemyStats, EnemyTable, TurretKind, TurretLevel,
    TurretTable, Wave,
};
pub use enemy::{Enemy, Step};
pub use error::{CommandError, SimError};
pub use game::{Game, GameState, Outcome};
pub use turret::{Tidal, Turret};
pub use world::World;

use sandtide_core::Level;
use std::path::Path;

/// Load a level together with its tilesets and check it against the map config
pub fn load_map(path: &Path, config: &GameConfig) -> Result<Level, SimError> {
    let loaded = sandtide_schema::load_level(path, &config.map.level_rules())?;
    Ok(loaded.level)
}
