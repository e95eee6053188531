//! Per-game state of a level: tile map, path, economy and the wave in progress

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use sandtide_core::{Level, GID_FLIP_MASK};

use crate::config::{EconomyConfig, MapConfig};
use crate::data::{EnemyKind, Wave};
use crate::SimError;

#[derive(Debug, Clone)]
pub struct World {
    /// 1-based number of the current wave
    pub level: u32,
    pub health: i32,
    pub money: u32,
    /// GIDs of the playfield layer, row-major, flip flags removed
    pub tile_map: Vec<u32>,
    pub columns: u32,
    pub rows: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Enemy path in map pixels
    pub waypoints: Vec<Vec2>,
    /// Spawn order of the current wave
    pub enemy_list: Vec<EnemyKind>,
    pub spawned_enemies: usize,
    pub killed_enemies: usize,
    pub missed_enemies: usize,
}

impl World {
    /// Build a world from a level's playfield and waypoint layers
    pub fn from_level(
        level: &Level,
        map: &MapConfig,
        economy: &EconomyConfig,
    ) -> Result<Self, SimError> {
        let tiles = level.tile_layer(&map.tile_layer).ok_or_else(|| {
            SimError::InvalidLevel(format!("missing tile layer '{}'", map.tile_layer))
        })?;
        let expected = level.cell_count();
        if tiles.data.len() as u64 != expected {
            return Err(SimError::InvalidLevel(format!(
                "tile layer '{}' has {} cells, expected {}",
                map.tile_layer,
                tiles.data.len(),
                expected
            )));
        }

        let waypoints: Vec<Vec2> = level
            .waypoints(&map.waypoint_layer)
            .into_iter()
            .map(|p| Vec2::new(p.x, p.y))
            .collect();
        if waypoints.len() < 2 {
            return Err(SimError::InvalidLevel(format!(
                "layer '{}' needs a path of at least 2 waypoints",
                map.waypoint_layer
            )));
        }

        Ok(Self {
            level: 1,
            health: economy.starting_health,
            money: economy.starting_money,
            tile_map: tiles.data.iter().map(|gid| gid & !GID_FLIP_MASK).collect(),
            columns: level.width,
            rows: level.height,
            tile_width: level.tile_width,
            tile_height: level.tile_height,
            waypoints,
            enemy_list: Vec::new(),
            spawned_enemies: 0,
            killed_enemies: 0,
            missed_enemies: 0,
        })
    }

    /// Fill the spawn list for the current wave in random order.
    /// Past the last wave the list stays empty
    pub fn process_enemies(&mut self, waves: &[Wave], rng: &mut impl Rng) {
        self.enemy_list.clear();
        let Some(wave) = (self.level as usize)
            .checked_sub(1)
            .and_then(|index| waves.get(index))
        else {
            return;
        };

        for kind in EnemyKind::ALL {
            for _ in 0..wave.count(kind) {
                self.enemy_list.push(kind);
            }
        }
        self.enemy_list.shuffle(rng);
    }

    /// Every enemy of the wave was either killed or got through
    pub fn is_wave_completed(&self) -> bool {
        self.killed_enemies + self.missed_enemies == self.enemy_list.len()
    }

    pub fn all_spawned(&self) -> bool {
        self.spawned_enemies >= self.enemy_list.len()
    }

    /// Move on to the next wave
    pub fn reset_values(&mut self) {
        self.enemy_list.clear();
        self.level += 1;
        self.spawned_enemies = 0;
        self.killed_enemies = 0;
        self.missed_enemies = 0;
    }

    /// Row-major cell number of a tile
    pub fn tile_number(&self, col: u32, row: u32) -> Option<usize> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    pub fn gid_at(&self, col: u32, row: u32) -> Option<u32> {
        self.tile_number(col, row)
            .and_then(|index| self.tile_map.get(index).copied())
    }

    /// Pixel center of a tile, rounded down like the tile grid
    pub fn tile_center(&self, col: u32, row: u32) -> Vec2 {
        Vec2::new(
            (u64::from(col) * u64::from(self.tile_width) + u64::from(self.tile_width / 2)) as f32,
            (u64::from(row) * u64::from(self.tile_height) + u64::from(self.tile_height / 2)) as f32,
        )
    }

    /// Tile containing a pixel position
    pub fn tile_at(&self, pos: Vec2) -> Option<(u32, u32)> {
        if pos.x < 0.0 || pos.y < 0.0 || self.tile_width == 0 || self.tile_height == 0 {
            return None;
        }
        let col = (pos.x / self.tile_width as f32) as u32;
        let row = (pos.y / self.tile_height as f32) as u32;
        self.tile_number(col, row).map(|_| (col, row))
    }
}
