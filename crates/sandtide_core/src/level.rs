//! Levels authored in Tiled and exported as JSON (`.tmj`)
//!
//! Tile layers must be exported with CSV (plain array) encoding.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::CoreError;

/// Tiled stores flip/rotation flags in the high bits of a GID
pub const GID_FLIP_MASK: u32 = 0xF000_0000;

/// A position in map pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Reference from a level to an external tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetRef {
    pub firstgid: u32,
    /// Path to the `.tsx`, relative to the level file. None for embedded tilesets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Tile layer with one GID per cell (0 = empty), row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// A placed object; only position and polyline are read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Polyline points, relative to the object position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Point>>,
}

/// Object group layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// A layer (tiles or objects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayer),
    #[serde(rename = "objectgroup")]
    Objects(ObjectLayer),
    /// Image layers and groups are not used by sandtide levels
    #[serde(other)]
    Unsupported,
}

impl Layer {
    pub fn name(&self) -> Option<&str> {
        match self {
            Layer::Tiles(layer) => Some(&layer.name),
            Layer::Objects(layer) => Some(&layer.name),
            Layer::Unsupported => None,
        }
    }
}

/// A complete level: grid size, tileset references and layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Level {
    /// Load a level from a `.tmj` file
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let level = Self::from_json_str(&content)?;
        tracing::debug!(
            "Loaded level {:?}: {}x{} tiles, {} layers",
            path,
            level.width,
            level.height,
            level.layers.len()
        );
        Ok(level)
    }

    /// Parse a level from `.tmj` JSON text
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Size of the map in pixels
    pub fn pixel_size(&self) -> (u64, u64) {
        (
            u64::from(self.width) * u64::from(self.tile_width),
            u64::from(self.height) * u64::from(self.tile_height),
        )
    }

    /// Number of cells a tile layer of this map holds
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Get a tile layer by name
    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Tiles(tiles) if tiles.name == name => Some(tiles),
            _ => None,
        })
    }

    /// Get an object layer by name
    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Objects(objects) if objects.name == name => Some(objects),
            _ => None,
        })
    }

    /// Polyline points of every object in the layer, in absolute map pixels
    pub fn waypoints(&self, layer_name: &str) -> Vec<Point> {
        let Some(layer) = self.object_layer(layer_name) else {
            return Vec::new();
        };

        layer
            .objects
            .iter()
            .filter_map(|obj| obj.polyline.as_ref().map(|line| (obj, line)))
            .flat_map(|(obj, line)| {
                line.iter()
                    .map(move |p| Point::new(obj.x + p.x, obj.y + p.y))
            })
            .collect()
    }

    /// Row-major cell number of a tile coordinate
    pub fn tile_number(&self, col: u32, row: u32) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        usize::try_from(u64::from(row) * u64::from(self.width) + u64::from(col)).ok()
    }

    /// Tile coordinate containing a pixel position
    pub fn tile_at_pixel(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        if x < 0.0 || y < 0.0 || self.tile_width == 0 || self.tile_height == 0 {
            return None;
        }
        let col = (x / self.tile_width as f32) as u32;
        let row = (y / self.tile_height as f32) as u32;
        self.tile_number(col, row).map(|_| (col, row))
    }

    /// Pixel position of a tile's center
    pub fn tile_center(&self, col: u32, row: u32) -> Point {
        Point::new(
            (u64::from(col) * u64::from(self.tile_width) + u64::from(self.tile_width / 2)) as f32,
            (u64::from(row) * u64::from(self.tile_height) + u64::from(self.tile_height / 2)) as f32,
        )
    }

    /// GID at a cell of a tile layer, flip flags removed
    pub fn gid_at(&self, layer_name: &str, col: u32, row: u32) -> Option<u32> {
        let layer = self.tile_layer(layer_name)?;
        let index = self.tile_number(col, row)?;
        layer.data.get(index).map(|gid| gid & !GID_FLIP_MASK)
    }

    /// Resolve a GID to (tileset reference index, local tile id).
    /// Returns None for the empty GID 0 or when no tileset covers it
    pub fn resolve_gid(&self, gid: u32) -> Option<(usize, u32)> {
        let gid = gid & !GID_FLIP_MASK;
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .enumerate()
            .filter(|(_, ts)| ts.firstgid <= gid)
            .max_by_key(|(_, ts)| ts.firstgid)
            .map(|(index, ts)| (index, gid - ts.firstgid))
    }
}
