//! Core data structures for sandtide
//!
//! This crate provides the fundamental types for the tile assets a sandtide
//! level is built from:
//! - `Tileset` - Image sheet slicing (tile size, spacing, margin, columns)
//! - `WangSet` - Corner/edge color tables used by Tiled's terrain brush
//! - `Level` - A Tiled JSON map with tile layers and waypoint polylines
//!
//! Tilesets are read from Tiled's `.tsx` XML and levels from `.tmj` JSON.
//! Only the parts of both formats that sandtide assets use are read.

mod error;
mod level;
mod tileset;
mod tsx;
mod wang;

pub use error::CoreError;
pub use level::{
    Layer, Level, MapObject, ObjectLayer, Point, TileLayer, TilesetRef, GID_FLIP_MASK,
};
pub use tileset::{TileRect, Tileset, TilesetImage};
pub use wang::{WangColor, WangId, WangPosition, WangSet, WangSetType, WangTile};
