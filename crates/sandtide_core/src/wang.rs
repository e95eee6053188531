//! Wang sets: per-tile corner/edge color tables
//!
//! Each tagged tile carries a `WangId` naming which terrain color touches each
//! of its eight border positions. Positions follow Tiled's indexing:
//!   7|0|1
//!   6|X|2
//!   5|4|3
//! - Even indices (0,2,4,6) = Edges (Top, Right, Bottom, Left)
//! - Odd indices (1,3,5,7) = Corners (TopRight, BottomRight, BottomLeft, TopLeft)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Type of wang set - determines which positions carry colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WangSetType {
    /// Colors on the 4 corners only
    #[default]
    Corner,
    /// Colors on the 4 edges only
    Edge,
    /// Colors on corners and edges
    Mixed,
}

impl WangSetType {
    /// Parse Tiled's `type` attribute
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "corner" => Some(Self::Corner),
            "edge" => Some(Self::Edge),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corner => "corner",
            Self::Edge => "edge",
            Self::Mixed => "mixed",
        }
    }

    /// Whether a position index may carry a color in this set type
    pub fn uses_position(&self, index: usize) -> bool {
        match self {
            Self::Corner => WangId::is_corner(index),
            Self::Edge => !WangId::is_corner(index),
            Self::Mixed => index < WangId::LEN,
        }
    }
}

/// Named border position of a tile, in WangId order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WangPosition {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl WangPosition {
    pub const ALL: [WangPosition; 8] = [
        WangPosition::Top,
        WangPosition::TopRight,
        WangPosition::Right,
        WangPosition::BottomRight,
        WangPosition::Bottom,
        WangPosition::BottomLeft,
        WangPosition::Left,
        WangPosition::TopLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position on the neighbor that faces this one
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % 8]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::TopRight => "Top-Right",
            Self::Right => "Right",
            Self::BottomRight => "Bottom-Right",
            Self::Bottom => "Bottom",
            Self::BottomLeft => "Bottom-Left",
            Self::Left => "Left",
            Self::TopLeft => "Top-Left",
        }
    }
}

/// Wang ID representing terrain colors at all 8 positions.
/// 0 = no color, n = the n-th color of the owning set (1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WangId(pub [u8; 8]);

impl WangId {
    pub const LEN: usize = 8;
    pub const EMPTY: Self = WangId([0; 8]);

    /// Create a WangId with every position set to one color
    pub fn filled(color: u8) -> Self {
        WangId([color; 8])
    }

    /// Create a corner-only WangId from (top-right, bottom-right, bottom-left, top-left)
    pub fn corners(tr: u8, br: u8, bl: u8, tl: u8) -> Self {
        WangId([0, tr, 0, br, 0, bl, 0, tl])
    }

    /// Check if index is a corner (odd indices: 1,3,5,7)
    pub fn is_corner(index: usize) -> bool {
        index % 2 == 1
    }

    pub fn get(&self, position: WangPosition) -> u8 {
        self.0[position.index()]
    }

    pub fn set(&mut self, position: WangPosition, color: u8) {
        self.0[position.index()] = color;
    }

    /// Highest color index referenced
    pub fn max_color(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Whether any position carries a color
    pub fn has_any_color(&self) -> bool {
        self.0.iter().any(|&c| c != 0)
    }

    /// Positions that carry a color
    pub fn colored_positions(&self) -> impl Iterator<Item = WangPosition> + '_ {
        WangPosition::ALL
            .into_iter()
            .filter(|p| self.0[p.index()] != 0)
    }

    /// Returns the single color if every used position carries it
    pub fn uniform_color(&self, set_type: WangSetType) -> Option<u8> {
        let mut colors = (0..Self::LEN)
            .filter(|&i| set_type.uses_position(i))
            .map(|i| self.0[i]);
        let first = colors.next()?;
        if first != 0 && colors.all(|c| c == first) {
            Some(first)
        } else {
            None
        }
    }
}

impl FromStr for WangId {
    type Err = CoreError;

    /// Parse Tiled's comma separated form, e.g. `0,2,0,1,0,2,0,2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidWangId {
            value: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != Self::LEN {
            return Err(invalid(format!(
                "expected {} entries, found {}",
                Self::LEN,
                parts.len()
            )));
        }

        let mut colors = [0u8; 8];
        for (slot, part) in colors.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid(format!("'{part}' is not a color index")))?;
        }
        Ok(WangId(colors))
    }
}

impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

/// A terrain color within a set (e.g., "path", "ground")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    pub name: String,
    /// Display color as written by Tiled (`#rrggbb` or `#aarrggbb`)
    pub color: String,
    /// Representative tile for this color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<u32>,
    #[serde(default = "default_probability")]
    pub probability: f32,
}

fn default_probability() -> f32 {
    1.0
}

impl WangColor {
    pub fn new(name: String, color: String) -> Self {
        Self {
            name,
            color,
            tile: None,
            probability: 1.0,
        }
    }
}

/// Color assignment of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WangTile {
    pub tile_id: u32,
    pub wang_id: WangId,
}

/// A named wang set attached to a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSet {
    pub name: String,
    pub set_type: WangSetType,
    /// Representative tile for the whole set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<u32>,
    #[serde(default)]
    pub colors: Vec<WangColor>,
    /// Tagged tiles in declaration order
    #[serde(default)]
    pub tiles: Vec<WangTile>,
}

impl WangSet {
    pub fn new(name: String, set_type: WangSetType) -> Self {
        Self {
            name,
            set_type,
            tile: None,
            colors: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Add a color, returning its 1-based index
    pub fn add_color(&mut self, color: WangColor) -> u8 {
        self.colors.push(color);
        self.colors.len() as u8
    }

    /// Tag a tile, replacing any earlier tag for the same tile
    pub fn set_tile(&mut self, tile_id: u32, wang_id: WangId) {
        match self.tiles.iter_mut().find(|t| t.tile_id == tile_id) {
            Some(existing) => existing.wang_id = wang_id,
            None => self.tiles.push(WangTile { tile_id, wang_id }),
        }
    }

    /// Get a color by its 1-based index. Index 0 ("no color") returns None
    pub fn color(&self, index: u8) -> Option<&WangColor> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.colors.get(i))
    }

    /// Get the 1-based color index by name
    pub fn color_index(&self, name: &str) -> Option<u8> {
        self.colors
            .iter()
            .position(|c| c.name == name)
            .map(|i| (i + 1) as u8)
    }

    /// Get the WangId of a tile
    pub fn wang_id_of(&self, tile_id: u32) -> Option<WangId> {
        self.tiles
            .iter()
            .find(|t| t.tile_id == tile_id)
            .map(|t| t.wang_id)
    }

    /// All tiles carrying exactly this WangId
    pub fn tiles_with_id(&self, wang_id: WangId) -> impl Iterator<Item = u32> + '_ {
        self.tiles
            .iter()
            .filter(move |t| t.wang_id == wang_id)
            .map(|t| t.tile_id)
    }

    /// Tiles whose used positions all carry one color (useful for finding "fill" tiles)
    pub fn uniform_tiles(&self, color: u8) -> Vec<u32> {
        self.tiles
            .iter()
            .filter(|t| t.wang_id.uniform_color(self.set_type) == Some(color))
            .map(|t| t.tile_id)
            .collect()
    }

    /// Positions that carry a color in at least one tile
    pub fn positions_used(&self) -> Vec<WangPosition> {
        WangPosition::ALL
            .into_iter()
            .filter(|p| self.tiles.iter().any(|t| t.wang_id.get(*p) != 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandy_background() -> WangSet {
        let mut set = WangSet::new("sandy background".to_string(), WangSetType::Corner);
        set.add_color(WangColor::new("path".to_string(), "#ff0000".to_string()));
        set.add_color(WangColor::new("ground".to_string(), "#00ff00".to_string()));
        set.set_tile(0, WangId::corners(2, 1, 2, 2));
        set.set_tile(1, WangId::corners(2, 2, 2, 2));
        set.set_tile(2, WangId::corners(1, 1, 1, 1));
        set.set_tile(3, WangId::corners(2, 2, 2, 2));
        set
    }

    #[test]
    fn test_parse_wang_id() {
        let id: WangId = "0,2,0,1,0,2,0,2".parse().unwrap();
        assert_eq!(id, WangId([0, 2, 0, 1, 0, 2, 0, 2]));
        assert_eq!(id.get(WangPosition::BottomRight), 1);
        assert_eq!(id.to_string(), "0,2,0,1,0,2,0,2");
    }

    #[test]
    fn test_parse_wang_id_tolerates_spaces() {
        let id: WangId = " 1, 1,1 ,1,1,1,1,1".parse().unwrap();
        assert_eq!(id, WangId::filled(1));
    }

    #[test]
    fn test_parse_wang_id_wrong_length() {
        let err = "0,1,0,1".parse::<WangId>().unwrap_err();
        assert!(err.to_string().contains("expected 8 entries, found 4"));

        assert!("0,1,0,1,0,1,0,1,0".parse::<WangId>().is_err());
    }

    #[test]
    fn test_parse_wang_id_rejects_garbage() {
        assert!("0,1,0,x,0,1,0,1".parse::<WangId>().is_err());
        assert!("0,1,0,-1,0,1,0,1".parse::<WangId>().is_err());
        assert!("0x10101010".parse::<WangId>().is_err());
    }

    #[test]
    fn test_positions_and_opposites() {
        assert_eq!(WangPosition::Top.opposite(), WangPosition::Bottom);
        assert_eq!(WangPosition::TopLeft.opposite(), WangPosition::BottomRight);
        assert_eq!(WangPosition::from_index(6), Some(WangPosition::Left));
        assert_eq!(WangPosition::from_index(8), None);
        assert!(WangSetType::Corner.uses_position(1));
        assert!(!WangSetType::Corner.uses_position(0));
        assert!(WangSetType::Edge.uses_position(4));
        assert!(WangSetType::Mixed.uses_position(7));
    }

    #[test]
    fn test_color_lookup_is_one_based() {
        let set = sandy_background();
        assert!(set.color(0).is_none());
        assert_eq!(set.color(1).unwrap().name, "path");
        assert_eq!(set.color(2).unwrap().name, "ground");
        assert!(set.color(3).is_none());
        assert_eq!(set.color_index("ground"), Some(2));
        assert_eq!(set.color_index("water"), None);
    }

    #[test]
    fn test_tile_queries() {
        let set = sandy_background();
        assert_eq!(set.wang_id_of(0), Some(WangId::corners(2, 1, 2, 2)));
        assert_eq!(set.wang_id_of(99), None);

        let ground: Vec<u32> = set.tiles_with_id(WangId::corners(2, 2, 2, 2)).collect();
        assert_eq!(ground, vec![1, 3]);
        assert_eq!(set.uniform_tiles(2), vec![1, 3]);
        assert_eq!(set.uniform_tiles(1), vec![2]);
    }

    #[test]
    fn test_set_tile_replaces() {
        let mut set = sandy_background();
        set.set_tile(0, WangId::filled(1));
        assert_eq!(set.tiles.len(), 4);
        assert_eq!(set.wang_id_of(0), Some(WangId::filled(1)));
    }

    #[test]
    fn test_positions_used_for_corner_set() {
        let set = sandy_background();
        assert_eq!(
            set.positions_used(),
            vec![
                WangPosition::TopRight,
                WangPosition::BottomRight,
                WangPosition::BottomLeft,
                WangPosition::TopLeft
            ]
        );
    }

    #[test]
    fn test_uniform_color_ignores_unused_positions() {
        let id = WangId::corners(1, 1, 1, 1);
        assert_eq!(id.uniform_color(WangSetType::Corner), Some(1));
        assert_eq!(id.uniform_color(WangSetType::Mixed), None);
        assert_eq!(WangId::EMPTY.uniform_color(WangSetType::Corner), None);
    }
}
