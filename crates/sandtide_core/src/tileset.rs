//! Tileset slicing: maps a tile index to a pixel rectangle within the sheet

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::wang::WangSet;

/// The image sheet a tileset is cut from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path to the image, as written in the tileset (relative to the tileset file)
    pub source: String,
    /// Declared pixel width of the image
    pub width: u32,
    /// Declared pixel height of the image
    pub height: u32,
}

/// Pixel rectangle of one tile within the image sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Tileset configuration: a grid of equally sized tiles with spacing and margin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Pixels between adjacent tiles
    #[serde(default)]
    pub spacing: u32,
    /// Pixels between the image border and the first row/column
    #[serde(default)]
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    /// Terrain color tables attached to this tileset
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wang_sets: Vec<WangSet>,
}

impl Tileset {
    /// Create a tileset without an image or wang sets
    pub fn new(
        name: String,
        tile_width: u32,
        tile_height: u32,
        tile_count: u32,
        columns: u32,
    ) -> Self {
        Self {
            name,
            tile_width,
            tile_height,
            tile_count,
            columns,
            ..Default::default()
        }
    }

    /// Set spacing and margin
    pub fn with_spacing(mut self, spacing: u32, margin: u32) -> Self {
        self.spacing = spacing;
        self.margin = margin;
        self
    }

    /// Attach an image sheet
    pub fn with_image(mut self, source: String, width: u32, height: u32) -> Self {
        self.image = Some(TilesetImage {
            source,
            width,
            height,
        });
        self
    }

    /// Number of rows needed to hold `tile_count` tiles
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        self.tile_count.div_ceil(self.columns)
    }

    /// Check if a tile index exists in this tileset
    pub fn contains(&self, tile_id: u32) -> bool {
        tile_id < self.tile_count
    }

    /// Convert a tile index to (column, row) within the grid
    pub fn tile_grid_position(&self, tile_id: u32) -> Option<(u32, u32)> {
        if !self.contains(tile_id) || self.columns == 0 {
            return None;
        }
        Some((tile_id % self.columns, tile_id / self.columns))
    }

    /// Pixel rectangle of a tile within the image sheet.
    /// Returns None if the index is out of bounds or the rect lies past `u32` pixels
    pub fn tile_rect(&self, tile_id: u32) -> Option<TileRect> {
        let (col, row) = self.tile_grid_position(tile_id)?;
        let offset = |index: u32, tile: u32| {
            tile.checked_add(self.spacing)
                .and_then(|stride| index.checked_mul(stride))
                .and_then(|span| span.checked_add(self.margin))
        };
        Some(TileRect {
            x: offset(col, self.tile_width)?,
            y: offset(row, self.tile_height)?,
            width: self.tile_width,
            height: self.tile_height,
        })
    }

    /// Smallest image size that holds the whole grid, margins on both sides.
    /// Saturates at `u64::MAX` for grids no image could hold
    pub fn required_image_size(&self) -> (u64, u64) {
        let margins = 2 * u64::from(self.margin);
        let span = |count: u32, tile: u32| {
            if count == 0 {
                return margins;
            }
            let count = u64::from(count);
            count
                .saturating_mul(u64::from(tile))
                .saturating_add((count - 1).saturating_mul(u64::from(self.spacing)))
                .saturating_add(margins)
        };
        (
            span(self.columns, self.tile_width),
            span(self.rows(), self.tile_height),
        )
    }

    /// Resolve the image path against the directory the tileset was loaded from
    pub fn image_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.image.as_ref().map(|image| base_dir.join(&image.source))
    }

    /// Get a wang set by name
    pub fn wang_set(&self, name: &str) -> Option<&WangSet> {
        self.wang_sets.iter().find(|set| set.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandy() -> Tileset {
        Tileset::new("tileset1".to_string(), 48, 48, 299, 23)
            .with_spacing(16, 8)
            .with_image("tileset1.png".to_string(), 1472, 832)
    }

    #[test]
    fn test_rows_round_up() {
        assert_eq!(sandy().rows(), 13);
        assert_eq!(Tileset::new("t".into(), 8, 8, 10, 5).rows(), 2);
        assert_eq!(Tileset::new("t".into(), 8, 8, 11, 5).rows(), 3);
        assert_eq!(Tileset::new("t".into(), 8, 8, 11, 0).rows(), 0);
    }

    #[test]
    fn test_tile_rect_first_and_wrapped() {
        let tileset = sandy();

        assert_eq!(
            tileset.tile_rect(0),
            Some(TileRect {
                x: 8,
                y: 8,
                width: 48,
                height: 48
            })
        );
        // Last tile of the first row
        assert_eq!(tileset.tile_rect(22).map(|r| (r.x, r.y)), Some((1416, 8)));
        // First tile of the second row
        assert_eq!(tileset.tile_rect(23).map(|r| (r.x, r.y)), Some((8, 72)));
    }

    #[test]
    fn test_tile_rect_out_of_bounds() {
        let tileset = sandy();
        assert!(tileset.tile_rect(298).is_some());
        assert_eq!(tileset.tile_rect(299), None);
    }

    #[test]
    fn test_last_tile_fits_in_image() {
        let tileset = sandy();
        let rect = tileset.tile_rect(298).unwrap();
        assert_eq!((rect.x, rect.y), (8 + 22 * 64, 8 + 12 * 64));
        assert!(rect.right() <= 1472);
        assert!(rect.bottom() <= 832);
    }

    #[test]
    fn test_required_image_size_matches_sheet() {
        assert_eq!(sandy().required_image_size(), (1472, 832));
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let tileset = Tileset::new("huge".to_string(), u32::MAX, u32::MAX, 4, 2)
            .with_spacing(u32::MAX, u32::MAX);
        let (width, height) = tileset.required_image_size();
        assert!(width > u64::from(u32::MAX));
        assert!(height > u64::from(u32::MAX));
        assert!(tileset.tile_rect(0).is_none());
        assert!(tileset.tile_rect(3).is_none());
    }

    #[test]
    fn test_image_path_is_relative_to_tileset() {
        let tileset = sandy();
        let path = tileset.image_path(Path::new("assets")).unwrap();
        assert_eq!(path, Path::new("assets").join("tileset1.png"));
        assert!(Tileset::default().image_path(Path::new(".")).is_none());
    }
}
