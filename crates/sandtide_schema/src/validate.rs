//! Validation logic for tilesets and levels

use sandtide_core::{Layer, Level, Tileset, WangSet, GID_FLIP_MASK};
use std::collections::{BTreeSet, HashSet};

use crate::ValidationReport;

/// Which layers a level must provide
#[derive(Debug, Clone)]
pub struct LevelRules {
    /// Tile layer holding the playfield
    pub tile_layer: String,
    /// Object layer holding the enemy path polyline
    pub waypoint_layer: String,
    /// Expected (columns, rows), if the consumer assumes a fixed grid
    pub expected_size: Option<(u32, u32)>,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            tile_layer: "Background".to_string(),
            waypoint_layer: "waypoints".to_string(),
            expected_size: None,
        }
    }
}

/// Validate a tileset: grid geometry, image size and every wang set
pub fn validate_tileset(tileset: &Tileset) -> ValidationReport {
    let mut report = ValidationReport::new();

    if tileset.tile_width == 0 || tileset.tile_height == 0 {
        report.error(
            "tileset",
            format!(
                "tile size must be non-zero, got {}x{}",
                tileset.tile_width, tileset.tile_height
            ),
        );
    }
    if tileset.columns == 0 && tileset.tile_count > 0 {
        report.error("tileset", "columns must be non-zero when tiles exist");
    }

    match &tileset.image {
        Some(image) => {
            let (needed_w, needed_h) = tileset.required_image_size();
            if needed_w > u64::from(image.width) || needed_h > u64::from(image.height) {
                report.error(
                    format!("image '{}'", image.source),
                    format!(
                        "{} columns x {} rows of {}x{} tiles need {}x{} pixels but the image is {}x{}",
                        tileset.columns,
                        tileset.rows(),
                        tileset.tile_width,
                        tileset.tile_height,
                        needed_w,
                        needed_h,
                        image.width,
                        image.height
                    ),
                );
            } else if let Some(fitting) = columns_fitting(tileset, image.width) {
                // Tiled derives the column count from the image width
                if fitting != tileset.columns {
                    report.warning(
                        format!("image '{}'", image.source),
                        format!(
                            "image width fits {} columns but the tileset declares {}",
                            fitting, tileset.columns
                        ),
                    );
                }
            }
        }
        None => report.warning("tileset", "no image declared"),
    }

    let mut names = HashSet::new();
    for set in &tileset.wang_sets {
        if !names.insert(set.name.as_str()) {
            report.warning(
                format!("wangset '{}'", set.name),
                "name is used by more than one wang set",
            );
        }
        validate_wang_set(tileset, set, &mut report);
    }

    report
}

fn columns_fitting(tileset: &Tileset, image_width: u32) -> Option<u32> {
    let spacing = u64::from(tileset.spacing);
    let stride = u64::from(tileset.tile_width) + spacing;
    if stride == 0 {
        return None;
    }
    let usable = (u64::from(image_width) + spacing).checked_sub(2 * u64::from(tileset.margin))?;
    u32::try_from(usable / stride).ok()
}

fn validate_wang_set(tileset: &Tileset, set: &WangSet, report: &mut ValidationReport) {
    let subject = format!("wangset '{}'", set.name);

    if set.name.is_empty() {
        report.warning(&subject, "wang set has no name");
    }
    if let Some(tile) = set.tile {
        if !tileset.contains(tile) {
            report.error(
                &subject,
                format!(
                    "representative tile {} is outside [0, {})",
                    tile, tileset.tile_count
                ),
            );
        }
    }
    if set.colors.is_empty() {
        report.error(&subject, "declares no colors");
    }
    if set.colors.len() > u8::MAX as usize {
        report.error(&subject, "declares more than 255 colors");
    }

    for (index, color) in set.colors.iter().enumerate() {
        let color_subject = format!("{subject} color {} '{}'", index + 1, color.name);
        if let Some(tile) = color.tile {
            if !tileset.contains(tile) {
                report.error(
                    &color_subject,
                    format!(
                        "representative tile {} is outside [0, {})",
                        tile, tileset.tile_count
                    ),
                );
            }
        }
        if !is_hex_color(&color.color) {
            report.warning(
                &color_subject,
                format!("'{}' is not a #rrggbb or #aarrggbb color", color.color),
            );
        }
        if color.probability < 0.0 || color.probability.is_nan() {
            report.error(
                &color_subject,
                format!("probability {} must be >= 0", color.probability),
            );
        }
    }

    let mut seen = HashSet::new();
    for wang_tile in &set.tiles {
        let tile_subject = format!("{subject} tile {}", wang_tile.tile_id);

        if !tileset.contains(wang_tile.tile_id) {
            report.error(
                &tile_subject,
                format!("tile id is outside [0, {})", tileset.tile_count),
            );
        }
        if !seen.insert(wang_tile.tile_id) {
            report.error(&tile_subject, "tile is tagged more than once");
        }

        let wang_id = wang_tile.wang_id;
        if !wang_id.has_any_color() {
            report.warning(&tile_subject, "tagged without any color");
        }
        for position in wang_id.colored_positions() {
            let color = wang_id.get(position);
            if color as usize > set.colors.len() {
                report.error(
                    &tile_subject,
                    format!(
                        "{} references color {} but only {} are declared",
                        position.name(),
                        color,
                        set.colors.len()
                    ),
                );
            }
            if !set.set_type.uses_position(position.index()) {
                report.warning(
                    &tile_subject,
                    format!(
                        "{} carries color {} but a {} set ignores that position",
                        position.name(),
                        color,
                        set.set_type.as_str()
                    ),
                );
            }
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 6 || digits.len() == 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate a level against the layers a consumer needs and, when given, the
/// loaded tilesets (in the same order as `level.tilesets`)
pub fn validate_level(level: &Level, rules: &LevelRules, tilesets: &[Tileset]) -> ValidationReport {
    let mut report = ValidationReport::new();

    if level.width == 0 || level.height == 0 {
        report.error("level", "map size must be non-zero");
    }
    if level.tile_width == 0 || level.tile_height == 0 {
        report.error("level", "tile size must be non-zero");
    }
    if let Some((cols, rows)) = rules.expected_size {
        if (level.width, level.height) != (cols, rows) {
            report.warning(
                "level",
                format!(
                    "map is {}x{} tiles, expected {}x{}",
                    level.width, level.height, cols, rows
                ),
            );
        }
    }

    let mut firstgids = HashSet::new();
    for reference in &level.tilesets {
        if reference.firstgid == 0 {
            report.error("level tilesets", "firstgid must be at least 1");
        }
        if !firstgids.insert(reference.firstgid) {
            report.error(
                "level tilesets",
                format!("firstgid {} is used twice", reference.firstgid),
            );
        }
    }
    if !tilesets.is_empty() && tilesets.len() != level.tilesets.len() {
        report.error(
            "level tilesets",
            format!(
                "{} tilesets referenced but {} loaded",
                level.tilesets.len(),
                tilesets.len()
            ),
        );
    }

    if level.tile_layer(&rules.tile_layer).is_none() {
        report.error(
            format!("layer '{}'", rules.tile_layer),
            "required tile layer is missing",
        );
    }

    let expected_cells = level.cell_count();
    for layer in &level.layers {
        let Layer::Tiles(tiles) = layer else {
            continue;
        };
        let subject = format!("layer '{}'", tiles.name);

        if tiles.data.len() as u64 != expected_cells {
            report.error(
                &subject,
                format!(
                    "has {} cells but the map is {}x{} ({} cells)",
                    tiles.data.len(),
                    level.width,
                    level.height,
                    expected_cells
                ),
            );
        }

        let mut unresolved = BTreeSet::new();
        let mut out_of_range = BTreeSet::new();
        for &raw in &tiles.data {
            let gid = raw & !GID_FLIP_MASK;
            if gid == 0 {
                continue;
            }
            match level.resolve_gid(gid) {
                None => {
                    unresolved.insert(gid);
                }
                Some((index, local)) => {
                    if let Some(tileset) = tilesets.get(index) {
                        if !tileset.contains(local) {
                            out_of_range.insert(gid);
                        }
                    }
                }
            }
        }
        if !unresolved.is_empty() {
            report.error(
                &subject,
                format!(
                    "GIDs not covered by any tileset: {:?}",
                    unresolved.into_iter().collect::<Vec<_>>()
                ),
            );
        }
        if !out_of_range.is_empty() {
            report.error(
                &subject,
                format!(
                    "GIDs past the end of their tileset: {:?}",
                    out_of_range.into_iter().collect::<Vec<_>>()
                ),
            );
        }
    }

    let waypoint_subject = format!("layer '{}'", rules.waypoint_layer);
    if level.object_layer(&rules.waypoint_layer).is_none() {
        report.error(&waypoint_subject, "required object layer is missing");
    } else {
        let points = level.waypoints(&rules.waypoint_layer);
        if points.len() < 2 {
            report.error(
                &waypoint_subject,
                format!("path needs at least 2 points, found {}", points.len()),
            );
        }
        let (w, h) = level.pixel_size();
        for (i, p) in points.iter().enumerate() {
            if p.x < 0.0 || p.y < 0.0 || p.x > w as f32 || p.y > h as f32 {
                report.warning(
                    &waypoint_subject,
                    format!(
                        "waypoint {} at ({}, {}) lies outside the {}x{} map",
                        i, p.x, p.y, w, h
                    ),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandtide_core::{WangColor, WangId, WangSetType};

    fn sandy() -> Tileset {
        let mut tileset = Tileset::new("tileset1".to_string(), 48, 48, 299, 23)
            .with_spacing(16, 8)
            .with_image("tileset1.png".to_string(), 1472, 832);

        let mut set = WangSet::new("sandy background".to_string(), WangSetType::Corner);
        set.add_color(WangColor::new("path".to_string(), "#ff0000".to_string()));
        set.add_color(WangColor::new("ground".to_string(), "#00ff00".to_string()));
        set.set_tile(0, WangId::corners(2, 1, 2, 2));
        set.set_tile(298, WangId::corners(1, 1, 1, 1));
        tileset.wang_sets.push(set);
        tileset
    }

    fn level(data: Vec<u32>) -> Level {
        Level::from_json_str(&format!(
            r#"{{
            "width": 2, "height": 2, "tilewidth": 48, "tileheight": 48,
            "tilesets": [ {{ "firstgid": 1, "source": "tileset1.tsx" }} ],
            "layers": [
                {{ "type": "tilelayer", "name": "Background", "width": 2, "height": 2, "data": {data:?} }},
                {{ "type": "objectgroup", "name": "waypoints", "objects": [
                    {{ "id": 1, "x": 0, "y": 24, "polyline": [ {{"x": 0, "y": 0}}, {{"x": 96, "y": 0}} ] }}
                ] }}
            ]
        }}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_shipped_geometry_is_clean() {
        let report = validate_tileset(&sandy());
        assert!(report.is_clean(), "{:?}", report.issues());
    }

    #[test]
    fn test_image_too_small() {
        let mut tileset = sandy();
        tileset.image.as_mut().unwrap().height = 800;
        let report = validate_tileset(&tileset);
        assert!(report.has_errors());
        assert!(report.errors().any(|i| i.message.contains("1472x832")));
    }

    #[test]
    fn test_image_with_extra_column_warns() {
        let mut tileset = sandy();
        tileset.image.as_mut().unwrap().width = 1472 + 64;
        let report = validate_tileset(&tileset);
        assert!(!report.has_errors());
        assert!(report.warnings().any(|i| i.message.contains("fits 24 columns")));
    }

    #[test]
    fn test_zero_tile_size() {
        let tileset = Tileset::new("bad".to_string(), 0, 48, 4, 2);
        assert!(validate_tileset(&tileset).has_errors());
    }

    #[test]
    fn test_wang_tile_out_of_range() {
        let mut tileset = sandy();
        tileset.wang_sets[0].set_tile(299, WangId::corners(1, 1, 1, 1));
        let report = validate_tileset(&tileset);
        assert!(report
            .errors()
            .any(|i| i.subject == "wangset 'sandy background' tile 299"));
    }

    #[test]
    fn test_undeclared_color() {
        let mut tileset = sandy();
        tileset.wang_sets[0].set_tile(5, WangId::corners(3, 1, 1, 1));
        let report = validate_tileset(&tileset);
        assert!(report
            .errors()
            .any(|i| i.message.contains("references color 3 but only 2 are declared")));
    }

    #[test]
    fn test_duplicate_tag() {
        let mut tileset = sandy();
        let set = &mut tileset.wang_sets[0];
        let first = set.tiles[0];
        set.tiles.push(first);
        let report = validate_tileset(&tileset);
        assert!(report.errors().any(|i| i.message.contains("more than once")));
    }

    #[test]
    fn test_edge_color_in_corner_set_warns() {
        let mut tileset = sandy();
        tileset.wang_sets[0].set_tile(7, WangId([1, 1, 0, 1, 0, 1, 0, 1]));
        let report = validate_tileset(&tileset);
        assert!(!report.has_errors());
        assert!(report.warnings().any(|i| i.message.contains("Top carries color 1")));
    }

    #[test]
    fn test_bad_color_and_representative_tile() {
        let mut tileset = sandy();
        let set = &mut tileset.wang_sets[0];
        set.tile = Some(400);
        set.colors[0].color = "red".to_string();
        set.colors[1].tile = Some(1000);
        let report = validate_tileset(&tileset);
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#a0b1c2"));
        assert!(is_hex_color("#ffa0b1c2"));
        assert!(!is_hex_color("a0b1c2"));
        assert!(!is_hex_color("#a0b1"));
        assert!(!is_hex_color("#zzzzzz"));
    }

    #[test]
    fn test_valid_level() {
        let report = validate_level(&level(vec![1, 161, 161, 299]), &LevelRules::default(), &[sandy()]);
        assert!(report.is_clean(), "{:?}", report.issues());
    }

    #[test]
    fn test_level_cell_count_mismatch() {
        let report = validate_level(&level(vec![1, 1, 1]), &LevelRules::default(), &[]);
        assert!(report.errors().any(|i| i.message.contains("has 3 cells")));
    }

    #[test]
    fn test_level_gid_past_tileset_end() {
        let report = validate_level(&level(vec![1, 1, 1, 300]), &LevelRules::default(), &[sandy()]);
        assert!(report.errors().any(|i| i.message.contains("[300]")));

        // Without the loaded tileset the GID still resolves to a reference
        let report = validate_level(&level(vec![1, 1, 1, 300]), &LevelRules::default(), &[]);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_level_missing_layers() {
        let rules = LevelRules {
            tile_layer: "Ground".to_string(),
            waypoint_layer: "path".to_string(),
            expected_size: Some((20, 20)),
        };
        let report = validate_level(&level(vec![1, 1, 1, 1]), &rules, &[]);
        assert_eq!(report.errors().count(), 2);
        assert!(report.warnings().any(|i| i.message.contains("expected 20x20")));
    }

    #[test]
    fn test_huge_tile_size_is_reported() {
        let tileset = Tileset::new("huge".to_string(), u32::MAX, 48, 4, 2)
            .with_spacing(16, 8)
            .with_image("huge.png".to_string(), 1472, 832);
        let report = validate_tileset(&tileset);
        assert!(report.errors().any(|i| i.message.contains("pixels but the image is 1472x832")));
    }

    #[test]
    fn test_huge_level_is_reported() {
        let mut lvl = level(vec![1, 1, 1, 1]);
        lvl.width = 70_000;
        lvl.height = 70_000;
        let report = validate_level(&lvl, &LevelRules::default(), &[sandy()]);
        assert!(report
            .errors()
            .any(|i| i.message.contains("(4900000000 cells)")));
    }

    #[test]
    fn test_waypoint_outside_map_warns() {
        let mut lvl = level(vec![1, 1, 1, 1]);
        if let Layer::Objects(objects) = &mut lvl.layers[1] {
            objects.objects[0].x = 100.0;
        }
        let report = validate_level(&lvl, &LevelRules::default(), &[sandy()]);
        assert!(!report.has_errors());
        assert_eq!(
            report
                .warnings()
                .filter(|i| i.message.contains("lies outside the 96x96 map"))
                .count(),
            2
        );
    }

    #[test]
    fn test_firstgid_zero() {
        let mut lvl = level(vec![0, 0, 0, 0]);
        lvl.tilesets[0].firstgid = 0;
        let report = validate_level(&lvl, &LevelRules::default(), &[]);
        assert!(report
            .errors()
            .any(|i| i.message == "firstgid must be at least 1"));
    }

    #[test]
    fn test_duplicate_firstgid() {
        let mut lvl = level(vec![1, 1, 1, 1]);
        lvl.tilesets.push(lvl.tilesets[0].clone());
        let report = validate_level(&lvl, &LevelRules::default(), &[]);
        assert!(report
            .errors()
            .any(|i| i.message == "firstgid 1 is used twice"));
    }

    #[test]
    fn test_loaded_tileset_count_mismatch() {
        let report = validate_level(&level(vec![1, 1, 1, 1]), &LevelRules::default(), &[sandy(), sandy()]);
        assert!(report
            .errors()
            .any(|i| i.message == "1 tilesets referenced but 2 loaded"));
    }

    #[test]
    fn test_level_without_tilesets() {
        let mut lvl = level(vec![1, 0, 0, 0]);
        lvl.tilesets.clear();
        let report = validate_level(&lvl, &LevelRules::default(), &[]);
        assert!(report.errors().any(|i| i.message.contains("not covered")));
    }
}
