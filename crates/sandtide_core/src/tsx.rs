//! Reads the subset of Tiled's `.tsx` format that sandtide tilesets use:
//! grid attributes, a single `<image>` and `<wangsets>`.

use roxmltree::{Document, Node};
use std::path::Path;
use std::str::FromStr;

use crate::{CoreError, Tileset, TilesetImage, WangColor, WangId, WangSet, WangSetType};

impl Tileset {
    /// Load a tileset from a `.tsx` file
    pub fn load_tsx(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let tileset = Self::from_tsx_str(&content)?;
        tracing::debug!(
            "Loaded tileset '{}' from {:?}: {} tiles, {} wang sets",
            tileset.name,
            path,
            tileset.tile_count,
            tileset.wang_sets.len()
        );
        Ok(tileset)
    }

    /// Parse a tileset from `.tsx` XML text
    pub fn from_tsx_str(xml: &str) -> Result<Self, CoreError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if !root.has_tag_name("tileset") {
            return Err(CoreError::MissingElement("tileset"));
        }
        parse_tileset(root)
    }
}

fn parse_tileset(node: Node<'_, '_>) -> Result<Tileset, CoreError> {
    const ELEMENT: &str = "tileset";

    let mut tileset = Tileset {
        name: node.attribute("name").unwrap_or_default().to_string(),
        tile_width: required(node, ELEMENT, "tilewidth")?,
        tile_height: required(node, ELEMENT, "tileheight")?,
        spacing: optional(node, ELEMENT, "spacing")?.unwrap_or(0),
        margin: optional(node, ELEMENT, "margin")?.unwrap_or(0),
        tile_count: required(node, ELEMENT, "tilecount")?,
        columns: required(node, ELEMENT, "columns")?,
        image: None,
        wang_sets: Vec::new(),
    };

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "image" => tileset.image = Some(parse_image(child)?),
            "wangsets" => {
                for set_node in child.children().filter(|n| n.has_tag_name("wangset")) {
                    tileset.wang_sets.push(parse_wang_set(set_node)?);
                }
            }
            _ => {}
        }
    }

    Ok(tileset)
}

fn parse_image(node: Node<'_, '_>) -> Result<TilesetImage, CoreError> {
    const ELEMENT: &str = "image";
    Ok(TilesetImage {
        source: node
            .attribute("source")
            .ok_or(CoreError::MissingAttribute {
                element: ELEMENT,
                attribute: "source",
            })?
            .to_string(),
        width: required(node, ELEMENT, "width")?,
        height: required(node, ELEMENT, "height")?,
    })
}

fn parse_wang_set(node: Node<'_, '_>) -> Result<WangSet, CoreError> {
    const ELEMENT: &str = "wangset";

    let type_value = node.attribute("type").unwrap_or("corner");
    let set_type = WangSetType::parse(type_value).ok_or_else(|| CoreError::InvalidAttribute {
        element: ELEMENT,
        attribute: "type",
        value: type_value.to_string(),
    })?;

    let mut set = WangSet::new(
        node.attribute("name").unwrap_or_default().to_string(),
        set_type,
    );
    set.tile = tile_reference(node, ELEMENT)?;

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "wangcolor" => {
                set.colors.push(WangColor {
                    name: child.attribute("name").unwrap_or_default().to_string(),
                    color: child.attribute("color").unwrap_or_default().to_string(),
                    tile: tile_reference(child, "wangcolor")?,
                    probability: optional(child, "wangcolor", "probability")?.unwrap_or(1.0),
                });
            }
            "wangtile" => {
                let tile_id = required(child, "wangtile", "tileid")?;
                let wang_id: WangId = child
                    .attribute("wangid")
                    .ok_or(CoreError::MissingAttribute {
                        element: "wangtile",
                        attribute: "wangid",
                    })?
                    .parse()?;
                // Duplicates are kept so the validator can report them
                set.tiles.push(crate::WangTile { tile_id, wang_id });
            }
            _ => {}
        }
    }

    Ok(set)
}

/// Tiled writes `-1` for "no tile"
fn tile_reference(node: Node<'_, '_>, element: &'static str) -> Result<Option<u32>, CoreError> {
    let value: Option<i64> = optional(node, element, "tile")?;
    match value {
        None | Some(-1) => Ok(None),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| CoreError::InvalidAttribute {
                element,
                attribute: "tile",
                value: v.to_string(),
            }),
    }
}

fn optional<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<T>, CoreError> {
    match node.attribute(attribute) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::InvalidAttribute {
                element,
                attribute,
                value: value.to_string(),
            }),
    }
}

fn required<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<T, CoreError> {
    optional(node, element, attribute)?.ok_or(CoreError::MissingAttribute { element, attribute })
}
