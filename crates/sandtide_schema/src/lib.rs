//! Schema validation for sandtide assets
//!
//! This crate checks tilesets and levels against the rules a consumer relies
//! on: tile references in range, eight-entry wang ids, color indices that
//! point at declared colors, an image large enough for the tile grid, and
//! levels whose layers and waypoints line up with their tilesets.
//!
//! # Example
//!
//! ```rust,ignore
//! use sandtide_schema::{load_tileset, validate_tileset};
//!
//! // Load a tileset, failing on any error-level issue
//! let tileset = load_tileset("assets/tileset1.tsx".as_ref())?;
//!
//! // Or inspect every issue, warnings included
//! let report = validate_tileset(&tileset);
//! for issue in report.issues() {
//!     println!("{issue}");
//! }
//! ```

mod report;
mod validate;

pub use report::{Issue, Severity, ValidationReport};
pub use validate::{validate_level, validate_tileset, LevelRules};

use sandtide_core::{CoreError, Level, Tileset};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or validating assets
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// A level together with the external tilesets it references, in reference order
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub level: Level,
    pub tilesets: Vec<Tileset>,
}

/// Load a tileset and reject it if validation finds errors.
/// Warnings are logged
pub fn load_tileset(path: &Path) -> Result<Tileset, SchemaError> {
    let tileset = Tileset::load_tsx(path).map_err(|source| SchemaError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    validate_tileset(&tileset).into_result(&path.display().to_string())?;

    Ok(tileset)
}

/// Read a level and every external tileset it references (paths relative to
/// the level file) without validating either
pub fn read_level(path: &Path) -> Result<LoadedLevel, SchemaError> {
    let level = Level::load(path).map_err(|source| SchemaError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tilesets = Vec::with_capacity(level.tilesets.len());
    for tileset_path in tileset_paths(path, &level)? {
        let tileset = Tileset::load_tsx(&tileset_path).map_err(|source| SchemaError::Load {
            path: tileset_path,
            source,
        })?;
        tilesets.push(tileset);
    }

    Ok(LoadedLevel { level, tilesets })
}

/// Validate a level file against its own tilesets, returning every issue
pub fn check_level(path: &Path, rules: &LevelRules) -> Result<ValidationReport, SchemaError> {
    let loaded = read_level(path)?;
    Ok(validate_level(&loaded.level, rules, &loaded.tilesets))
}

/// Load a level and its tilesets, rejecting errors in any of them
pub fn load_level(path: &Path, rules: &LevelRules) -> Result<LoadedLevel, SchemaError> {
    let loaded = read_level(path)?;

    let paths = tileset_paths(path, &loaded.level)?;
    for (tileset, tileset_path) in loaded.tilesets.iter().zip(&paths) {
        validate_tileset(tileset).into_result(&tileset_path.display().to_string())?;
    }
    validate_level(&loaded.level, rules, &loaded.tilesets)
        .into_result(&path.display().to_string())?;

    Ok(loaded)
}

fn tileset_paths(level_path: &Path, level: &Level) -> Result<Vec<PathBuf>, SchemaError> {
    let base_dir = level_path.parent().unwrap_or_else(|| Path::new("."));
    level
        .tilesets
        .iter()
        .map(|reference| match &reference.source {
            Some(source) => Ok(base_dir.join(source)),
            None => Err(SchemaError::ValidationError(format!(
                "Tileset at firstgid {} is embedded; only external .tsx tilesets are supported",
                reference.firstgid
            ))),
        })
        .collect()
}
