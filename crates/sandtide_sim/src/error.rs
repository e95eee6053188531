use thiserror::Error;

use crate::TurretKind;

/// Errors from loading configuration or levels
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Schema(#[from] sandtide_schema::SchemaError),
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
}

/// Why a player command was refused. The game state is unchanged when one is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command is not available in the {0} state")]
    WrongState(&'static str),
    #[error("no map {0}")]
    UnknownMap(usize),
    #[error("not enough money: {needed} needed, {available} available")]
    NotEnoughMoney { needed: u32, available: u32 },
    #[error("no turret placement is armed")]
    NotPlacing,
    #[error("no stats are configured for {0} turrets")]
    UnavailableTurret(TurretKind),
    #[error("tile ({col}, {row}) is not a valid placement area")]
    InvalidTile { col: u32, row: u32 },
    #[error("tile ({col}, {row}) is already occupied")]
    TileOccupied { col: u32, row: u32 },
    #[error("no turret selected")]
    NoTurretSelected,
    #[error("{kind} turret is already at its maximum level {level}")]
    MaxLevel { kind: TurretKind, level: u32 },
    #[error("turret can't be upgraded while its tidal upgrade is active")]
    TidalActive,
    #[error("tidal upgrade was already used this wave")]
    TidalUnavailable,
    #[error("wave has not started")]
    WaveNotStarted,
    #[error("wave is already running")]
    WaveInProgress,
    #[error("wave can only be skipped once every enemy has spawned")]
    SkipUnavailable,
}
