//! sandtide command-line tools
//!
//! Run with: sandtide <command> [args]
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{anyhow, bail, Context, Result};
use sandtide_core::Tileset;
use sandtide_schema::{check_level, validate_tileset, LevelRules, ValidationReport};
use sandtide_sim::{load_map, Difficulty, Game, GameConfig, GameState, TurretKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  sandtide validate <tileset.tsx> [level.tmj ...]
  sandtide rect <tileset.tsx> <tile-id>
  sandtide wang <tileset.tsx>
  sandtide simulate <level.tmj> [--config FILE] [--difficulty easy|normal|hard]
                    [--seed N] [--turret KIND@COL,ROW ...] [--max-frames N]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "validate" => validate(rest),
        "rect" => rect(rest),
        "wang" => wang(rest),
        "simulate" => simulate(rest),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("unknown command '{other}'\n\n{USAGE}"),
    }
}

fn load_tileset(path: &Path) -> Result<Tileset> {
    Tileset::load_tsx(path).with_context(|| format!("failed to load tileset {}", path.display()))
}

/// Print a report, returning the number of errors in it
fn print_report(asset: &Path, report: &ValidationReport) -> usize {
    if report.is_clean() {
        println!("{}: ok", asset.display());
    }
    for issue in report.issues() {
        println!("{}: {issue}", asset.display());
    }
    report.errors().count()
}

fn validate(args: &[String]) -> Result<()> {
    let (tileset_path, levels) = args
        .split_first()
        .ok_or_else(|| anyhow!("validate needs a tileset\n\n{USAGE}"))?;
    let tileset_path = PathBuf::from(tileset_path);

    let tileset = load_tileset(&tileset_path)?;
    let mut errors = print_report(&tileset_path, &validate_tileset(&tileset));

    for level_path in levels.iter().map(PathBuf::from) {
        let report = check_level(&level_path, &LevelRules::default())
            .with_context(|| format!("failed to load level {}", level_path.display()))?;
        errors += print_report(&level_path, &report);
    }

    if errors > 0 {
        bail!("validation failed with {errors} error(s)");
    }
    Ok(())
}

fn rect(args: &[String]) -> Result<()> {
    let [path, id] = args else {
        bail!("rect needs a tileset and a tile id\n\n{USAGE}");
    };
    let tileset = load_tileset(Path::new(path))?;
    let tile_id: u32 = id
        .parse()
        .with_context(|| format!("'{id}' is not a tile id"))?;

    let (col, row) = tileset.tile_grid_position(tile_id).ok_or_else(|| {
        anyhow!(
            "tile {tile_id} is outside the tileset (0..{})",
            tileset.tile_count
        )
    })?;
    let rect = tileset
        .tile_rect(tile_id)
        .ok_or_else(|| anyhow!("tile {tile_id} has no rectangle"))?;
    println!(
        "tile {tile_id} (column {col}, row {row}): x={} y={} w={} h={}",
        rect.x, rect.y, rect.width, rect.height
    );
    Ok(())
}

fn wang(args: &[String]) -> Result<()> {
    let [path] = args else {
        bail!("wang needs a tileset\n\n{USAGE}");
    };
    let tileset = load_tileset(Path::new(path))?;

    if tileset.wang_sets.is_empty() {
        println!("{}: no wang sets", tileset.name);
    }
    for set in &tileset.wang_sets {
        println!(
            "{} ({}): {} colors, {} tagged tiles",
            set.name,
            set.set_type.as_str(),
            set.colors.len(),
            set.tiles.len()
        );
        for (index, color) in set.colors.iter().enumerate() {
            let color_id = (index + 1) as u8;
            println!(
                "  {color_id}: {} {} p={} fill tiles {:?}",
                color.name,
                color.color,
                color.probability,
                set.uniform_tiles(color_id)
            );
        }
        let positions: Vec<&str> = set.positions_used().iter().map(|p| p.name()).collect();
        println!("  positions used: {}", positions.join(", "));
    }
    Ok(())
}

struct SimulateArgs {
    level: PathBuf,
    config: Option<PathBuf>,
    difficulty: Difficulty,
    seed: u64,
    turrets: Vec<(TurretKind, u32, u32)>,
    max_frames: u64,
}

fn parse_simulate_args(args: &[String]) -> Result<SimulateArgs> {
    let mut level = None;
    let mut parsed = SimulateArgs {
        level: PathBuf::new(),
        config: None,
        difficulty: Difficulty::default(),
        seed: 0,
        turrets: Vec::new(),
        max_frames: 60 * 60 * 60,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| anyhow!("{arg} needs a value\n\n{USAGE}"))
        };
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--difficulty" => parsed.difficulty = value()?.parse().map_err(|e: String| anyhow!(e))?,
            "--seed" => parsed.seed = value()?.parse().context("--seed")?,
            "--max-frames" => parsed.max_frames = value()?.parse().context("--max-frames")?,
            "--turret" => parsed.turrets.push(parse_turret(value()?)?),
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n\n{USAGE}"),
            path if level.is_none() => level = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument '{extra}'\n\n{USAGE}"),
        }
    }

    parsed.level = level.ok_or_else(|| anyhow!("simulate needs a level\n\n{USAGE}"))?;
    Ok(parsed)
}

/// Parse `KIND@COL,ROW`, e.g. `purple@3,4`
fn parse_turret(value: &str) -> Result<(TurretKind, u32, u32)> {
    let (kind, tile) = value
        .split_once('@')
        .ok_or_else(|| anyhow!("turret '{value}' is not KIND@COL,ROW"))?;
    let (col, row) = tile
        .split_once(',')
        .ok_or_else(|| anyhow!("turret '{value}' is not KIND@COL,ROW"))?;
    Ok((
        kind.parse().map_err(|e: String| anyhow!(e))?,
        col.trim().parse().with_context(|| format!("column in '{value}'"))?,
        row.trim().parse().with_context(|| format!("row in '{value}'"))?,
    ))
}

fn simulate(args: &[String]) -> Result<()> {
    let args = parse_simulate_args(args)?;
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let level = load_map(&args.level, &config)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    let mut game = Game::new(config, &[level], args.seed)?;
    game.set_difficulty(args.difficulty)?;
    game.select_map(0)?;

    for (kind, col, row) in &args.turrets {
        game.arm_placement(*kind)?;
        game.place_turret(*col, *row)
            .with_context(|| format!("can't place {kind} turret at ({col}, {row})"))?;
    }

    let state = game.run(args.max_frames);
    let seconds = game.now() as f64 / 1000.0;
    let Some(world) = game.world() else {
        bail!("no map is being played");
    };

    match state {
        GameState::Playing => println!(
            "stopped after {} frames ({seconds:.1}s) on wave {}/{}",
            game.frame(),
            world.level,
            game.max_levels()
        ),
        _ => println!(
            "{state} after {} frames ({seconds:.1}s) on wave {}/{}",
            game.frame(),
            world.level.min(game.max_levels()),
            game.max_levels()
        ),
    }
    println!("health {}, money {}", world.health, world.money);
    for turret in game.turrets() {
        println!(
            "  {} turret level {} at ({}, {})",
            turret.kind, turret.level, turret.col, turret.row
        );
    }
    Ok(())
}
