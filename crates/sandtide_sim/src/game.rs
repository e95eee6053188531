//! The game loop: menu, waves, player commands and the win/loss check
//!
//! [`Game::tick`] advances the simulation by one frame. Player actions are
//! separate methods that either apply completely or return a
//! [`CommandError`] and leave the game untouched.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use sandtide_core::Level;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::data::{Difficulty, TurretKind};
use crate::enemy::{Enemy, Step};
use crate::turret::Turret;
use crate::world::World;
use crate::{CommandError, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    GameOver(Outcome),
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::GameOver(_) => "game over",
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver(Outcome::Won) => f.write_str("won"),
            Self::GameOver(Outcome::Lost) => f.write_str("lost"),
            other => f.write_str(other.name()),
        }
    }
}

/// Everything that exists only while a map is being played
#[derive(Debug, Clone)]
struct Session {
    world: World,
    enemies: Vec<Enemy>,
    turrets: Vec<Turret>,
    occupied: HashSet<usize>,
    placing: Option<TurretKind>,
    selected: Option<Uuid>,
    wave_started: bool,
    last_spawn: u64,
}

impl Session {
    fn selected_index(&self) -> Result<usize, CommandError> {
        let id = self.selected.ok_or(CommandError::NoTurretSelected)?;
        self.turrets
            .iter()
            .position(|t| t.id == id)
            .ok_or(CommandError::NoTurretSelected)
    }

    fn charge(&mut self, cost: u32) -> Result<(), CommandError> {
        if self.world.money < cost {
            return Err(CommandError::NotEnoughMoney {
                needed: cost,
                available: self.world.money,
            });
        }
        self.world.money -= cost;
        Ok(())
    }

    /// Remove dead enemies, paying their kill reward
    fn settle_kills(&mut self) {
        let world = &mut self.world;
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            world.killed_enemies += 1;
            world.money += enemy.reward;
            tracing::debug!("{} enemy killed", enemy.kind);
            false
        });
    }

    /// Pay the wave reward and set up the next wave
    fn next_wave(&mut self, config: &GameConfig, rng: &mut SmallRng, now: u64) {
        self.world.money += config.economy.wave_reward;
        self.wave_started = false;
        self.last_spawn = now;
        self.world.reset_values();
        self.world.process_enemies(&config.balance.waves, rng);
        for turret in &mut self.turrets {
            turret.reset_tidal();
            turret.tidal.used = false;
        }
    }
}

fn active(state: GameState, session: &mut Option<Session>) -> Result<&mut Session, CommandError> {
    match (state, session.as_mut()) {
        (GameState::Playing, Some(session)) => Ok(session),
        _ => Err(CommandError::WrongState(state.name())),
    }
}

#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    /// One ready-to-play world per map
    maps: Vec<World>,
    state: GameState,
    difficulty: Difficulty,
    selected_map: Option<usize>,
    session: Option<Session>,
    frame: u64,
    rng: SmallRng,
}

impl Game {
    /// Create a game in the menu. Every level is checked up front so that
    /// selecting a map can't fail
    pub fn new(config: GameConfig, levels: &[Level], seed: u64) -> Result<Self, SimError> {
        let maps = levels
            .iter()
            .map(|level| World::from_level(level, &config.map, &config.economy))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            maps,
            state: GameState::Menu,
            difficulty: Difficulty::default(),
            selected_map: None,
            session: None,
            frame: 0,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected_map(&self) -> Option<usize> {
        self.selected_map
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated milliseconds since the game was created
    pub fn now(&self) -> u64 {
        self.config.timing.frame_time_ms(self.frame)
    }

    pub fn max_levels(&self) -> u32 {
        self.config.balance.waves.len() as u32
    }

    pub fn world(&self) -> Option<&World> {
        self.session.as_ref().map(|s| &s.world)
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.session
            .as_ref()
            .map(|s| s.enemies.as_slice())
            .unwrap_or_default()
    }

    pub fn turrets(&self) -> &[Turret] {
        self.session
            .as_ref()
            .map(|s| s.turrets.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_turret(&self) -> Option<&Turret> {
        let session = self.session.as_ref()?;
        let id = session.selected?;
        session.turrets.iter().find(|t| t.id == id)
    }

    /// Turret kind armed for placement
    pub fn placing(&self) -> Option<TurretKind> {
        self.session.as_ref().and_then(|s| s.placing)
    }

    pub fn wave_started(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.wave_started)
    }

    // ─── Menu ────────────────────────────────────────────────────────────────

    pub fn cycle_difficulty(&mut self) -> Result<Difficulty, CommandError> {
        if self.state != GameState::Menu {
            return Err(CommandError::WrongState(self.state.name()));
        }
        self.difficulty = self.difficulty.next();
        tracing::info!("Difficulty set to {}", self.difficulty);
        Ok(self.difficulty)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), CommandError> {
        if self.state != GameState::Menu {
            return Err(CommandError::WrongState(self.state.name()));
        }
        self.difficulty = difficulty;
        Ok(())
    }

    /// Start playing a map from its first wave
    pub fn select_map(&mut self, index: usize) -> Result<(), CommandError> {
        if self.state != GameState::Menu {
            return Err(CommandError::WrongState(self.state.name()));
        }
        let mut world = self
            .maps
            .get(index)
            .cloned()
            .ok_or(CommandError::UnknownMap(index))?;
        world.process_enemies(&self.config.balance.waves, &mut self.rng);

        self.session = Some(Session {
            world,
            enemies: Vec::new(),
            turrets: Vec::new(),
            occupied: HashSet::new(),
            placing: None,
            selected: None,
            wave_started: false,
            last_spawn: self.now(),
        });
        self.selected_map = Some(index);
        self.state = GameState::Playing;
        tracing::info!("Map {} selected on {} difficulty", index, self.difficulty);
        Ok(())
    }

    /// Drop the current map and go back to the menu
    pub fn restart(&mut self) {
        self.session = None;
        self.selected_map = None;
        self.state = GameState::Menu;
        tracing::info!("Returned to menu");
    }

    // ─── Waves ───────────────────────────────────────────────────────────────

    pub fn begin_wave(&mut self) -> Result<(), CommandError> {
        let session = active(self.state, &mut self.session)?;
        if session.wave_started {
            return Err(CommandError::WaveInProgress);
        }
        session.wave_started = true;
        tracing::info!(
            "Wave {} started: {} enemies",
            session.world.level,
            session.world.enemy_list.len()
        );
        Ok(())
    }

    /// Remove every enemy on the field, taking their damage at once, and move
    /// to the next wave. Only allowed once the whole wave has spawned.
    /// Returns the health lost
    pub fn skip_wave(&mut self) -> Result<i32, CommandError> {
        let now = self.now();
        let session = active(self.state, &mut self.session)?;
        if !session.wave_started {
            return Err(CommandError::WaveNotStarted);
        }
        if !session.world.all_spawned() || !session.enemies.iter().any(Enemy::is_alive) {
            return Err(CommandError::SkipUnavailable);
        }

        session.settle_kills();
        let skipped = session.enemies.len();
        let penalty: i32 = session.enemies.drain(..).map(|e| e.damage).sum();
        session.world.health -= penalty;
        session.next_wave(&self.config, &mut self.rng, now);
        tracing::info!(
            "Skipped wave: {} enemies removed, {} health lost",
            skipped,
            penalty
        );
        Ok(penalty)
    }

    // ─── Turrets ─────────────────────────────────────────────────────────────

    pub fn arm_placement(&mut self, kind: TurretKind) -> Result<(), CommandError> {
        let session = active(self.state, &mut self.session)?;
        session.placing = Some(kind);
        tracing::debug!("{} turret placement armed", kind);
        Ok(())
    }

    pub fn cancel_placement(&mut self) -> Result<(), CommandError> {
        let session = active(self.state, &mut self.session)?;
        session.placing = None;
        Ok(())
    }

    /// Build the armed turret kind on a tile. Placement is disarmed on success
    pub fn place_turret(&mut self, col: u32, row: u32) -> Result<Uuid, CommandError> {
        let now = self.now();
        let session = active(self.state, &mut self.session)?;
        let kind = session.placing.ok_or(CommandError::NotPlacing)?;
        let cost = self.config.economy.buy_cost(kind);
        if session.world.money < cost {
            return Err(CommandError::NotEnoughMoney {
                needed: cost,
                available: session.world.money,
            });
        }

        let tile = session
            .world
            .tile_number(col, row)
            .filter(|_| session.world.gid_at(col, row) == Some(self.config.map.buildable_gid))
            .ok_or(CommandError::InvalidTile { col, row })?;
        if session.occupied.contains(&tile) {
            return Err(CommandError::TileOccupied { col, row });
        }
        let base = *self
            .config
            .balance
            .turrets
            .level(kind, 1)
            .ok_or(CommandError::UnavailableTurret(kind))?;

        session.charge(cost)?;
        let turret = Turret::new(kind, col, row, session.world.tile_center(col, row), base, now);
        let id = turret.id;
        session.turrets.push(turret);
        session.occupied.insert(tile);
        session.placing = None;
        tracing::info!("{} turret placed at ({}, {})", kind, col, row);
        Ok(id)
    }

    /// Select the turret on a tile, or clear the selection if there is none
    pub fn select_turret(&mut self, col: u32, row: u32) -> Result<Option<Uuid>, CommandError> {
        let session = active(self.state, &mut self.session)?;
        session.selected = session
            .turrets
            .iter()
            .find(|t| t.col == col && t.row == row)
            .map(|t| t.id);
        Ok(session.selected)
    }

    /// Permanently upgrade the selected turret. Returns its new level
    pub fn upgrade_selected(&mut self) -> Result<u32, CommandError> {
        let session = active(self.state, &mut self.session)?;
        let index = session.selected_index()?;
        let turret = &session.turrets[index];
        let levels = self.config.balance.turrets.levels(turret.kind);
        if turret.level as usize >= levels.len() {
            return Err(CommandError::MaxLevel {
                kind: turret.kind,
                level: turret.level,
            });
        }
        if turret.tidal.active {
            return Err(CommandError::TidalActive);
        }

        session.charge(self.config.economy.upgrade_cost)?;
        let turret = &mut session.turrets[index];
        turret.upgrade(levels);
        tracing::info!(
            "Turret at ({}, {}) upgraded to level {}",
            turret.col,
            turret.row,
            turret.level
        );
        Ok(turret.level)
    }

    /// Apply the once-per-wave tidal boost to the selected turret
    pub fn tidal_upgrade_selected(&mut self) -> Result<(), CommandError> {
        let now = self.now();
        let session = active(self.state, &mut self.session)?;
        if !session.wave_started {
            return Err(CommandError::WaveNotStarted);
        }
        let index = session.selected_index()?;
        if !session.turrets[index].can_tidal_upgrade() {
            return Err(CommandError::TidalUnavailable);
        }

        session.charge(self.config.economy.tidal_cost)?;
        session.turrets[index].tidal_upgrade(now, &self.config.timing);
        Ok(())
    }

    /// Sell the selected turret and free its tile. Returns the refund
    pub fn sell_selected(&mut self) -> Result<u32, CommandError> {
        let session = active(self.state, &mut self.session)?;
        let index = session.selected_index()?;
        let turret = session.turrets.remove(index);
        let refund = self.config.economy.sell_price(turret.kind);

        session.world.money += refund;
        if let Some(tile) = session.world.tile_number(turret.col, turret.row) {
            session.occupied.remove(&tile);
        }
        session.selected = None;
        tracing::info!(
            "Sold {} turret at ({}, {}) for {}",
            turret.kind,
            turret.col,
            turret.row,
            refund
        );
        Ok(refund)
    }

    // ─── Frame update ────────────────────────────────────────────────────────

    /// Advance the game by one frame and return the resulting state
    pub fn tick(&mut self) -> GameState {
        self.frame += 1;
        let now = self.now();
        if self.state != GameState::Playing {
            return self.state;
        }
        let Some(session) = self.session.as_mut() else {
            return self.state;
        };
        let config = &self.config;

        if session.world.health <= 0 {
            self.state = GameState::GameOver(Outcome::Lost);
            tracing::info!("Game over: lost on wave {}", session.world.level);
            return self.state;
        }
        if session.world.level > config.balance.waves.len() as u32 {
            self.state = GameState::GameOver(Outcome::Won);
            tracing::info!(
                "Game over: won with {} health left",
                session.world.health
            );
            return self.state;
        }

        session.settle_kills();
        let world = &mut session.world;
        session.enemies.retain_mut(|enemy| match enemy.advance(&world.waypoints) {
            Step::Escaped => {
                world.health -= enemy.damage;
                world.missed_enemies += 1;
                tracing::debug!("{} enemy escaped, health {}", enemy.kind, world.health);
                false
            }
            Step::Moving => {
                enemy.update_slow(now);
                true
            }
        });
        for turret in &mut session.turrets {
            turret.update(&mut session.enemies, now, &config.timing);
        }

        if session.wave_started
            && now.saturating_sub(session.last_spawn) > config.timing.spawn_cooldown_ms
        {
            if let Some(&kind) = session.world.enemy_list.get(session.world.spawned_enemies) {
                session.enemies.push(Enemy::spawn(
                    kind,
                    config.balance.enemies.get(kind),
                    self.difficulty,
                    &session.world.waypoints,
                ));
                session.world.spawned_enemies += 1;
                session.last_spawn = now;
            }
        }

        if session.world.is_wave_completed() {
            let finished = session.world.level;
            session.next_wave(config, &mut self.rng, now);
            tracing::info!("Wave {} completed", finished);
        }

        self.state
    }

    /// Play the selected map unattended: start each wave as soon as the
    /// previous one ends, until the game is over or `max_frames` have passed
    pub fn run(&mut self, max_frames: u64) -> GameState {
        for _ in 0..max_frames {
            if self.state != GameState::Playing {
                break;
            }
            if !self.wave_started() && self.begin_wave().is_err() {
                break;
            }
            self.tick();
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Wave;

    // 6x3 map, path along the middle row, buildable tiles above and below
    const LEVEL: &str = r#"{
        "width": 6, "height": 3, "tilewidth": 48, "tileheight": 48,
        "tilesets": [ { "firstgid": 1, "source": "tileset1.tsx" } ],
        "layers": [
            { "type": "tilelayer", "name": "Background", "width": 6, "height": 3,
              "data": [1, 161, 161, 161, 161, 1,
                       2, 2, 2, 2, 2, 2,
                       161, 161, 161, 161, 161, 161] },
            { "type": "objectgroup", "name": "waypoints", "objects": [
                { "id": 1, "x": 0, "y": 72, "polyline": [ {"x": 0, "y": 0}, {"x": 288, "y": 0} ] }
            ] }
        ]
    }"#;

    fn config(waves: Vec<Wave>) -> GameConfig {
        let mut config = GameConfig::default();
        config.balance.waves = waves;
        config
    }

    fn playing(config: GameConfig) -> Game {
        let level = Level::from_json_str(LEVEL).unwrap();
        let mut game = Game::new(config, &[level], 42).unwrap();
        game.select_map(0).unwrap();
        game
    }

    fn place(game: &mut Game, kind: TurretKind, col: u32, row: u32) -> Uuid {
        game.arm_placement(kind).unwrap();
        game.place_turret(col, row).unwrap()
    }

    #[test]
    fn test_menu() {
        let level = Level::from_json_str(LEVEL).unwrap();
        let mut game = Game::new(GameConfig::default(), &[level], 0).unwrap();

        assert_eq!(game.state(), GameState::Menu);
        assert_eq!(game.begin_wave(), Err(CommandError::WrongState("menu")));
        assert_eq!(game.cycle_difficulty(), Ok(Difficulty::Hard));
        assert_eq!(game.select_map(3), Err(CommandError::UnknownMap(3)));

        game.select_map(0).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.world().unwrap().enemy_list.len(), 8);
        assert_eq!(game.cycle_difficulty(), Err(CommandError::WrongState("playing")));

        game.restart();
        assert_eq!(game.state(), GameState::Menu);
        assert!(game.world().is_none());
    }

    #[test]
    fn test_invalid_level_is_rejected_up_front() {
        let level = Level::from_json_str(&LEVEL.replace("waypoints", "path")).unwrap();
        assert!(matches!(
            Game::new(GameConfig::default(), &[level], 0),
            Err(SimError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_placement_rules() {
        let mut game = playing(GameConfig::default());

        assert_eq!(game.place_turret(1, 0), Err(CommandError::NotPlacing));

        game.arm_placement(TurretKind::Standard).unwrap();
        assert_eq!(
            game.place_turret(0, 0),
            Err(CommandError::InvalidTile { col: 0, row: 0 })
        );
        assert_eq!(
            game.place_turret(2, 1),
            Err(CommandError::InvalidTile { col: 2, row: 1 })
        );
        assert_eq!(
            game.place_turret(9, 9),
            Err(CommandError::InvalidTile { col: 9, row: 9 })
        );

        game.place_turret(1, 0).unwrap();
        assert_eq!(game.world().unwrap().money, 500);
        assert_eq!(game.placing(), None);
        assert_eq!(game.turrets()[0].pos, glam::Vec2::new(72.0, 24.0));

        game.arm_placement(TurretKind::Camo).unwrap();
        assert_eq!(
            game.place_turret(1, 0),
            Err(CommandError::TileOccupied { col: 1, row: 0 })
        );

        game.arm_placement(TurretKind::Purple).unwrap();
        game.place_turret(2, 0).unwrap();
        assert_eq!(game.world().unwrap().money, 0);

        game.arm_placement(TurretKind::Standard).unwrap();
        assert_eq!(
            game.place_turret(3, 0),
            Err(CommandError::NotEnoughMoney {
                needed: 200,
                available: 0
            })
        );
        game.cancel_placement().unwrap();
        assert_eq!(game.placing(), None);
    }

    #[test]
    fn test_upgrade_and_sell() {
        let mut game = playing(GameConfig::default());
        place(&mut game, TurretKind::Standard, 1, 0);

        assert_eq!(game.upgrade_selected(), Err(CommandError::NoTurretSelected));
        assert_eq!(game.select_turret(4, 0), Ok(None));
        assert!(game.select_turret(1, 0).unwrap().is_some());

        assert_eq!(game.upgrade_selected(), Ok(2));
        assert_eq!(game.upgrade_selected(), Ok(3));
        assert_eq!(game.upgrade_selected(), Ok(4));
        assert_eq!(game.world().unwrap().money, 200);
        assert_eq!(
            game.upgrade_selected(),
            Err(CommandError::MaxLevel {
                kind: TurretKind::Standard,
                level: 4
            })
        );
        assert_eq!(game.selected_turret().unwrap().range, 150);

        assert_eq!(game.sell_selected(), Ok(60));
        assert_eq!(game.world().unwrap().money, 260);
        assert!(game.turrets().is_empty());
        assert!(game.selected_turret().is_none());

        // The tile is free again
        place(&mut game, TurretKind::Standard, 1, 0);
    }

    #[test]
    fn test_tidal_upgrade_once_per_wave() {
        let mut game = playing(config(vec![Wave::new(1, 0, 0, 0), Wave::new(1, 0, 0, 0)]));
        place(&mut game, TurretKind::Standard, 1, 0);
        game.select_turret(1, 0).unwrap();

        assert_eq!(game.tidal_upgrade_selected(), Err(CommandError::WaveNotStarted));
        game.begin_wave().unwrap();
        assert_eq!(game.begin_wave(), Err(CommandError::WaveInProgress));

        game.tidal_upgrade_selected().unwrap();
        assert_eq!(game.world().unwrap().money, 450);
        assert_eq!(game.selected_turret().unwrap().range, 125);
        assert_eq!(game.upgrade_selected(), Err(CommandError::TidalActive));
        assert_eq!(game.tidal_upgrade_selected(), Err(CommandError::TidalUnavailable));

        while game.world().unwrap().level == 1 {
            game.tick();
        }
        let turret = game.selected_turret().unwrap();
        assert!(!turret.tidal.active);
        assert_eq!(turret.range, 100);
        assert!(turret.can_tidal_upgrade());
    }

    #[test]
    fn test_skip_wave() {
        let mut game = playing(config(vec![Wave::new(2, 0, 0, 0), Wave::new(1, 0, 0, 0)]));

        assert_eq!(game.skip_wave(), Err(CommandError::WaveNotStarted));
        game.begin_wave().unwrap();
        for _ in 0..60 {
            game.tick();
        }
        assert_eq!(game.enemies().len(), 1);
        assert_eq!(game.skip_wave(), Err(CommandError::SkipUnavailable));

        while !game.world().unwrap().all_spawned() {
            game.tick();
        }
        assert_eq!(game.enemies().len(), 2);
        assert_eq!(game.skip_wave(), Ok(2));

        let world = game.world().unwrap();
        assert_eq!(world.health, 98);
        assert_eq!(world.money, 750);
        assert_eq!(world.level, 2);
        assert_eq!(world.enemy_list.len(), 1);
        assert!(game.enemies().is_empty());
        assert!(!game.wave_started());
    }

    fn fragile_weak(waves: Vec<Wave>) -> GameConfig {
        let mut config = config(waves);
        config.balance.enemies.weak.health = 5.0;
        config.timing.spawn_cooldown_ms = 0;
        config
    }

    fn tick_until_kill(game: &mut Game) {
        for _ in 0..600 {
            if game.enemies().iter().any(|e| !e.is_alive()) {
                return;
            }
            game.tick();
        }
        panic!("no enemy was killed");
    }

    #[test]
    fn test_skip_pays_for_kills_on_the_field() {
        let mut game = playing(fragile_weak(vec![Wave::new(2, 0, 0, 0), Wave::new(1, 0, 0, 0)]));
        place(&mut game, TurretKind::Standard, 1, 0);
        game.begin_wave().unwrap();

        tick_until_kill(&mut game);
        assert!(game.world().unwrap().all_spawned());
        assert_eq!(game.enemies().len(), 2);

        // Only the living enemy counts against the player
        assert_eq!(game.skip_wave(), Ok(1));
        let world = game.world().unwrap();
        assert_eq!(world.health, 99);
        // 700 - 200 + kill reward + wave reward
        assert_eq!(world.money, 560);
        assert_eq!(world.level, 2);
    }

    #[test]
    fn test_field_of_dead_enemies_cannot_be_skipped() {
        let mut game = playing(fragile_weak(vec![Wave::new(1, 0, 0, 0), Wave::new(1, 0, 0, 0)]));
        place(&mut game, TurretKind::Standard, 1, 0);
        game.begin_wave().unwrap();

        tick_until_kill(&mut game);
        assert_eq!(game.skip_wave(), Err(CommandError::SkipUnavailable));
        assert_eq!(game.world().unwrap().money, 500);

        game.tick();
        let world = game.world().unwrap();
        assert_eq!(world.health, 100);
        assert_eq!(world.money, 560);
        assert_eq!(world.level, 2);
    }

    #[test]
    fn test_unguarded_path_loses_health_then_wins() {
        let mut game = playing(config(vec![Wave::new(3, 0, 0, 0)]));

        assert_eq!(game.run(10_000), GameState::GameOver(Outcome::Won));
        let world = game.world().unwrap();
        assert_eq!(world.health, 97);
        assert_eq!(world.money, 750);
        assert_eq!(world.level, 2);

        // Nothing moves once the game is over
        let frame = game.frame();
        assert_eq!(game.tick(), GameState::GameOver(Outcome::Won));
        assert_eq!(game.frame(), frame + 1);
        assert_eq!(game.place_turret(1, 0), Err(CommandError::WrongState("game over")));
    }

    #[test]
    fn test_turrets_kill_enemies() {
        let mut game = playing(config(vec![Wave::new(1, 0, 0, 0)]));
        place(&mut game, TurretKind::Standard, 2, 0);
        place(&mut game, TurretKind::Standard, 4, 2);

        assert_eq!(game.run(10_000), GameState::GameOver(Outcome::Won));
        let world = game.world().unwrap();
        assert_eq!(world.health, 100);
        // 700 - 2 * 200 + kill reward + wave reward
        assert_eq!(world.money, 360);
    }

    #[test]
    fn test_losing() {
        let mut config = config(vec![Wave::new(5, 0, 0, 0)]);
        config.economy.starting_health = 2;
        let mut game = playing(config);

        assert_eq!(game.run(10_000), GameState::GameOver(Outcome::Lost));
        assert!(game.world().unwrap().health <= 0);
    }

    #[test]
    fn test_seeded_games_match() {
        let waves = vec![Wave::new(5, 5, 5, 5)];
        let a = playing(config(waves.clone()));
        let b = playing(config(waves));
        assert_eq!(a.world().unwrap().enemy_list, b.world().unwrap().enemy_list);
    }
}
