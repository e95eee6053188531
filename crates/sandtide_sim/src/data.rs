//! Balance tables: enemy stats, turret levels, waves and difficulty

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of enemy in a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Weak,
    Medium,
    Strong,
    Elite,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [Self::Weak, Self::Medium, Self::Strong, Self::Elite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base stats of one enemy kind, before difficulty is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Health taken from the player when the enemy leaves the map
    pub damage: i32,
    /// Money paid when the enemy is killed
    pub reward: u32,
}

impl EnemyStats {
    pub const fn new(health: f32, speed: f32, damage: i32, reward: u32) -> Self {
        Self {
            health,
            speed,
            damage,
            reward,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub weak: EnemyStats,
    pub medium: EnemyStats,
    pub strong: EnemyStats,
    pub elite: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            weak: EnemyStats::new(10.0, 1.0, 1, 10),
            medium: EnemyStats::new(15.0, 1.5, 5, 15),
            strong: EnemyStats::new(20.0, 2.0, 10, 20),
            elite: EnemyStats::new(30.0, 3.0, 15, 25),
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Weak => &self.weak,
            EnemyKind::Medium => &self.medium,
            EnemyKind::Strong => &self.strong,
            EnemyKind::Elite => &self.elite,
        }
    }
}

/// Kind of turret the player can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurretKind {
    #[default]
    Standard,
    Camo,
    /// Slows the enemies it hits
    Purple,
}

impl TurretKind {
    pub const ALL: [TurretKind; 3] = [Self::Standard, Self::Camo, Self::Purple];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Camo => "camo",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for TurretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurretKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown turret kind '{s}' (expected standard, camo or purple)"))
    }
}

/// Stats of a turret at one upgrade level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretLevel {
    /// Pixels
    pub range: u32,
    /// Milliseconds between shots
    pub cooldown: u64,
    pub damage: u32,
    /// Frames in the firing animation
    pub animation_steps: u32,
    /// Fraction of speed removed from a hit enemy
    #[serde(default)]
    pub slow_amount: f32,
    /// Milliseconds
    #[serde(default)]
    pub slow_duration: u64,
}

impl TurretLevel {
    const fn plain(range: u32, cooldown: u64, damage: u32, animation_steps: u32) -> Self {
        Self {
            range,
            cooldown,
            damage,
            animation_steps,
            slow_amount: 0.0,
            slow_duration: 0,
        }
    }

    const fn slowing(
        range: u32,
        cooldown: u64,
        damage: u32,
        animation_steps: u32,
        slow_amount: f32,
        slow_duration: u64,
    ) -> Self {
        Self {
            range,
            cooldown,
            damage,
            animation_steps,
            slow_amount,
            slow_duration,
        }
    }

    pub fn slows(&self) -> bool {
        self.slow_amount > 0.0 && self.slow_duration > 0
    }
}

/// Upgrade levels of every turret kind, level 1 first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTable {
    pub standard: Vec<TurretLevel>,
    pub camo: Vec<TurretLevel>,
    pub purple: Vec<TurretLevel>,
}

impl Default for TurretTable {
    fn default() -> Self {
        Self {
            standard: vec![
                TurretLevel::plain(100, 1500, 5, 8),
                TurretLevel::plain(120, 1200, 5, 8),
                TurretLevel::plain(130, 1000, 5, 8),
                TurretLevel::plain(150, 900, 5, 8),
            ],
            camo: vec![
                TurretLevel::plain(110, 1600, 5, 8),
                TurretLevel::plain(130, 1300, 5, 8),
                TurretLevel::plain(140, 1100, 5, 8),
                TurretLevel::plain(160, 1000, 5, 8),
            ],
            purple: vec![
                TurretLevel::slowing(120, 1700, 5, 11, 0.3, 500),
                TurretLevel::slowing(140, 1600, 7, 11, 0.4, 1000),
                TurretLevel::slowing(160, 1500, 8, 11, 0.5, 1500),
                TurretLevel::slowing(180, 1400, 10, 11, 0.5, 2000),
            ],
        }
    }
}

impl TurretTable {
    pub fn levels(&self, kind: TurretKind) -> &[TurretLevel] {
        match kind {
            TurretKind::Standard => &self.standard,
            TurretKind::Camo => &self.camo,
            TurretKind::Purple => &self.purple,
        }
    }

    /// Stats at a 1-based level
    pub fn level(&self, kind: TurretKind, level: u32) -> Option<&TurretLevel> {
        let index = (level as usize).checked_sub(1)?;
        self.levels(kind).get(index)
    }
}

/// Enemy counts of one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wave {
    pub weak: u32,
    pub medium: u32,
    pub strong: u32,
    pub elite: u32,
}

impl Wave {
    pub const fn new(weak: u32, medium: u32, strong: u32, elite: u32) -> Self {
        Self {
            weak,
            medium,
            strong,
            elite,
        }
    }

    pub fn count(&self, kind: EnemyKind) -> u32 {
        match kind {
            EnemyKind::Weak => self.weak,
            EnemyKind::Medium => self.medium,
            EnemyKind::Strong => self.strong,
            EnemyKind::Elite => self.elite,
        }
    }

    pub fn total(&self) -> u32 {
        self.weak + self.medium + self.strong + self.elite
    }
}

pub fn default_waves() -> Vec<Wave> {
    vec![
        Wave::new(8, 0, 0, 0),
        Wave::new(15, 0, 0, 0),
        Wave::new(30, 0, 0, 0),
        Wave::new(20, 5, 0, 0),
        Wave::new(30, 15, 0, 0),
        Wave::new(5, 20, 0, 0),
        Wave::new(15, 15, 4, 0),
        Wave::new(20, 25, 5, 0),
        Wave::new(10, 20, 15, 0),
        Wave::new(15, 10, 5, 0),
        Wave::new(0, 100, 0, 0),
        Wave::new(5, 10, 12, 2),
        Wave::new(0, 15, 10, 5),
        Wave::new(20, 0, 25, 10),
        Wave::new(15, 15, 15, 15),
        Wave::new(25, 25, 25, 25),
    ]
}

/// Scales enemy health and speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn health_multiplier(&self) -> f32 {
        match self {
            Self::Easy => 0.75,
            Self::Normal => 1.0,
            Self::Hard => 1.25,
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Self::Easy => 0.9,
            Self::Normal => 1.0,
            Self::Hard => 1.2,
        }
    }

    /// Easy -> Normal -> Hard -> Easy
    pub fn next(&self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("unknown difficulty '{s}' (expected easy, normal or hard)")),
        }
    }
}
