//! Turrets: targeting, firing animation, upgrades and the tidal boost

use glam::Vec2;
use uuid::Uuid;

use crate::config::TimingConfig;
use crate::data::{TurretKind, TurretLevel};
use crate::enemy::Enemy;

/// Temporary range and damage boost, usable once per wave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tidal {
    pub active: bool,
    pub used: bool,
    pub ends_at: u64,
}

#[derive(Debug, Clone)]
pub struct Turret {
    pub id: Uuid,
    pub kind: TurretKind,
    pub col: u32,
    pub row: u32,
    /// Center of the tile it stands on, in map pixels
    pub pos: Vec2,
    /// 1-based upgrade level
    pub level: u32,
    /// Stats of the current level, without the tidal boost
    pub base: TurretLevel,
    pub range: u32,
    pub damage: u32,
    pub last_shot: u64,
    /// Enemy hit by the shot whose animation is playing
    pub target: Option<Uuid>,
    pub frame: u32,
    frame_changed_at: u64,
    /// Aim in degrees, counter-clockwise from +x with y pointing up
    pub angle: f32,
    pub tidal: Tidal,
}

impl Turret {
    pub fn new(kind: TurretKind, col: u32, row: u32, pos: Vec2, base: TurretLevel, now: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            col,
            row,
            pos,
            level: 1,
            base,
            range: base.range,
            damage: base.damage,
            last_shot: now,
            target: None,
            frame: 0,
            frame_changed_at: now,
            angle: 90.0,
            tidal: Tidal::default(),
        }
    }

    pub fn is_firing(&self) -> bool {
        self.target.is_some()
    }

    /// Advance the turret by one frame: expire the tidal boost, then either
    /// play the firing animation or look for a new target
    pub fn update(&mut self, enemies: &mut [Enemy], now: u64, timing: &TimingConfig) {
        if self.tidal.active && now >= self.tidal.ends_at {
            self.reset_tidal();
        }

        if self.is_firing() {
            self.play_animation(now, timing.animation_delay_ms);
        } else if now.saturating_sub(self.last_shot) > self.base.cooldown {
            self.fire(enemies, now);
        }
    }

    /// Hit the first living enemy in range, in spawn order
    fn fire(&mut self, enemies: &mut [Enemy], now: u64) {
        let range = self.range as f32;
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.is_alive() && e.pos.distance(self.pos) < range)
        else {
            return;
        };

        let offset = enemy.pos - self.pos;
        self.angle = (-offset.y).atan2(offset.x).to_degrees();
        self.target = Some(enemy.id);
        enemy.health -= self.damage as f32;
        if self.kind == TurretKind::Purple && self.base.slows() {
            enemy.apply_slow(self.base.slow_amount, self.base.slow_duration, now);
        }
    }

    fn play_animation(&mut self, now: u64, delay_ms: u64) {
        if now.saturating_sub(self.frame_changed_at) <= delay_ms {
            return;
        }
        self.frame_changed_at = now;
        if self.frame + 1 < self.base.animation_steps {
            self.frame += 1;
        } else {
            self.frame = 0;
            self.last_shot = now;
            self.target = None;
        }
    }

    /// Move to the next level in `levels`. Returns false at the last level
    pub fn upgrade(&mut self, levels: &[TurretLevel]) -> bool {
        let Some(next) = levels.get(self.level as usize) else {
            return false;
        };
        self.level += 1;
        self.base = *next;
        self.range = next.range;
        self.damage = next.damage;
        true
    }

    pub fn can_tidal_upgrade(&self) -> bool {
        !self.tidal.used && !self.tidal.active
    }

    /// Boost range and damage (rounded down) until `now + duration`
    pub fn tidal_upgrade(&mut self, now: u64, timing: &TimingConfig) -> bool {
        if !self.can_tidal_upgrade() {
            return false;
        }
        self.range = (self.base.range as f32 * timing.tidal_multiplier) as u32;
        self.damage = (self.base.damage as f32 * timing.tidal_multiplier) as u32;
        self.tidal = Tidal {
            active: true,
            used: true,
            ends_at: now + timing.tidal_duration_ms,
        };
        tracing::info!(
            "Tidal upgrade on turret at ({}, {}) until {}ms",
            self.col,
            self.row,
            self.tidal.ends_at
        );
        true
    }

    /// Drop the tidal boost, keeping whether it was used this wave
    pub fn reset_tidal(&mut self) {
        if self.tidal.active {
            tracing::debug!("Tidal upgrade expired on turret at ({}, {})", self.col, self.row);
        }
        self.range = self.base.range;
        self.damage = self.base.damage;
        self.tidal.active = false;
        self.tidal.ends_at = 0;
    }
}
