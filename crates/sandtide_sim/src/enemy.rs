//! Enemies walking the waypoint path

use glam::Vec2;
use uuid::Uuid;

use crate::data::{Difficulty, EnemyKind, EnemyStats};

/// Result of moving an enemy for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moving,
    /// Walked past the last waypoint
    Escaped,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: Uuid,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Index of the waypoint being walked towards
    pub target_waypoint: usize,
    pub health: f32,
    pub max_health: f32,
    /// Current speed in pixels per frame
    pub speed: f32,
    pub base_speed: f32,
    pub damage: i32,
    pub reward: u32,
    /// Heading in degrees, counter-clockwise from +x with y pointing up
    pub angle: f32,
    /// When the current slow effect ends, if slowed
    pub slowed_until: Option<u64>,
}

impl Enemy {
    /// Create an enemy standing on the first waypoint
    pub fn spawn(
        kind: EnemyKind,
        stats: &EnemyStats,
        difficulty: Difficulty,
        waypoints: &[Vec2],
    ) -> Self {
        let health = stats.health * difficulty.health_multiplier();
        let speed = stats.speed * difficulty.speed_multiplier();
        Self {
            id: Uuid::new_v4(),
            kind,
            pos: waypoints.first().copied().unwrap_or(Vec2::ZERO),
            target_waypoint: 1,
            health,
            max_health: health,
            speed,
            base_speed: speed,
            damage: stats.damage,
            reward: stats.reward,
            angle: 0.0,
            slowed_until: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_slowed(&self) -> bool {
        self.slowed_until.is_some()
    }

    /// Move towards the current waypoint by `speed` pixels without overshooting it.
    /// Reaching a waypoint retargets the next one on the following frame
    pub fn advance(&mut self, waypoints: &[Vec2]) -> Step {
        let Some(&target) = waypoints.get(self.target_waypoint) else {
            return Step::Escaped;
        };

        let movement = target - self.pos;
        let dist = movement.length();
        if dist >= self.speed {
            self.pos += movement.normalize_or_zero() * self.speed;
        } else {
            self.pos = target;
            self.target_waypoint += 1;
        }

        if let Some(&next) = waypoints.get(self.target_waypoint) {
            let heading = next - self.pos;
            if heading != Vec2::ZERO {
                self.angle = (-heading.y).atan2(heading.x).to_degrees();
            }
        }
        Step::Moving
    }

    /// Slow the enemy unless it is already slowed
    pub fn apply_slow(&mut self, amount: f32, duration_ms: u64, now: u64) {
        if self.is_slowed() {
            return;
        }
        self.speed = self.base_speed * (1.0 - amount);
        self.slowed_until = Some(now + duration_ms);
        tracing::debug!(
            "Enemy {} slowed by {}% for {}ms",
            self.id,
            amount * 100.0,
            duration_ms
        );
    }

    /// Restore base speed once the slow effect has run out
    pub fn update_slow(&mut self, now: u64) {
        if let Some(until) = self.slowed_until {
            if now > until {
                self.slowed_until = None;
                self.speed = self.base_speed;
            }
        }
    }
}
