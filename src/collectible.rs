use glam::Vec3;
use rand::Rng;

use crate::config::*;

/// Where a collectible is in its one-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectPhase {
    /// Spinning and bobbing in place, waiting to be picked up.
    Idle,
    /// Shrink/fade-out running; elapsed seconds since pickup.
    Collecting(f32),
    /// Animation finished, ready to be dropped from the level.
    Done,
}

/// A single pickup. The spawn position is fixed; the idle bob oscillates
/// around `start_y` with a per-instance phase offset so a field of them
/// never animates in lockstep.
pub struct Collectible {
    pub position: Vec3,
    start_y: f32,
    time: f32,
    spin: f32,
    spin_speed: f32,
    phase: CollectPhase,
}

impl Collectible {
    pub fn new(position: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            position,
            start_y: position.y,
            time: rng.random_range(0.0..1000.0),
            spin: 0.0,
            spin_speed: rng.random_range(1.2..2.4),
            phase: CollectPhase::Idle,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.phase {
            CollectPhase::Idle => {
                self.time += dt;
                self.spin += self.spin_speed * dt;
                self.position.y = self.start_y + (self.time * 2.0).sin() * BOB_AMOUNT;
            }
            CollectPhase::Collecting(elapsed) => {
                let elapsed = elapsed + dt;
                self.phase = if elapsed >= COLLECT_ANIM_SECS {
                    CollectPhase::Done
                } else {
                    CollectPhase::Collecting(elapsed)
                };
            }
            CollectPhase::Done => {}
        }
    }

    /// True while the player sphere is within pickup range of a live item.
    pub fn contains(&self, player_pos: Vec3) -> bool {
        self.phase == CollectPhase::Idle && self.position.distance(player_pos) < PICKUP_RADIUS
    }

    /// Start the collect animation. Returns false if already collected, so
    /// picking the same item up twice is a no-op.
    pub fn collect(&mut self) -> bool {
        if self.phase != CollectPhase::Idle {
            return false;
        }
        self.phase = CollectPhase::Collecting(0.0);
        true
    }

    pub fn is_collected(&self) -> bool {
        self.phase != CollectPhase::Idle
    }

    pub fn is_done(&self) -> bool {
        self.phase == CollectPhase::Done
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Grow-and-fade factors for the pickup flash; 1.0/1.0 while idle.
    pub fn scale_opacity(&self) -> (f32, f32) {
        match self.phase {
            CollectPhase::Idle => (1.0, 1.0),
            CollectPhase::Collecting(elapsed) => {
                let p = (elapsed / COLLECT_ANIM_SECS).clamp(0.0, 1.0);
                (1.0 + p, 1.0 - p)
            }
            CollectPhase::Done => (2.0, 0.0),
        }
    }
}
