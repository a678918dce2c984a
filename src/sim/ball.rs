//! Kicked balls
//!
//! Balls fall at half gravity, bounce off platforms with energy loss,
//! reflect off the left and right world edges and collide with each other.
//! A ball may overlap a platform slightly after a bounce; positions are not
//! corrected beyond the velocity flip.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{Cell, TileWorld};
use crate::tuning::Tuning;

/// Contacts found during one ball step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallContact {
    /// Bounced off a platform
    pub platform: bool,
    /// Reflected off a side of the world
    pub wall: bool,
    /// Centre entered lava
    pub lava: bool,
    /// Dropped below the world
    pub fell_out: bool,
}

impl BallContact {
    /// The ball should be removed
    pub fn destroyed(&self) -> bool {
        self.lava || self.fell_out
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Circle centre
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Rotation for rendering (radians)
    pub angle: f32,
    /// Radians per tick, fixed at spawn
    pub spin: f32,
    pub born_ms: u64,
    pub last_sound_ms: Option<u64>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, spin: f32, now_ms: u64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            angle: 0.0,
            spin,
            born_ms: now_ms,
            last_sound_ms: None,
        }
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.born_ms)
    }

    /// Older than the lifetime
    pub fn expired(&self, now_ms: u64, lifetime_ms: u64) -> bool {
        self.age_ms(now_ms) > lifetime_ms
    }

    /// Claim the sound slot if the cooldown has passed
    pub fn try_sound(&mut self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_sound_ms {
            Some(last) if now_ms.saturating_sub(last) < cooldown_ms => false,
            _ => {
                self.last_sound_ms = Some(now_ms);
                true
            }
        }
    }

    /// Advance one tick
    pub fn step(&mut self, world: &TileWorld, tuning: &Tuning) -> BallContact {
        let mut contact = BallContact::default();

        self.vel.y += tuning.gravity * 0.5;
        self.vel.y = self
            .vel
            .y
            .clamp(-tuning.terminal_velocity, tuning.terminal_velocity);

        let next = self.pos + self.vel;

        if next.x - self.radius < 0.0 || next.x + self.radius > world.map_w() {
            self.vel.x = -self.vel.x;
            contact.wall = true;
        }

        // Foot when falling, head when rising. The edge is tested at the
        // predicted position and the ball is never snapped to the surface, so
        // a resting ball keeps a small steady hop instead of settling. The
        // bounce sound cooldown keeps that quiet enough; leave it as is.
        let edge_y = if self.vel.y > 0.0 {
            next.y + self.radius
        } else {
            next.y - self.radius
        };
        if world.cell_at(Vec2::new(next.x, edge_y)).is_solid() {
            self.vel.y = -self.vel.y * tuning.bounce_restitution;
            contact.platform = true;
        }

        self.pos += self.vel;
        self.angle += self.spin;

        contact.lava = world.cell_at(self.pos) == Cell::Lava;
        contact.fell_out = self.pos.y - self.radius > world.map_h();
        contact
    }
}

/// Separate and bounce every overlapping pair.
///
/// Returns the ids of pairs that were closing when they touched.
pub fn resolve_pairs(balls: &mut [Ball], restitution: f32) -> Vec<(u32, u32)> {
    let mut impacts = Vec::new();
    for j in 1..balls.len() {
        let (head, tail) = balls.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            let delta = b.pos - a.pos;
            let dist = delta.length();
            let min_dist = a.radius + b.radius;
            if dist >= min_dist {
                continue;
            }
            // Coincident centres (two kicks from a standing player) get an arbitrary axis
            let normal = delta.try_normalize().unwrap_or(Vec2::X);
            let half_overlap = (min_dist - dist) / 2.0;
            a.pos -= normal * half_overlap;
            b.pos += normal * half_overlap;

            let closing = (a.vel - b.vel).dot(normal);
            if closing > 0.0 {
                let impulse = normal * closing * restitution;
                a.vel -= impulse;
                b.vel += impulse;
                impacts.push((a.id, b.id));
            }
        }
    }
    impacts
}
