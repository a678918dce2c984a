//! Start screen logos
//!
//! Cosmetic only: they bounce off the viewport edges and simply trade
//! velocities when they touch.

use glam::Vec2;

use crate::rects_overlap;

#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Logo {
    pub fn new(pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self { pos, vel, size }
    }

    /// Move one tick and reflect off the edges of `bounds`
    pub fn step(&mut self, bounds: Vec2) {
        self.pos += self.vel;

        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + self.size.x > bounds.x {
            self.pos.x = bounds.x - self.size.x;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y + self.size.y > bounds.y {
            self.pos.y = bounds.y - self.size.y;
            self.vel.y = -self.vel.y.abs();
        }
    }

    pub fn overlaps(&self, other: &Logo) -> bool {
        rects_overlap(self.pos, self.size, other.pos, other.size)
    }
}

/// Swap velocities if the two logos touch
pub fn collide_logos(a: &mut Logo, b: &mut Logo) -> bool {
    if a.overlaps(b) {
        std::mem::swap(&mut a.vel, &mut b.vel);
        true
    } else {
        false
    }
}
