//! Data-driven game balance scaled to a level
//!
//! Settings express speeds and sizes in tiles so a tuning works for every
//! level height. A `Tuning` is that same data in pixels for one world.

use glam::Vec2;

use crate::settings::{Physics, Rules};
use crate::sim::collision::Band;

#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub move_speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub kick_speed: f32,
    pub blend: f32,
    pub band: Band,
    pub player_size: Vec2,
    pub ball_radius: f32,
    pub bounce_restitution: f32,
    pub pair_restitution: f32,
    pub max_spin: f32,
    pub pickup_radius: f32,
}

impl Tuning {
    pub fn new(physics: &Physics, rules: &Rules, tile_size: f32) -> Self {
        Self {
            move_speed: physics.move_speed * tile_size,
            jump_strength: physics.jump_strength * tile_size,
            gravity: physics.gravity * tile_size,
            terminal_velocity: physics.terminal_velocity * tile_size,
            kick_speed: physics.kick_speed * tile_size,
            blend: physics.blend,
            band: Band {
                top: physics.band_top,
                bottom: physics.band_bottom,
            },
            player_size: Vec2::new(physics.player_width, physics.player_height) * tile_size,
            ball_radius: physics.ball_radius * tile_size,
            bounce_restitution: physics.bounce_restitution,
            pair_restitution: physics.pair_restitution,
            max_spin: physics.max_spin,
            pickup_radius: rules.pickup_radius * tile_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_with_tile_size() {
        let physics = Physics::default();
        let rules = Rules::default();
        let small = Tuning::new(&physics, &rules, 10.0);
        let large = Tuning::new(&physics, &rules, 40.0);
        assert!((large.move_speed - small.move_speed * 4.0).abs() < 1e-4);
        assert!((large.player_size.y - 48.0).abs() < 1e-4);
        // Ratios are not scaled
        assert_eq!(small.blend, large.blend);
        assert_eq!(small.band, large.band);
    }
}
