//! Coin Dash - a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Simulation (tile world, collision, player, balls, logos)
//! - `scene`: Phase state machine and the context shared by phases
//! - `input`: Per-tick input snapshot and the latch device callbacks write to
//! - `levels`: Level bitmaps and the level library
//! - `audio`: Fire-and-forget sound triggers
//! - `settings`: Data-driven game balance and preferences
//! - `tuning`: Settings scaled to pixels for one tile size

pub mod audio;
pub mod clock;
pub mod hud;
pub mod input;
pub mod levels;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scene::{GameContext, PhaseKind, SceneMachine, Transition};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default viewport size in pixels
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 540.0;

    /// Gap left between a clamped edge and the tile it hit
    pub const COLLISION_EPSILON: f32 = 0.01;

    /// Horizontal velocity blend toward the input target, per tick
    pub const BLEND_FACTOR: f32 = 0.2;

    /// Kicked balls leave at 45 degrees above horizontal
    pub const KICK_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

    /// Ball-vs-platform restitution (bounce height decays)
    pub const BOUNCE_RESTITUTION: f32 = 0.85;
    /// Ball-vs-ball restitution
    pub const PAIR_RESTITUTION: f32 = 0.9;

    /// Level countdown
    pub const TIME_LIMIT_MS: u64 = 120_000;
    /// Ball population cap
    pub const MAX_BALLS: usize = 100;
    /// Balls older than this are culled
    pub const BALL_LIFETIME_MS: u64 = 10_000;
    /// Minimum gap between bounce sounds of one ball
    pub const BOUNCE_SOUND_COOLDOWN_MS: u64 = 150;

    /// Start screen logo size in pixels
    pub const LOGO_WIDTH: f32 = 160.0;
    pub const LOGO_HEIGHT: f32 = 60.0;
    pub const LOGO_SPEED: f32 = 2.5;
}

/// Axis-aligned overlap test for half-open rectangles given as (top-left, size)
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}

/// Unit vector for a launch angle above horizontal, mirrored by `dir` (+1 right, -1 left)
#[inline]
pub fn launch_direction(angle: f32, dir: f32) -> Vec2 {
    // Screen y grows downward, so "up" is negative y
    Vec2::new(angle.cos() * dir, -angle.sin())
}
