//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, timers from the caller's clock reading
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod logo;
pub mod player;
pub mod state;
pub mod tick;
pub mod world;

pub use ball::{Ball, BallContact, resolve_pairs};
pub use collision::{Band, HitFlags, resolve_horizontal, resolve_vertical};
pub use logo::{Logo, collide_logos};
pub use player::{Player, PlayerCommand, PlayerStep};
pub use state::{Collectible, GameEvent, Outcome, PlayState};
pub use tick::{TickOutput, tick};
pub use world::{Cell, GridPos, LevelError, Tile, TileWorld};
