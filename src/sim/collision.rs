//! Rectangle-vs-tile-grid collision
//!
//! Two discrete passes, horizontal strictly before vertical. Each pass runs
//! after the displacement for its axis has been applied and clamps the
//! rectangle back out of any platform it entered. This is only sound while
//! no actor moves a full tile per tick, which `Settings::validate` enforces.

use glam::Vec2;

use super::world::TileWorld;
use crate::consts::COLLISION_EPSILON;

/// Which sides of the actor touched a platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitFlags {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl HitFlags {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    /// Combine flags from two passes
    pub fn merge(self, other: HitFlags) -> HitFlags {
        HitFlags {
            left: self.left || other.left,
            right: self.right || other.right,
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
        }
    }
}

/// Vertical slice of the actor tested by the horizontal pass, as fractions of its height.
///
/// Leaving the top and bottom slivers out lets a tall actor squeeze through a
/// one-tile gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f32,
    pub bottom: f32,
}

impl Default for Band {
    fn default() -> Self {
        Self {
            top: 0.25,
            bottom: 0.75,
        }
    }
}

/// Clamp the rectangle after a horizontal move of `dx`.
///
/// Only the column under the leading edge is tested, and only across the
/// band rows. A hit zeroes `vel.x`.
pub fn resolve_horizontal(
    world: &TileWorld,
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    dx: f32,
    band: Band,
) -> HitFlags {
    let mut hits = HitFlags::default();
    if dx == 0.0 {
        return hits;
    }

    let tile = world.tile_size();
    let first_row = world.index_of(pos.y + size.y * band.top);
    let last_row = world.index_of(pos.y + size.y * band.bottom);
    let blocked = |col: i64| (first_row..=last_row).any(|row| world.is_platform(row, col));

    if dx > 0.0 {
        let col = world.index_of(pos.x + size.x);
        if blocked(col) {
            pos.x = col as f32 * tile - size.x - COLLISION_EPSILON;
            vel.x = 0.0;
            hits.right = true;
        }
    } else {
        let col = world.index_of(pos.x);
        if blocked(col) {
            pos.x = (col + 1) as f32 * tile + COLLISION_EPSILON;
            vel.x = 0.0;
            hits.left = true;
        }
    }
    hits
}

/// Clamp the rectangle after a vertical move of `dy`.
///
/// Tests the row under the leading edge across the full width. Landing
/// reports `bottom`, which callers treat as grounded; this pass never
/// clears grounded itself.
pub fn resolve_vertical(
    world: &TileWorld,
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    dy: f32,
) -> HitFlags {
    let mut hits = HitFlags::default();
    if dy == 0.0 {
        return hits;
    }

    let tile = world.tile_size();
    let mut cols = world.span(pos.x, pos.x + size.x);

    if dy > 0.0 {
        let row = world.index_of(pos.y + size.y);
        if cols.any(|col| world.is_platform(row, col)) {
            // Rest exactly on the platform top
            pos.y = row as f32 * tile - size.y;
            vel.y = 0.0;
            hits.bottom = true;
        }
    } else {
        let row = world.index_of(pos.y);
        if cols.any(|col| world.is_platform(row, col)) {
            pos.y = (row + 1) as f32 * tile + COLLISION_EPSILON;
            vel.y = 0.0;
            hits.top = true;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelImage;

    const T: f32 = 10.0;

    fn world(rows: &[&str]) -> TileWorld {
        TileWorld::from_image(&LevelImage::from_rows(rows), T * rows.len() as f32).unwrap()
    }

    #[test]
    fn test_horizontal_clamps_to_wall() {
        let w = world(&["S...#G", ".....#", "######"]);
        let size = Vec2::new(8.0, 8.0);
        // Leading edge moved into column 4
        let mut pos = Vec2::new(33.0, 1.0);
        let mut vel = Vec2::new(3.0, 0.0);
        let hits = resolve_horizontal(&w, &mut pos, &mut vel, size, 3.0, Band::default());
        assert!(hits.right);
        assert_eq!(vel.x, 0.0);
        assert!(pos.x + size.x < 40.0);
        assert!((pos.x + size.x - 40.0).abs() <= COLLISION_EPSILON * 2.0);
    }

    #[test]
    fn test_horizontal_moving_left() {
        let w = world(&["#S..G", "#....", "#####"]);
        let size = Vec2::new(8.0, 8.0);
        let mut pos = Vec2::new(8.0, 1.0);
        let mut vel = Vec2::new(-2.0, 0.0);
        let hits = resolve_horizontal(&w, &mut pos, &mut vel, size, -2.0, Band::default());
        assert!(hits.left);
        assert!(pos.x > 10.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_horizontal_ignores_slivers_outside_band() {
        // Wall only in row 0; the actor's top sliver pokes into row 0
        let w = world(&["S...#G", "......", "######"]);
        let size = Vec2::new(8.0, 12.0);
        // Top at y=8: band covers 11..17, all in row 1
        let mut pos = Vec2::new(33.0, 8.0);
        let mut vel = Vec2::new(2.0, 0.0);
        let hits = resolve_horizontal(&w, &mut pos, &mut vel, size, 2.0, Band::default());
        assert!(!hits.any());
        assert_eq!(pos.x, 33.0);
        assert_eq!(vel.x, 2.0);

        // A full-height band would have blocked
        let full = Band {
            top: 0.0,
            bottom: 1.0,
        };
        let hits = resolve_horizontal(&w, &mut pos, &mut vel, size, 2.0, full);
        assert!(hits.right);
    }

    #[test]
    fn test_out_of_bounds_does_not_block() {
        let w = world(&["S..G", "####"]);
        let size = Vec2::new(8.0, 8.0);
        let mut pos = Vec2::new(-5.0, 1.0);
        let mut vel = Vec2::new(-1.0, 0.0);
        let hits = resolve_horizontal(&w, &mut pos, &mut vel, size, -1.0, Band::default());
        assert!(!hits.any());
        assert_eq!(pos.x, -5.0);
    }

    #[test]
    fn test_landing_grounds_and_zeroes_velocity() {
        let w = world(&["S..G", "....", "####"]);
        let size = Vec2::new(8.0, 8.0);
        // Bottom edge dipped into row 2
        let mut pos = Vec2::new(5.0, 13.0);
        let mut vel = Vec2::new(0.0, 4.0);
        let hits = resolve_vertical(&w, &mut pos, &mut vel, size, 4.0);
        assert!(hits.bottom);
        assert_eq!(vel.y, 0.0);
        assert_eq!(pos.y + size.y, 20.0);
    }

    #[test]
    fn test_landing_checks_full_width() {
        // Only column 2 is solid; the actor straddles columns 1 and 2
        let w = world(&["S..G", "....", "..#."]);
        let size = Vec2::new(8.0, 8.0);
        let mut pos = Vec2::new(13.0, 13.0);
        let mut vel = Vec2::new(0.0, 4.0);
        assert!(resolve_vertical(&w, &mut pos, &mut vel, size, 4.0).bottom);

        // Right edge exactly on the boundary does not reach column 2
        let mut pos = Vec2::new(20.0 - size.x, 13.0);
        let mut vel = Vec2::new(0.0, 4.0);
        assert!(!resolve_vertical(&w, &mut pos, &mut vel, size, 4.0).bottom);
        assert_eq!(vel.y, 4.0);
    }

    #[test]
    fn test_head_bump() {
        let w = world(&["S..G", "####", "...."]);
        let size = Vec2::new(8.0, 8.0);
        let mut pos = Vec2::new(5.0, 19.0);
        let mut vel = Vec2::new(0.0, -3.0);
        let hits = resolve_vertical(&w, &mut pos, &mut vel, size, -3.0);
        assert!(hits.top);
        assert!(!hits.bottom);
        assert_eq!(vel.y, 0.0);
        assert!(pos.y > 20.0);
    }

    #[test]
    fn test_merge_flags() {
        let a = HitFlags {
            left: true,
            ..Default::default()
        };
        let b = HitFlags {
            bottom: true,
            ..Default::default()
        };
        let m = a.merge(b);
        assert!(m.left && m.bottom && !m.right && !m.top);
    }
}
