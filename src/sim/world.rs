//! Tile world
//!
//! A level is a grid of empty/platform/lava cells scanned out of a bitmap,
//! plus the spawn, goal and coin markers found in the same scan. The world
//! is immutable once built; reloading a level builds a new one.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::levels::LevelImage;

/// Exact pixel colours recognised in a level bitmap
pub mod palette {
    pub const PLATFORM: [u8; 3] = [0, 0, 0];
    pub const LAVA: [u8; 3] = [255, 0, 255];
    pub const SPAWN: [u8; 3] = [255, 0, 0];
    pub const COIN: [u8; 3] = [0, 255, 0];
    pub const GOAL: [u8; 3] = [255, 255, 0];
    /// Anything not listed above reads as empty; this is just the canonical one
    pub const EMPTY: [u8; 3] = [255, 255, 255];
}

/// Meaning of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Platform,
    Lava,
    Spawn,
    Coin,
    Goal,
}

impl Marker {
    /// Fixed colour lookup, no tolerance
    pub fn from_rgb(rgb: [u8; 3]) -> Option<Self> {
        match rgb {
            palette::PLATFORM => Some(Marker::Platform),
            palette::LAVA => Some(Marker::Lava),
            palette::SPAWN => Some(Marker::Spawn),
            palette::COIN => Some(Marker::Coin),
            palette::GOAL => Some(Marker::Goal),
            _ => None,
        }
    }
}

/// Stored tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Platform,
    Lava,
}

/// Result of a grid lookup, including cells outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Platform,
    Lava,
    OutOfBounds,
}

impl Cell {
    /// Out-of-bounds cells never block
    pub fn is_solid(self) -> bool {
        self == Cell::Platform
    }
}

/// Row/column address of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

/// Malformed level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level image is empty")]
    Empty,
    #[error("pixel buffer holds {got} pixels, expected {expected}")]
    SizeMismatch { expected: usize, got: usize },
    #[error("level has no spawn marker")]
    MissingSpawn,
    #[error("level has {0} spawn markers, expected one")]
    MultipleSpawns(usize),
    #[error("level has no goal marker")]
    MissingGoal,
    #[error("level has {0} goal markers, expected one")]
    MultipleGoals(usize),
    #[error("failed to decode level image: {0}")]
    Decode(#[from] image::ImageError),
}

/// The tile grid of one loaded level
#[derive(Debug, Clone)]
pub struct TileWorld {
    tiles: Vec<Tile>,
    rows: usize,
    cols: usize,
    tile_size: f32,
    map_w: f32,
    map_h: f32,
    spawn: GridPos,
    goal: GridPos,
    coins: Vec<GridPos>,
}

impl TileWorld {
    /// Scan a bitmap into a world whose rows fill `viewport_height`.
    ///
    /// Exactly one spawn and one goal marker are required.
    pub fn from_image(image: &LevelImage, viewport_height: f32) -> Result<Self, LevelError> {
        let (rows, cols) = (image.height, image.width);
        if rows == 0 || cols == 0 {
            return Err(LevelError::Empty);
        }
        if image.pixels.len() != rows * cols {
            return Err(LevelError::SizeMismatch {
                expected: rows * cols,
                got: image.pixels.len(),
            });
        }

        let mut tiles = vec![Tile::Empty; rows * cols];
        let mut spawns = Vec::new();
        let mut goals = Vec::new();
        let mut coins = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                let idx = row * cols + col;
                let pos = GridPos { row, col };
                match Marker::from_rgb(image.pixels[idx]) {
                    Some(Marker::Platform) => tiles[idx] = Tile::Platform,
                    Some(Marker::Lava) => tiles[idx] = Tile::Lava,
                    Some(Marker::Spawn) => spawns.push(pos),
                    Some(Marker::Coin) => coins.push(pos),
                    Some(Marker::Goal) => goals.push(pos),
                    None => {}
                }
            }
        }

        let spawn = match spawns.as_slice() {
            [] => return Err(LevelError::MissingSpawn),
            [one] => *one,
            many => return Err(LevelError::MultipleSpawns(many.len())),
        };
        let goal = match goals.as_slice() {
            [] => return Err(LevelError::MissingGoal),
            [one] => *one,
            many => return Err(LevelError::MultipleGoals(many.len())),
        };

        // Derived together so a world never carries a stale size
        let tile_size = viewport_height / rows as f32;
        Ok(Self {
            tiles,
            rows,
            cols,
            tile_size,
            map_w: cols as f32 * tile_size,
            map_h: rows as f32 * tile_size,
            spawn,
            goal,
            coins,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Edge length of a cell in pixels
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World width in pixels
    pub fn map_w(&self) -> f32 {
        self.map_w
    }

    /// World height in pixels
    pub fn map_h(&self) -> f32 {
        self.map_h
    }

    pub fn spawn(&self) -> GridPos {
        self.spawn
    }

    pub fn goal(&self) -> GridPos {
        self.goal
    }

    /// Coin cells in scan order
    pub fn coins(&self) -> &[GridPos] {
        &self.coins
    }

    /// Classify a cell; negative or too-large indices are out of bounds
    pub fn classify(&self, row: i64, col: i64) -> Cell {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return Cell::OutOfBounds;
        }
        match self.tiles[row as usize * self.cols + col as usize] {
            Tile::Empty => Cell::Empty,
            Tile::Platform => Cell::Platform,
            Tile::Lava => Cell::Lava,
        }
    }

    /// Cell index containing a pixel coordinate
    #[inline]
    pub fn index_of(&self, v: f32) -> i64 {
        (v / self.tile_size).floor() as i64
    }

    /// Classify the cell under a pixel position
    pub fn cell_at(&self, p: Vec2) -> Cell {
        self.classify(self.index_of(p.y), self.index_of(p.x))
    }

    pub fn is_platform(&self, row: i64, col: i64) -> bool {
        self.classify(row, col).is_solid()
    }

    /// Indices of every cell a half-open pixel span `[lo, hi)` touches
    pub fn span(&self, lo: f32, hi: f32) -> std::ops::RangeInclusive<i64> {
        let first = self.index_of(lo);
        let last = ((hi / self.tile_size).ceil() as i64 - 1).max(first);
        first..=last
    }

    /// Whether a rectangle overlaps any lava cell
    pub fn rect_touches_lava(&self, pos: Vec2, size: Vec2) -> bool {
        self.span(pos.y, pos.y + size.y).any(|row| {
            self.span(pos.x, pos.x + size.x)
                .any(|col| self.classify(row, col) == Cell::Lava)
        })
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, cell: GridPos) -> Vec2 {
        Vec2::new(cell.col as f32, cell.row as f32) * self.tile_size
    }

    /// Centre pixel of a cell
    pub fn cell_center(&self, cell: GridPos) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.tile_size / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(rows: &[&str]) -> TileWorld {
        TileWorld::from_image(&LevelImage::from_rows(rows), 100.0 * rows.len() as f32).unwrap()
    }

    #[test]
    fn test_scan_markers() {
        let w = world(&["S..C", "..~G", "####"]);
        assert_eq!(w.rows(), 3);
        assert_eq!(w.cols(), 4);
        assert_eq!(w.tile_size(), 100.0);
        assert_eq!(w.map_w(), 400.0);
        assert_eq!(w.map_h(), 300.0);
        assert_eq!(w.spawn(), GridPos { row: 0, col: 0 });
        assert_eq!(w.goal(), GridPos { row: 1, col: 3 });
        assert_eq!(w.coins(), &[GridPos { row: 0, col: 3 }]);
        assert_eq!(w.classify(2, 1), Cell::Platform);
        assert_eq!(w.classify(1, 2), Cell::Lava);
        // Markers are empty tiles
        assert_eq!(w.classify(0, 0), Cell::Empty);
        assert_eq!(w.classify(0, 3), Cell::Empty);
    }

    #[test]
    fn test_out_of_bounds_never_solid() {
        let w = world(&["S..G", "####"]);
        assert_eq!(w.classify(-1, 0), Cell::OutOfBounds);
        assert_eq!(w.classify(0, 4), Cell::OutOfBounds);
        assert_eq!(w.classify(2, 0), Cell::OutOfBounds);
        assert!(!w.is_platform(5, -3));
        assert!(!w.cell_at(Vec2::new(-10.0, 150.0)).is_solid());
    }

    #[test]
    fn test_unknown_colours_are_empty() {
        let mut image = LevelImage::from_rows(&["S.G", "###"]);
        image.pixels[1] = [1, 0, 0]; // near-black is not black
        let w = TileWorld::from_image(&image, 200.0).unwrap();
        assert_eq!(w.classify(0, 1), Cell::Empty);
    }

    #[test]
    fn test_spawn_and_goal_validation() {
        let err = TileWorld::from_image(&LevelImage::from_rows(&["..G", "###"]), 100.0);
        assert!(matches!(err, Err(LevelError::MissingSpawn)));
        let err = TileWorld::from_image(&LevelImage::from_rows(&["SSG", "###"]), 100.0);
        assert!(matches!(err, Err(LevelError::MultipleSpawns(2))));
        let err = TileWorld::from_image(&LevelImage::from_rows(&["S..", "###"]), 100.0);
        assert!(matches!(err, Err(LevelError::MissingGoal)));
        let err = TileWorld::from_image(&LevelImage::from_rows(&["SGG", "###"]), 100.0);
        assert!(matches!(err, Err(LevelError::MultipleGoals(2))));
    }

    #[test]
    fn test_size_mismatch_and_empty() {
        let mut image = LevelImage::from_rows(&["SG"]);
        image.pixels.pop();
        assert!(matches!(
            TileWorld::from_image(&image, 10.0),
            Err(LevelError::SizeMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            TileWorld::from_image(&LevelImage::from_rows(&[]), 10.0),
            Err(LevelError::Empty)
        ));
    }

    #[test]
    fn test_span_is_half_open() {
        let w = world(&["S..G", "####"]);
        assert_eq!(w.span(0.0, 100.0), 0..=0);
        assert_eq!(w.span(50.0, 150.0), 0..=1);
        assert_eq!(w.span(99.0, 99.5), 0..=0);
    }

    #[test]
    fn test_rect_touches_lava() {
        let w = world(&["S~.G", "####"]);
        assert!(w.rect_touches_lava(Vec2::new(90.0, 10.0), Vec2::new(20.0, 20.0)));
        assert!(!w.rect_touches_lava(Vec2::new(10.0, 10.0), Vec2::new(80.0, 80.0)));
    }
}
