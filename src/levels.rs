//! Level bitmaps and the level library
//!
//! Levels are loaded once, before the game loop starts. The play phase
//! rebuilds its [`TileWorld`] from the stored bitmap every time it is
//! entered.

use std::path::Path;

use crate::settings::Settings;
use crate::sim::world::{LevelError, TileWorld, palette};

/// Raw RGB level bitmap, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct LevelImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 3]>,
}

impl LevelImage {
    /// Decode a PNG (or any format the `image` crate was built with)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    /// Build a bitmap from text rows.
    ///
    /// `#` platform, `~` lava, `S` spawn, `C` coin, `G` goal; anything else is
    /// empty. Short rows are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut pixels = Vec::with_capacity(width * rows.len());
        for row in rows {
            let mut n = 0;
            for ch in row.chars() {
                pixels.push(match ch {
                    '#' => palette::PLATFORM,
                    '~' => palette::LAVA,
                    'S' => palette::SPAWN,
                    'C' => palette::COIN,
                    'G' => palette::GOAL,
                    _ => palette::EMPTY,
                });
                n += 1;
            }
            pixels.extend(std::iter::repeat_n(palette::EMPTY, width - n));
        }
        Self {
            width,
            height: rows.len(),
            pixels,
        }
    }
}

/// A playable level
#[derive(Debug, Clone)]
pub struct LevelDef {
    pub key: String,
    pub image: LevelImage,
    /// Background track; `None` keeps silence
    pub music: Option<String>,
}

/// Ordered set of validated levels
#[derive(Debug, Clone, Default)]
pub struct LevelLibrary {
    levels: Vec<LevelDef>,
}

impl LevelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a level after checking that it builds.
    ///
    /// A key that is already present is replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        image: LevelImage,
        music: Option<String>,
    ) -> Result<(), LevelError> {
        let key = key.into();
        // Viewport height does not affect validity
        TileWorld::from_image(&image, 1.0)?;
        let def = LevelDef { key, image, music };
        match self.levels.iter_mut().find(|l| l.key == def.key) {
            Some(existing) => *existing = def,
            None => self.levels.push(def),
        }
        Ok(())
    }

    /// Load every level listed in the settings. Broken levels are logged and skipped.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut library = Self::new();
        for entry in &settings.levels {
            let loaded = LevelImage::open(&entry.path)
                .and_then(|image| library.insert(entry.key.clone(), image, entry.music.clone()));
            match loaded {
                Ok(()) => log::info!("Loaded level '{}' from {}", entry.key, entry.path),
                Err(e) => log::warn!("Skipping level '{}': {}", entry.key, e),
            }
        }
        library
    }

    pub fn get(&self, key: &str) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Built-in level used when no level files are configured
pub fn demo_level() -> LevelImage {
    LevelImage::from_rows(&[
        "                                ",
        "                                ",
        "                          C     ",
        "                        ####   G",
        "          C                   ##",
        "        #####      C            ",
        "  S                ###          ",
        "                                ",
        "######  ####~~~~#######  #######",
        "######  ################ #######",
    ])
}
