//! Per-frame output for the host renderer
//!
//! Nothing here draws. A [`Frame`] lists what the active phase wants on
//! screen; turning it into pixels and text is the host's job.

use glam::Vec2;
use serde::Serialize;

use crate::scene::PhaseKind;

/// HUD values exported every play frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    pub coins: u32,
    pub total_coins: u32,
    pub character: String,
    pub level: String,
}

/// A drawable item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sprite {
    Player {
        pos: Vec2,
        size: Vec2,
        facing_right: bool,
        walking: bool,
        character: String,
    },
    Ball {
        pos: Vec2,
        radius: f32,
        angle: f32,
    },
    Coin {
        pos: Vec2,
    },
    Goal {
        pos: Vec2,
    },
    Logo {
        pos: Vec2,
        size: Vec2,
    },
    /// A list of choices with one highlighted
    Menu {
        title: String,
        options: Vec<String>,
        selected: usize,
    },
    /// End-of-run summary
    Summary {
        won: bool,
        coins: u32,
        total_coins: u32,
        time_ms: Option<u64>,
    },
}

/// Everything the active phase wants drawn this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub phase: PhaseKind,
    pub hud: Option<Hud>,
    pub sprites: Vec<Sprite>,
}

impl Frame {
    pub fn new(phase: PhaseKind) -> Self {
        Self {
            phase,
            hud: None,
            sprites: Vec::new(),
        }
    }

    /// Number of ball sprites
    pub fn ball_count(&self) -> usize {
        self.sprites
            .iter()
            .filter(|s| matches!(s, Sprite::Ball { .. }))
            .count()
    }
}

/// Format milliseconds as `m:ss`
pub fn format_clock(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}
