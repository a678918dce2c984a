//! Play session state
//!
//! Everything owned by one attempt at a level: the world, the player, the
//! balls and the coins. Dropped wholesale on restart or menu return.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::player::Player;
use super::world::{LevelError, TileWorld};
use crate::audio::SoundEffect;
use crate::hud::{Hud, Sprite};
use crate::levels::LevelImage;
use crate::settings::{Rules, Settings};
use crate::tuning::Tuning;

/// Something the host should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    BallSpawned { id: u32 },
    CoinCollected { index: usize },
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Lost { coins: u32 },
    Won { coins: u32, time_ms: u64 },
}

/// A coin on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    collected: bool,
}

impl Collectible {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected. True only the first time.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

/// State of the active play phase
#[derive(Debug, Clone)]
pub struct PlayState {
    pub character: String,
    pub level: String,
    pub world: TileWorld,
    pub tuning: Tuning,
    pub rules: Rules,
    pub player: Player,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    pub collectibles: Vec<Collectible>,
    /// Centre of the goal cell
    pub goal: Vec2,
    pub started_ms: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the run is decided; the tick stops advancing afterwards
    pub finished: Option<Outcome>,
    rng: Pcg32,
    next_id: u32,
}

impl PlayState {
    /// Build a fresh session: new world, player at spawn, no balls, all coins uncollected
    pub fn new(
        character: impl Into<String>,
        level: impl Into<String>,
        image: &LevelImage,
        settings: &Settings,
        now_ms: u64,
        seed: u64,
    ) -> Result<Self, LevelError> {
        let world = TileWorld::from_image(image, settings.viewport_height)?;
        let tuning = Tuning::new(&settings.physics, &settings.rules, world.tile_size());
        let player = Player::spawn(&world, tuning.player_size);
        let collectibles = world
            .coins()
            .iter()
            .map(|&cell| Collectible::new(world.cell_center(cell)))
            .collect();
        let goal = world.cell_center(world.goal());

        Ok(Self {
            character: character.into(),
            level: level.into(),
            world,
            tuning,
            rules: settings.rules.clone(),
            player,
            balls: Vec::new(),
            collectibles,
            goal,
            started_ms: now_ms,
            time_ticks: 0,
            finished: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn coins_collected(&self) -> u32 {
        self.collectibles.iter().filter(|c| c.is_collected()).count() as u32
    }

    pub fn total_coins(&self) -> u32 {
        self.collectibles.len() as u32
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.rules
            .time_limit_ms
            .saturating_sub(self.elapsed_ms(now_ms))
    }

    /// Add a ball unless the population cap is reached
    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2, now_ms: u64) -> Option<u32> {
        if self.balls.len() >= self.rules.max_balls {
            return None;
        }
        let id = self.next_entity_id();
        let spin = if self.tuning.max_spin > 0.0 {
            self.rng
                .random_range(-self.tuning.max_spin..=self.tuning.max_spin)
        } else {
            0.0
        };
        // Ids only grow, so pushing keeps the list sorted
        self.balls.push(Ball::new(
            id,
            pos,
            vel,
            self.tuning.ball_radius,
            spin,
            now_ms,
        ));
        Some(id)
    }

    /// Drop balls past their lifetime; returns how many were removed
    pub fn cull_expired(&mut self, now_ms: u64) -> usize {
        let before = self.balls.len();
        let lifetime = self.rules.ball_lifetime_ms;
        self.balls.retain(|b| !b.expired(now_ms, lifetime));
        before - self.balls.len()
    }

    pub fn hud(&self, now_ms: u64) -> Hud {
        Hud {
            elapsed_ms: self.elapsed_ms(now_ms),
            remaining_ms: self.remaining_ms(now_ms),
            coins: self.coins_collected(),
            total_coins: self.total_coins(),
            character: self.character.clone(),
            level: self.level.clone(),
        }
    }

    /// Entity sprites, back to front
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites = Vec::with_capacity(self.balls.len() + self.collectibles.len() + 2);
        sprites.push(Sprite::Goal { pos: self.goal });
        sprites.extend(
            self.collectibles
                .iter()
                .filter(|c| !c.is_collected())
                .map(|c| Sprite::Coin { pos: c.pos }),
        );
        sprites.extend(self.balls.iter().map(|b| Sprite::Ball {
            pos: b.pos,
            radius: b.radius,
            angle: b.angle,
        }));
        sprites.push(Sprite::Player {
            pos: self.player.pos,
            size: self.player.size,
            facing_right: self.player.facing_right,
            walking: self.player.walking,
            character: self.character.clone(),
        });
        sprites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PlayState {
        let image = LevelImage::from_rows(&["S.C.C..G", "########"]);
        PlayState::new("fox", "tiny", &image, &Settings::default(), 1_000, 7).unwrap()
    }

    #[test]
    fn test_new_session() {
        let s = state();
        assert_eq!(s.total_coins(), 2);
        assert_eq!(s.coins_collected(), 0);
        assert!(s.balls.is_empty());
        assert_eq!(s.world.tile_size(), 270.0);
        assert_eq!(s.remaining_ms(1_000), 120_000);
        assert_eq!(s.remaining_ms(200_000), 0);
        assert!(s.finished.is_none());
    }

    #[test]
    fn test_collect_once() {
        let mut coin = Collectible::new(Vec2::ZERO);
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.is_collected());
    }

    #[test]
    fn test_spawn_ball_respects_cap() {
        let mut s = state();
        s.rules.max_balls = 3;
        for _ in 0..3 {
            assert!(s.spawn_ball(Vec2::ZERO, Vec2::ZERO, 0).is_some());
        }
        assert_eq!(s.spawn_ball(Vec2::ZERO, Vec2::ZERO, 0), None);
        assert_eq!(s.balls.len(), 3);
        let ids: Vec<u32> = s.balls.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_spin_is_bounded() {
        let mut s = state();
        for _ in 0..50 {
            s.spawn_ball(Vec2::ZERO, Vec2::ZERO, 0);
        }
        let max = s.tuning.max_spin;
        assert!(s.balls.iter().all(|b| b.spin.abs() <= max));
    }

    #[test]
    fn test_cull_expired() {
        let mut s = state();
        s.spawn_ball(Vec2::ZERO, Vec2::ZERO, 0);
        s.spawn_ball(Vec2::ZERO, Vec2::ZERO, 5_000);
        assert_eq!(s.cull_expired(10_000), 0);
        assert_eq!(s.cull_expired(10_001), 1);
        assert_eq!(s.balls[0].born_ms, 5_000);
    }

    #[test]
    fn test_sprites_hide_collected_coins() {
        let mut s = state();
        s.collectibles[0].collect();
        let coins = s
            .sprites()
            .iter()
            .filter(|sp| matches!(sp, Sprite::Coin { .. }))
            .count();
        assert_eq!(coins, 1);
    }
}
