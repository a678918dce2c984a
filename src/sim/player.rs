//! Player controller
//!
//! Grounded/airborne is carried by the `grounded` flag alone. The controller
//! never touches the ball list: a kick comes back as a [`PlayerCommand`] for
//! the play state to carry out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{HitFlags, resolve_horizontal, resolve_vertical};
use super::world::TileWorld;
use crate::consts::KICK_ANGLE;
use crate::input::TickInput;
use crate::launch_direction;
use crate::tuning::Tuning;

/// Requests the controller hands up to its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    SpawnBall { pos: Vec2, vel: Vec2 },
}

/// What happened during one controller update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub hits: HitFlags,
    pub commands: Vec<PlayerCommand>,
}

/// The player's character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub facing_right: bool,
    /// Horizontal input was held this tick (drives the walk animation)
    pub walking: bool,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            facing_right: true,
            walking: false,
        }
    }

    /// Place a player with its feet on the bottom of the world's spawn cell
    pub fn spawn(world: &TileWorld, size: Vec2) -> Self {
        let cell = world.cell_origin(world.spawn());
        let tile = world.tile_size();
        let pos = Vec2::new(cell.x + (tile - size.x) / 2.0, cell.y + tile - size.y);
        Self::new(pos, size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Advance one tick. The order of the steps below is part of the feel of
    /// the game and must not change.
    pub fn update(&mut self, input: &TickInput, world: &TileWorld, tuning: &Tuning) -> PlayerStep {
        let mut step = PlayerStep::default();

        // Horizontal intent
        let dir = input.direction();
        self.walking = dir != 0.0;
        if dir != 0.0 {
            self.facing_right = dir > 0.0;
        }

        // Ease toward the target speed
        let target = dir * tuning.move_speed;
        self.vel.x += (target - self.vel.x) * tuning.blend;

        // Jump only from the ground; grounded drops immediately so holding does not repeat
        if input.jump && self.grounded {
            self.vel.y = -tuning.jump_strength;
            self.grounded = false;
            step.jumped = true;
        }

        if input.kick {
            let facing = if self.facing_right { 1.0 } else { -1.0 };
            step.commands.push(PlayerCommand::SpawnBall {
                pos: self.center(),
                vel: launch_direction(KICK_ANGLE, facing) * tuning.kick_speed,
            });
        }

        self.vel.y += tuning.gravity;
        self.vel.y = self
            .vel
            .y
            .clamp(-tuning.terminal_velocity, tuning.terminal_velocity);

        let dx = self.vel.x;
        self.pos.x += dx;
        let h = resolve_horizontal(world, &mut self.pos, &mut self.vel, self.size, dx, tuning.band);

        let dy = self.vel.y;
        self.pos.y += dy;
        // Re-evaluated below; only a landing sets it again
        self.grounded = false;
        let v = resolve_vertical(world, &mut self.pos, &mut self.vel, self.size, dy);
        if v.bottom {
            self.grounded = true;
        }

        step.hits = h.merge(v);
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelImage;
    use crate::settings::Settings;

    fn setup(rows: &[&str]) -> (TileWorld, Tuning) {
        let settings = Settings::default();
        let world =
            TileWorld::from_image(&LevelImage::from_rows(rows), 20.0 * rows.len() as f32).unwrap();
        let tuning = Tuning::new(&settings.physics, &settings.rules, world.tile_size());
        (world, tuning)
    }

    fn settle(player: &mut Player, world: &TileWorld, tuning: &Tuning) {
        for _ in 0..60 {
            player.update(&TickInput::default(), world, tuning);
        }
    }

    #[test]
    fn test_spawn_stands_on_cell_bottom() {
        let (world, tuning) = setup(&["....G", "..S..", "#####"]);
        let player = Player::spawn(&world, tuning.player_size);
        assert_eq!(player.pos.y + player.size.y, 40.0);
        assert!((player.center().x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_falls_and_lands() {
        let (world, tuning) = setup(&["..S.G", ".....", ".....", "#####"]);
        let mut player = Player::spawn(&world, tuning.player_size);
        settle(&mut player, &world, &tuning);
        assert!(player.grounded);
        assert_eq!(player.vel.y, 0.0);
        assert!((player.pos.y + player.size.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_blends_toward_target() {
        let (world, tuning) = setup(&["S...........G", "#############"]);
        let mut player = Player::spawn(&world, tuning.player_size);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        player.update(&input, &world, &tuning);
        assert!((player.vel.x - tuning.move_speed * 0.2).abs() < 1e-5);
        player.update(&input, &world, &tuning);
        assert!((player.vel.x - tuning.move_speed * 0.36).abs() < 1e-5);
        assert!(player.walking && player.facing_right);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        player.update(&left, &world, &tuning);
        assert!(!player.facing_right);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let (world, tuning) = setup(&["S...G", ".....", ".....", "#####"]);
        let mut player = Player::spawn(&world, tuning.player_size);
        settle(&mut player, &world, &tuning);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let step = player.update(&jump, &world, &tuning);
        assert!(step.jumped);
        assert!(!player.grounded);
        assert!((player.vel.y - (-tuning.jump_strength + tuning.gravity)).abs() < 1e-5);

        // Holding jump in the air changes nothing beyond gravity
        let before = player.vel.y;
        let step = player.update(&jump, &world, &tuning);
        assert!(!step.jumped);
        assert!((player.vel.y - (before + tuning.gravity)).abs() < 1e-5);
    }

    #[test]
    fn test_kick_emits_spawn_command() {
        let (world, tuning) = setup(&["S...G", "#####"]);
        let mut player = Player::spawn(&world, tuning.player_size);
        player.facing_right = false;
        let center = player.center();
        let kick = TickInput {
            kick: true,
            ..Default::default()
        };
        let step = player.update(&kick, &world, &tuning);
        let [PlayerCommand::SpawnBall { pos, vel }] = step.commands.as_slice() else {
            panic!("expected one spawn command, got {:?}", step.commands);
        };
        assert_eq!(*pos, center);
        assert!(vel.x < 0.0 && vel.y < 0.0);
        assert!((vel.x.abs() - vel.y.abs()).abs() < 1e-4);
        assert!((vel.length() - tuning.kick_speed).abs() < 1e-4);
    }

    #[test]
    fn test_terminal_velocity_is_symmetric() {
        let (world, mut tuning) = setup(&["S...G", ".....", "....."]);
        tuning.jump_strength = tuning.terminal_velocity * 3.0;
        let mut player = Player::spawn(&world, tuning.player_size);
        player.grounded = true;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        player.update(&jump, &world, &tuning);
        assert_eq!(player.vel.y, -tuning.terminal_velocity);

        for _ in 0..200 {
            player.update(&TickInput::default(), &world, &tuning);
        }
        assert_eq!(player.vel.y, tuning.terminal_velocity);
    }

    #[test]
    fn test_head_bump_reports_top_hit() {
        let (world, tuning) = setup(&["#####", "S...G", ".....", "#####"]);
        let mut player = Player::spawn(&world, tuning.player_size);
        settle(&mut player, &world, &tuning);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let mut bumped = false;
        for _ in 0..20 {
            bumped |= player.update(&jump, &world, &tuning).hits.top;
        }
        assert!(bumped);
        assert!(player.pos.y >= 20.0);
    }
}
