//! Play simulation tick
//!
//! One tick per rendered frame. Timers read the wall clock passed in as
//! `now_ms`, so a slow frame does not stretch the countdown.

use super::ball::resolve_pairs;
use super::player::PlayerCommand;
use super::state::{GameEvent, Outcome, PlayState};
use crate::audio::SoundEffect;
use crate::input::TickInput;

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    /// Reported on the tick the run is decided, never again
    pub outcome: Option<Outcome>,
}

/// Advance the play state by one tick
pub fn tick(state: &mut PlayState, input: &TickInput, now_ms: u64) -> TickOutput {
    let mut out = TickOutput::default();

    // Decided runs are frozen until the phase is replaced
    if state.finished.is_some() {
        return out;
    }

    state.time_ticks += 1;

    // --- PLAYER ---
    let step = state.player.update(input, &state.world, &state.tuning);
    if step.jumped {
        out.events.push(GameEvent::Sound(SoundEffect::Jump));
    }
    if step.hits.top {
        out.events.push(GameEvent::Sound(SoundEffect::Bonk));
    }
    for command in step.commands {
        match command {
            PlayerCommand::SpawnBall { pos, vel } => match state.spawn_ball(pos, vel, now_ms) {
                Some(id) => {
                    log::debug!("Ball {} kicked ({} active)", id, state.balls.len());
                    out.events.push(GameEvent::BallSpawned { id });
                    out.events.push(GameEvent::Sound(SoundEffect::Kick));
                }
                None => log::trace!("Kick ignored, ball cap reached"),
            },
        }
    }

    // --- BALLS ---
    let cooldown = state.rules.bounce_sound_cooldown_ms;
    let mut bounce_sound = false;
    state.balls.retain_mut(|ball| {
        let contact = ball.step(&state.world, &state.tuning);
        if contact.platform && ball.try_sound(now_ms, cooldown) {
            bounce_sound = true;
        }
        !contact.destroyed()
    });
    if bounce_sound {
        out.events.push(GameEvent::Sound(SoundEffect::Bounce));
    }

    let impacts = resolve_pairs(&mut state.balls, state.tuning.pair_restitution);
    let mut bonk = false;
    for (a, _) in impacts {
        if let Some(ball) = state.balls.iter_mut().find(|b| b.id == a) {
            bonk |= ball.try_sound(now_ms, cooldown);
        }
    }
    if bonk {
        out.events.push(GameEvent::Sound(SoundEffect::Bonk));
    }

    // --- COINS ---
    let center = state.player.center();
    let reach = state.tuning.pickup_radius;
    for (index, coin) in state.collectibles.iter_mut().enumerate() {
        if coin.pos.distance(center) < reach && coin.collect() {
            log::debug!("Coin {} collected", index);
            out.events.push(GameEvent::CoinCollected { index });
            out.events.push(GameEvent::Sound(SoundEffect::Coin));
        }
    }

    // --- WIN / LOSE ---
    let coins = state.coins_collected();
    let player = &state.player;
    let fell_out = player.pos.y > state.world.map_h();
    let burned = state.world.rect_touches_lava(player.pos, player.size);
    let timed_out = state.remaining_ms(now_ms) == 0;
    let reached_goal = player.center().distance(state.goal) < reach;

    let outcome = if fell_out || burned || timed_out {
        Some(Outcome::Lost { coins })
    } else if reached_goal {
        Some(Outcome::Won {
            coins,
            time_ms: state.elapsed_ms(now_ms),
        })
    } else {
        None
    };

    if let Some(outcome) = outcome {
        log::info!(
            "Run over on '{}' after {} ticks: {:?}",
            state.level,
            state.time_ticks,
            outcome
        );
        state.finished = Some(outcome);
        out.outcome = Some(outcome);
    }

    out
}
