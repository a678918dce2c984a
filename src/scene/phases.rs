//! The phases and their per-frame behaviour

use glam::Vec2;

use super::GameContext;
use super::transition::{Payload, PhaseKind, Transition, TransitionError};
use crate::audio::{MusicTrack, SoundEffect};
use crate::consts::*;
use crate::hud::{Frame, Sprite};
use crate::input::{Action, TickInput};
use crate::sim::{GameEvent, Logo, Outcome, PlayState, collide_logos, tick};

/// Start screen with its two bouncing logos
#[derive(Debug, Clone)]
pub struct StartScreen {
    pub logos: [Logo; 2],
    bounds: Vec2,
}

impl StartScreen {
    pub fn new(bounds: Vec2) -> Self {
        let size = Vec2::new(LOGO_WIDTH, LOGO_HEIGHT);
        Self {
            logos: [
                Logo::new(
                    bounds * 0.2,
                    Vec2::new(LOGO_SPEED, LOGO_SPEED * 0.6),
                    size,
                ),
                Logo::new(
                    bounds * 0.6,
                    Vec2::new(-LOGO_SPEED * 0.8, -LOGO_SPEED),
                    size,
                ),
            ],
            bounds,
        }
    }

    fn update(&mut self) {
        for logo in &mut self.logos {
            logo.step(self.bounds);
        }
        let [a, b] = &mut self.logos;
        collide_logos(a, b);
    }
}

/// A cycling list of choices
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub title: String,
    pub options: Vec<String>,
    pub selected: usize,
}

impl Selector {
    pub fn new(title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            options,
            selected: 0,
        }
    }

    /// Move with left/right; returns the choice on confirm
    fn handle(&mut self, input: &TickInput) -> Option<String> {
        let n = self.options.len();
        if n == 0 {
            return None;
        }
        match input.pressed {
            Some(Action::Left) => self.selected = (self.selected + n - 1) % n,
            Some(Action::Right) => self.selected = (self.selected + 1) % n,
            Some(Action::Confirm) => return self.options.get(self.selected).cloned(),
            _ => {}
        }
        None
    }

    fn sprite(&self) -> Sprite {
        Sprite::Menu {
            title: self.title.clone(),
            options: self.options.clone(),
            selected: self.selected,
        }
    }
}

/// Result screen data
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub character: String,
    pub level: String,
    pub coins: u32,
    pub total_coins: u32,
    pub time_ms: Option<u64>,
}

impl Summary {
    fn from_payload(to: PhaseKind, payload: &Payload) -> Result<Self, TransitionError> {
        Ok(Self {
            character: payload.require_character(to)?.to_string(),
            level: payload.require_level(to)?.to_string(),
            coins: payload.coins,
            total_coins: payload.total_coins,
            time_ms: payload.time_ms,
        })
    }

    fn payload(&self) -> Payload {
        Payload {
            character: Some(self.character.clone()),
            level: Some(self.level.clone()),
            coins: self.coins,
            total_coins: self.total_coins,
            time_ms: self.time_ms,
        }
    }
}

/// The active phase and the data it owns
#[derive(Debug, Clone)]
pub enum Phase {
    Start(StartScreen),
    CharacterSelect(Selector),
    LevelSelect { character: String, levels: Selector },
    Play(Box<PlayState>),
    GameOver(Summary),
    Win(Summary),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Start(_) => PhaseKind::Start,
            Phase::CharacterSelect(_) => PhaseKind::CharacterSelect,
            Phase::LevelSelect { .. } => PhaseKind::LevelSelect,
            Phase::Play(_) => PhaseKind::Play,
            Phase::GameOver(_) => PhaseKind::GameOver,
            Phase::Win(_) => PhaseKind::Win,
        }
    }

    /// What this phase hands to whichever phase follows it
    pub fn payload(&self) -> Payload {
        match self {
            Phase::Start(_) | Phase::CharacterSelect(_) => Payload::default(),
            Phase::LevelSelect { character, .. } => Payload {
                character: Some(character.clone()),
                ..Default::default()
            },
            Phase::Play(state) => Payload {
                character: Some(state.character.clone()),
                level: Some(state.level.clone()),
                coins: state.coins_collected(),
                total_coins: state.total_coins(),
                time_ms: None,
            },
            Phase::GameOver(summary) | Phase::Win(summary) => summary.payload(),
        }
    }

    /// Check that `payload` is enough to enter `to`, without side effects
    pub fn validate(to: PhaseKind, payload: &Payload, ctx: &GameContext) -> Result<(), TransitionError> {
        match to {
            PhaseKind::Start | PhaseKind::CharacterSelect => Ok(()),
            PhaseKind::LevelSelect => payload.require_character(to).map(|_| ()),
            PhaseKind::Play | PhaseKind::GameOver | PhaseKind::Win => {
                payload.require_character(to)?;
                let level = payload.require_level(to)?;
                if to == PhaseKind::Play && ctx.levels.get(level).is_none() {
                    return Err(TransitionError::UnknownLevel(level.to_string()));
                }
                Ok(())
            }
        }
    }

    /// Enter the start screen (cannot fail)
    pub fn enter_start(ctx: &mut GameContext) -> Phase {
        ctx.audio.play_music(&MusicTrack::Menu);
        Phase::Start(StartScreen::new(ctx.viewport()))
    }

    /// Build the phase `to` from `payload`, running its enter hook
    pub fn enter(to: PhaseKind, payload: &Payload, ctx: &mut GameContext) -> Result<Phase, TransitionError> {
        let phase = match to {
            PhaseKind::Start => return Ok(Self::enter_start(ctx)),
            PhaseKind::CharacterSelect => {
                ctx.audio.play_music(&MusicTrack::Menu);
                Phase::CharacterSelect(Selector::new(
                    "Choose your character",
                    ctx.settings.characters.clone(),
                ))
            }
            PhaseKind::LevelSelect => {
                let character = payload.require_character(to)?.to_string();
                ctx.audio.play_music(&MusicTrack::Menu);
                let keys = ctx.levels.keys().map(str::to_string).collect();
                Phase::LevelSelect {
                    character,
                    levels: Selector::new("Choose a level", keys),
                }
            }
            PhaseKind::Play => {
                let character = payload.require_character(to)?;
                let key = payload.require_level(to)?;
                let now = ctx.now_ms();
                let seed = ctx.next_seed();
                let def = ctx
                    .levels
                    .get(key)
                    .ok_or_else(|| TransitionError::UnknownLevel(key.to_string()))?;
                let state = PlayState::new(character, key, &def.image, &ctx.settings, now, seed)?;
                let music = def.music.clone();
                log::info!(
                    "Level '{}' loaded: {}x{} tiles of {:.1}px, {} coins",
                    key,
                    state.world.cols(),
                    state.world.rows(),
                    state.world.tile_size(),
                    state.total_coins()
                );
                if let Some(track) = music {
                    ctx.audio.play_music(&MusicTrack::Level(track));
                }
                Phase::Play(Box::new(state))
            }
            PhaseKind::GameOver => {
                let summary = Summary::from_payload(to, payload)?;
                ctx.audio.play(SoundEffect::Lose);
                Phase::GameOver(summary)
            }
            PhaseKind::Win => {
                let summary = Summary::from_payload(to, payload)?;
                ctx.audio.play(SoundEffect::Win);
                Phase::Win(summary)
            }
        };
        Ok(phase)
    }

    /// Exit hook; entities owned by the phase go away with it
    pub fn exit(&mut self, _ctx: &mut GameContext) {
        if let Phase::Play(state) = self {
            log::debug!(
                "Leaving '{}' after {} ticks, discarding {} balls",
                state.level,
                state.time_ticks,
                state.balls.len()
            );
        }
    }

    /// Per-frame update; returns the transition the phase asks for
    pub fn update(&mut self, ctx: &mut GameContext, input: &TickInput) -> Option<Transition> {
        match self {
            Phase::Start(screen) => {
                screen.update();
                input.pressed(Action::Confirm).then_some(Transition::Begin)
            }
            Phase::CharacterSelect(selector) => {
                selector.handle(input).map(Transition::SelectCharacter)
            }
            Phase::LevelSelect { levels, .. } => levels.handle(input).map(Transition::SelectLevel),
            Phase::Play(state) => {
                if input.pressed(Action::Restart) {
                    return Some(Transition::Retry);
                }
                let out = tick(state, input, ctx.now_ms());
                for event in out.events {
                    if let GameEvent::Sound(effect) = event {
                        ctx.audio.play(effect);
                    }
                }
                out.outcome.map(|outcome| match outcome {
                    Outcome::Lost { coins } => Transition::Lose { coins },
                    Outcome::Won { coins, time_ms } => Transition::Win { coins, time_ms },
                })
            }
            Phase::GameOver(_) | Phase::Win(_) => {
                (input.pressed(Action::Restart) || input.pressed(Action::Confirm))
                    .then_some(Transition::Retry)
            }
        }
    }

    /// Describe the frame. Expired balls are culled here, not in the tick.
    pub fn draw(&mut self, ctx: &GameContext) -> Frame {
        let mut frame = Frame::new(self.kind());
        match self {
            Phase::Start(screen) => {
                frame.sprites.extend(screen.logos.iter().map(|l| Sprite::Logo {
                    pos: l.pos,
                    size: l.size,
                }));
            }
            Phase::CharacterSelect(selector) | Phase::LevelSelect { levels: selector, .. } => {
                frame.sprites.push(selector.sprite());
            }
            Phase::Play(state) => {
                let now = ctx.now_ms();
                let culled = state.cull_expired(now);
                if culled > 0 {
                    log::debug!("Culled {} expired balls", culled);
                }
                frame.hud = Some(state.hud(now));
                frame.sprites = state.sprites();
            }
            Phase::GameOver(summary) | Phase::Win(summary) => {
                frame.sprites.push(Sprite::Summary {
                    won: frame.phase == PhaseKind::Win,
                    coins: summary.coins,
                    total_coins: summary.total_coins,
                    time_ms: summary.time_ms,
                });
            }
        }
        frame
    }
}
