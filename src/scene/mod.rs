//! Scene state machine
//!
//! Exactly one phase is active. The machine owns it together with the
//! [`GameContext`], forwards update and draw, and performs transitions:
//! validate, stop audio, exit hook, enter hook.

pub mod phases;
pub mod transition;

pub use phases::{Phase, Selector, StartScreen, Summary};
pub use transition::{Payload, PhaseKind, Transition, TransitionError, target};

use glam::Vec2;

use crate::audio::AudioManager;
use crate::clock::Clock;
use crate::hud::Frame;
use crate::input::{Action, TickInput};
use crate::levels::LevelLibrary;
use crate::settings::Settings;
use crate::sim::PlayState;

/// Services shared by every phase
pub struct GameContext {
    pub settings: Settings,
    pub levels: LevelLibrary,
    pub audio: AudioManager,
    clock: Box<dyn Clock>,
    /// Plays started so far; mixed into each session's seed
    sessions: u64,
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("levels", &self.levels.len())
            .field("audio", &self.audio)
            .field("sessions", &self.sessions)
            .finish()
    }
}

impl GameContext {
    pub fn new(
        settings: Settings,
        levels: LevelLibrary,
        mut audio: AudioManager,
        clock: Box<dyn Clock>,
    ) -> Self {
        audio.apply_settings(&settings);
        if !audio.has_backend() {
            log::warn!("No audio backend, sound is disabled");
        }
        Self {
            settings,
            levels,
            audio,
            clock,
            sessions: 0,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.settings.viewport_width, self.settings.viewport_height)
    }

    /// Seed for the next play session
    pub fn next_seed(&mut self) -> u64 {
        self.sessions += 1;
        self.settings
            .seed
            .wrapping_add(self.sessions.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }
}

/// Owns the active phase and drives transitions between phases
#[derive(Debug)]
pub struct SceneMachine {
    phase: Phase,
    ctx: GameContext,
}

impl SceneMachine {
    /// Start at the start screen
    pub fn new(mut ctx: GameContext) -> Self {
        let phase = Phase::enter_start(&mut ctx);
        log::info!("Game started with {} levels", ctx.levels.len());
        Self { phase, ctx }
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    /// The running session, if the active phase is Play
    pub fn play_state(&self) -> Option<&PlayState> {
        match &self.phase {
            Phase::Play(state) => Some(state),
            _ => None,
        }
    }

    pub fn play_state_mut(&mut self) -> Option<&mut PlayState> {
        match &mut self.phase {
            Phase::Play(state) => Some(state),
            _ => None,
        }
    }

    /// Update the active phase with this tick's input
    pub fn update(&mut self, input: &TickInput) {
        // Menu is global and never reaches the phase
        if input.pressed(Action::Menu) {
            if self.kind() != PhaseKind::Start {
                self.request_logged(Transition::ReturnToStart);
            }
            return;
        }
        if let Some(action) = self.phase.update(&mut self.ctx, input) {
            self.request_logged(action);
        }
    }

    /// Draw the active phase
    pub fn draw(&mut self) -> Frame {
        self.phase.draw(&self.ctx)
    }

    /// One full frame: update then draw
    pub fn frame(&mut self, input: &TickInput) -> Frame {
        self.update(input);
        self.draw()
    }

    /// Perform a transition.
    ///
    /// Illegal actions and missing payload are rejected before anything
    /// changes. If the incoming phase fails to build after the outgoing one
    /// has exited, the machine falls back to Start and returns the error.
    pub fn request(&mut self, action: Transition) -> Result<PhaseKind, TransitionError> {
        let from = self.phase.kind();
        let to = target(from, &action)?;
        let payload = self.phase.payload().apply(&action);
        Phase::validate(to, &payload, &self.ctx)?;

        self.ctx.audio.stop_all();
        self.phase.exit(&mut self.ctx);
        match Phase::enter(to, &payload, &mut self.ctx) {
            Ok(phase) => {
                self.phase = phase;
                log::info!("{:?} -> {:?} ({})", from, to, action.name());
                Ok(to)
            }
            Err(e) => {
                log::error!("Entering {:?} failed: {}; back to start", to, e);
                self.phase = Phase::enter_start(&mut self.ctx);
                Err(e)
            }
        }
    }

    fn request_logged(&mut self, action: Transition) {
        if let Err(e) = self.request(action) {
            log::warn!("Transition ignored: {}", e);
        }
    }
}
