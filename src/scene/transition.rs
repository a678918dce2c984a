//! Transition table
//!
//! Every legal phase change is listed in [`target`]; anything not listed is
//! rejected before the machine touches its current phase.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::LevelError;

/// The closed set of phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Start,
    CharacterSelect,
    LevelSelect,
    Play,
    GameOver,
    Win,
}

/// Named transitions and the data they carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Leave the start screen
    Begin,
    SelectCharacter(String),
    SelectLevel(String),
    Lose { coins: u32 },
    Win { coins: u32, time_ms: u64 },
    /// Play the same level again with the same character
    Retry,
    ReturnToStart,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Begin => "begin",
            Transition::SelectCharacter(_) => "select-character",
            Transition::SelectLevel(_) => "select-level",
            Transition::Lose { .. } => "lose",
            Transition::Win { .. } => "win",
            Transition::Retry => "retry",
            Transition::ReturnToStart => "return-to-start",
        }
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("no '{action}' transition from {from:?}")]
    Illegal {
        from: PhaseKind,
        action: &'static str,
    },
    #[error("cannot enter {to:?} without a {field}")]
    MissingPayload {
        to: PhaseKind,
        field: &'static str,
    },
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
    #[error("level failed to load: {0}")]
    Level(#[from] LevelError),
}

/// Look up where `action` leads from `from`
pub fn target(from: PhaseKind, action: &Transition) -> Result<PhaseKind, TransitionError> {
    use PhaseKind::*;
    let to = match (from, action) {
        (Start, Transition::Begin) => CharacterSelect,
        (CharacterSelect, Transition::SelectCharacter(_)) => LevelSelect,
        (LevelSelect, Transition::SelectLevel(_)) => Play,
        (Play, Transition::Lose { .. }) => GameOver,
        (Play, Transition::Win { .. }) => Win,
        (Play | GameOver | Win, Transition::Retry) => Play,
        (CharacterSelect | LevelSelect | Play | GameOver | Win, Transition::ReturnToStart) => Start,
        _ => {
            return Err(TransitionError::Illegal {
                from,
                action: action.name(),
            });
        }
    };
    Ok(to)
}

/// Data handed from one phase to the next
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub character: Option<String>,
    pub level: Option<String>,
    pub coins: u32,
    pub total_coins: u32,
    pub time_ms: Option<u64>,
}

impl Payload {
    /// Fold the transition's own data into the outgoing phase's payload
    pub fn apply(mut self, action: &Transition) -> Self {
        match action {
            Transition::Begin | Transition::ReturnToStart => return Payload::default(),
            Transition::SelectCharacter(c) => self.character = Some(c.clone()),
            Transition::SelectLevel(l) => self.level = Some(l.clone()),
            Transition::Lose { coins } => {
                self.coins = *coins;
                self.time_ms = None;
            }
            Transition::Win { coins, time_ms } => {
                self.coins = *coins;
                self.time_ms = Some(*time_ms);
            }
            Transition::Retry => {
                self.coins = 0;
                self.time_ms = None;
            }
        }
        self
    }

    pub fn require_character(&self, to: PhaseKind) -> Result<&str, TransitionError> {
        self.character
            .as_deref()
            .ok_or(TransitionError::MissingPayload {
                to,
                field: "character",
            })
    }

    pub fn require_level(&self, to: PhaseKind) -> Result<&str, TransitionError> {
        self.level.as_deref().ok_or(TransitionError::MissingPayload {
            to,
            field: "level",
        })
    }
}
