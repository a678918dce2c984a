//! Input snapshot
//!
//! Device callbacks (keyboard, touch buttons, pointer clicks) write into an
//! [`InputLatch`]. Once per tick the latch is sampled into an immutable
//! [`TickInput`] that every system reads. Edge-triggered flags are cleared by
//! the sampling itself, so nothing downstream has to reset them.

use serde::{Deserialize, Serialize};

/// Logical actions, independent of the physical control that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    Kick,
    Restart,
    /// Return to the start screen. Handled by the scene machine itself.
    Menu,
    Confirm,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump held (jumping is gated on being grounded, not on the edge)
    pub jump: bool,
    /// A kick fired this tick (touch press or key event)
    pub kick: bool,
    /// The one discrete key press of this frame, if any
    pub pressed: Option<Action>,
}

impl TickInput {
    /// Horizontal intent: -1, 0 or +1
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Whether `action` was the discrete press of this frame
    pub fn pressed(&self, action: Action) -> bool {
        self.pressed == Some(action)
    }
}

/// Accumulates device events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    key_left: bool,
    key_right: bool,
    key_jump: bool,
    touch_left: bool,
    touch_right: bool,
    touch_jump: bool,
    touch_kick: bool,
    touch_kick_held: bool,
    pressed: Option<Action>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard key went down. Also records the frame's discrete press.
    pub fn key_down(&mut self, action: Action) {
        match action {
            Action::Left => self.key_left = true,
            Action::Right => self.key_right = true,
            Action::Jump => self.key_jump = true,
            _ => {}
        }
        self.pressed = Some(action);
    }

    pub fn key_up(&mut self, action: Action) {
        match action {
            Action::Left => self.key_left = false,
            Action::Right => self.key_right = false,
            Action::Jump => self.key_jump = false,
            _ => {}
        }
    }

    /// On-screen button state changed
    pub fn touch(&mut self, action: Action, down: bool) {
        match action {
            Action::Left => self.touch_left = down,
            Action::Right => self.touch_right = down,
            Action::Jump => self.touch_jump = down,
            // Kick is edge-triggered: only a release-to-press change latches
            Action::Kick => {
                if down && !self.touch_kick_held {
                    self.touch_kick = true;
                }
                self.touch_kick_held = down;
            }
            other if down => self.pressed = Some(other),
            _ => {}
        }
    }

    /// Pointer click maps to confirm
    pub fn click(&mut self) {
        self.pressed = Some(Action::Confirm);
    }

    /// Sample the snapshot for this tick and clear edge-triggered state
    pub fn sample(&mut self) -> TickInput {
        let pressed = self.pressed.take();
        let touch_kick = std::mem::take(&mut self.touch_kick);
        TickInput {
            left: self.key_left || self.touch_left,
            right: self.key_right || self.touch_right,
            jump: self.key_jump || self.touch_jump,
            kick: touch_kick || pressed == Some(Action::Kick),
            pressed,
        }
    }
}
