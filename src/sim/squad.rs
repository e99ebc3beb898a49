//! The player's squad: soldier count and lateral position
//!
//! Both quantities ease toward targets so the renderer sees a visible
//! drain/gain and glide instead of jumps. Game rules read the committed
//! target count; the displayed count only trails it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{clamp_soldiers, clamp_to_track};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    /// Count currently shown (moves at most `SOLDIER_STEP_PER_TICK` per tick)
    soldier_count: u32,
    /// Committed count the display is moving toward
    target_count: u32,
    x_position: f64,
    target_x: f64,
}

impl Default for Squad {
    fn default() -> Self {
        Self::new(START_SOLDIERS)
    }
}

impl Squad {
    pub fn new(soldiers: u32) -> Self {
        let soldiers = soldiers.min(MAX_SOLDIERS);
        Self {
            soldier_count: soldiers,
            target_count: soldiers,
            x_position: 0.0,
            target_x: 0.0,
        }
    }

    /// Set the committed count (clamped to `[0, MAX_SOLDIERS]`).
    /// The displayed count catches up over the following ticks.
    pub fn set_soldier_count(&mut self, count: i64) {
        self.target_count = clamp_soldiers(count);
    }

    /// Displayed (interpolated) soldier count
    pub fn soldier_count(&self) -> u32 {
        self.soldier_count
    }

    /// Committed soldier count
    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Set the steering target, clamped to the track
    pub fn set_x_position(&mut self, x: f64, track_width: f64) {
        self.target_x = clamp_to_track(x, track_width);
    }

    pub fn x_position(&self) -> f64 {
        self.x_position
    }

    pub fn target_x(&self) -> f64 {
        self.target_x
    }

    /// Advance easing by `dt` seconds
    pub fn update(&mut self, dt: f64, track_width: f64) {
        let move_factor = SQUAD_MOVE_RATE * dt;
        self.x_position += (self.target_x - self.x_position) * move_factor;
        self.x_position = clamp_to_track(self.x_position, track_width);

        if self.soldier_count < self.target_count {
            let step = (self.target_count - self.soldier_count).min(SOLDIER_STEP_PER_TICK);
            self.soldier_count += step;
        } else if self.soldier_count > self.target_count {
            let step = (self.soldier_count - self.target_count).min(SOLDIER_STEP_PER_TICK);
            self.soldier_count -= step;
        }
    }

    /// Restore every field verbatim (used when loading a snapshot)
    pub(crate) fn restore(&mut self, displayed: u32, committed: u32, x: f64, target_x: f64) {
        self.soldier_count = displayed.min(MAX_SOLDIERS);
        self.target_count = committed.min(MAX_SOLDIERS);
        self.x_position = x;
        self.target_x = target_x;
    }
}
