//! Fixed timestep accumulator
//!
//! Turns variable animation-frame deltas into a whole number of simulation
//! steps. The environment itself never looks at wall-clock time.

use crate::config::EnvConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    step_dt: f64,
    accumulator: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FrameClock {
    pub fn new(step_dt: f64) -> Self {
        Self {
            step_dt,
            accumulator: 0.0,
        }
    }

    /// Clock stepping at the config's `tick_dt`
    pub fn for_config(config: &EnvConfig) -> Self {
        Self::new(config.tick_dt)
    }

    /// Account for `frame_dt` seconds and return how many steps to run now.
    /// Long frames are clamped and at most `MAX_SUBSTEPS` steps are released
    /// per frame; any backlog beyond that is dropped.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= self.step_dt && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step_dt;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step_dt);
        }
        steps
    }

    /// Forget any partial step (e.g. after a restart or a pause)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of a step carried over, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step_dt
    }
}
