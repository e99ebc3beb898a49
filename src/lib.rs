//! Gate Rush - deterministic core of a lane-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (squad, gates, zombies, environment)
//! - `bots`: Pluggable AI players driven by observations
//! - `config`: Tunable environment parameters
//! - `highscores`: Run leaderboard
//! - `web`: WebAssembly surface for the browser renderer (wasm32 only)

pub mod bots;
pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bots::{Bot, BotKind, GreedyGateBot, RandomBot};
pub use config::EnvConfig;
pub use error::{ConfigError, StateError};
pub use highscores::HighScores;
pub use sim::{
    BotAction, EpisodeSummary, GameEnvironment, GameState, Observation, SeededRng, StepResult,
    run_episode,
};

/// Game configuration constants
pub mod consts {
    /// Hard cap on squad size
    pub const MAX_SOLDIERS: u32 = 500;
    /// Squad size at the start of an episode
    pub const START_SOLDIERS: u32 = 10;
    /// Most soldiers the displayed count may move per tick
    pub const SOLDIER_STEP_PER_TICK: u32 = 5;
    /// Lateral easing rate (fraction of the gap closed per second)
    pub const SQUAD_MOVE_RATE: f64 = 10.0;

    /// Track dimensions and pacing
    pub const TRACK_WIDTH: f64 = 10.0;
    pub const SQUAD_SPEED: f64 = 20.0;
    pub const GOAL_DISTANCE: f64 = 500.0;
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Gate pairs and zombie clusters spawned by `reset`
    pub const INITIAL_SPAWNS: usize = 5;
    /// Spawn more once the last gate is closer than this
    pub const SPAWN_LOOKAHEAD: f64 = 50.0;

    /// Gate placement
    pub const FIRST_GATE_Z: f64 = -30.0;
    pub const GATE_SPACING: f64 = 20.0;
    /// Gates trigger this far before their own z (gate width)
    pub const GATE_TRIGGER_OFFSET: f64 = 3.0;
    pub const GATE_TOLERANCE: f64 = 0.5;

    /// Zombie placement
    pub const FIRST_ZOMBIE_Z: f64 = -40.0;
    pub const ZOMBIE_SPACING_MIN: i32 = 15;
    pub const ZOMBIE_SPACING_MAX: i32 = 25;
    pub const ZOMBIE_COUNT_MIN: i32 = 3;
    pub const ZOMBIE_COUNT_MAX: i32 = 10;
    pub const ZOMBIE_X_RANGE: f64 = 4.0;
    pub const ZOMBIE_TOLERANCE: f64 = 0.5;

    /// Observation limits
    pub const OBSERVED_ZOMBIES: usize = 3;

    /// Reward shaping weights
    pub const REWARD_PER_DISTANCE: f64 = 0.01;
    pub const REWARD_PER_KILL: f64 = 1.0;
    pub const PENALTY_PER_LOSS: f64 = 0.2;

    /// Score bookkeeping
    pub const SCORE_PER_CLUSTER: i64 = 10;
    pub const SCORE_END_BONUS: i64 = 20;
}

/// Clamp `x` to the half-width of a track centered on zero. NaN maps to the
/// centre line.
#[inline]
pub fn clamp_to_track(x: f64, track_width: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    let half = track_width.abs() / 2.0;
    x.clamp(-half, half)
}

/// Clamp a signed soldier tally into `[0, MAX_SOLDIERS]`
#[inline]
pub fn clamp_soldiers(count: i64) -> u32 {
    count.clamp(0, consts::MAX_SOLDIERS as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_track() {
        assert_eq!(clamp_to_track(7.0, 10.0), 5.0);
        assert_eq!(clamp_to_track(-7.0, 10.0), -5.0);
        assert_eq!(clamp_to_track(1.5, 10.0), 1.5);
        assert_eq!(clamp_to_track(f64::NAN, 10.0), 0.0);
        assert_eq!(clamp_to_track(f64::INFINITY, 10.0), 5.0);
    }

    #[test]
    fn test_clamp_soldiers() {
        assert_eq!(clamp_soldiers(-3), 0);
        assert_eq!(clamp_soldiers(120), 120);
        assert_eq!(clamp_soldiers(9000), consts::MAX_SOLDIERS);
    }
}
