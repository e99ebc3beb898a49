//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - One seeded RNG per episode, drawn in a fixed order
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod env;
pub mod episode;
pub mod formation;
pub mod gates;
pub mod rng;
pub mod squad;
pub mod state;
pub mod zombies;

pub use clock::FrameClock;
pub use env::GameEnvironment;
pub use episode::{EpisodeSummary, run_episode};
pub use formation::{Formation, soldier_positions, zombie_positions};
pub use gates::{Gate, GateOp, GatePair, GateSide, GateSystem, apply_gate_operation};
pub use rng::{SeededRng, hash_seed};
pub use squad::Squad;
pub use state::{
    BotAction, GamePhase, GameState, GateView, NextGates, Observation, StepInfo, StepResult,
    ZombieView,
};
pub use zombies::{CombatOutcome, ZombieCluster, ZombieSystem, resolve_engagement};
