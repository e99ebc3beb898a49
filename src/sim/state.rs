//! Observation, action and snapshot types
//!
//! `GameState` is the only persisted artifact of the simulation. Its JSON
//! field names are camelCase so browser hosts can read it directly.

use serde::{Deserialize, Serialize};

use super::gates::{Gate, GateOp};
use super::zombies::ZombieCluster;

/// Episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, `reset` not yet called
    NotStarted,
    /// Accepting steps
    Running,
    /// Reached the goal with soldiers left
    Won,
    /// Squad wiped out
    Lost,
}

impl GamePhase {
    pub fn is_done(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// What a bot sees of one gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateView {
    pub op: GateOp,
    pub value: u32,
    pub z_position: f64,
}

impl From<&Gate> for GateView {
    fn from(gate: &Gate) -> Self {
        Self {
            op: gate.op,
            value: gate.value,
            z_position: gate.z_position,
        }
    }
}

/// The nearest upcoming gate pair, if any
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NextGates {
    pub left: Option<GateView>,
    pub right: Option<GateView>,
}

/// What a bot sees of one zombie cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZombieView {
    pub z_position: f64,
    pub x_position: f64,
    pub strength: u32,
}

impl From<&ZombieCluster> for ZombieView {
    fn from(cluster: &ZombieCluster) -> Self {
        Self {
            z_position: cluster.z_position,
            x_position: cluster.x_position,
            strength: cluster.strength,
        }
    }
}

/// Read-only snapshot handed to bots and telemetry each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub tick: u64,
    pub seed: u32,
    pub soldier_count: u32,
    pub squad_x: f64,
    pub speed: f64,
    pub distance_traveled: f64,
    pub remaining_distance: f64,
    pub next_gates: NextGates,
    pub nearby_zombies: Vec<ZombieView>,
}

/// Steering command: `x_target` in `[-1, 1]` maps onto the track half-width
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotAction {
    pub x_target: f64,
}

impl BotAction {
    pub fn new(x_target: f64) -> Self {
        Self { x_target }
    }
}

/// Per-step event tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub soldiers_lost: u32,
    pub zombies_defeated: u32,
}

/// Outcome of one `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Complete, reconstructable snapshot of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub tick: u64,
    pub seed: u32,
    pub soldier_count: u32,
    pub squad_x: f64,
    pub distance: f64,
    pub score: i64,
    pub rng_state: u32,
    /// Every gate ever spawned, left then right per pair
    pub gates: Vec<Gate>,
    pub zombies: Vec<ZombieCluster>,
    pub game_over: bool,
    pub win: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_target_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed_soldiers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_gate_z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_zombie_z: Option<f64>,
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        match (self.game_over, self.win) {
            (false, _) => GamePhase::Running,
            (true, true) => GamePhase::Won,
            (true, false) => GamePhase::Lost,
        }
    }
}
