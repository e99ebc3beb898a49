//! Step-based game environment
//!
//! One `step` call advances the episode by a fixed timestep: steer, move,
//! spawn, resolve gates, resolve zombies, check the goal, compute reward.
//! All randomness comes from the environment's single `SeededRng`.

use super::gates::{GatePair, GateSide, GateSystem, apply_gate_operation};
use super::rng::SeededRng;
use super::squad::Squad;
use super::state::{
    BotAction, GamePhase, GameState, GateView, NextGates, Observation, StepInfo, StepResult,
    ZombieView,
};
use super::zombies::ZombieSystem;
use crate::config::EnvConfig;
use crate::consts::*;
use crate::error::{ConfigError, StateError};

/// Owns one episode's RNG, squad, gates and zombies
#[derive(Debug, Clone)]
pub struct GameEnvironment {
    config: EnvConfig,
    rng: SeededRng,
    squad: Squad,
    gates: GateSystem,
    zombies: ZombieSystem,
    tick: u64,
    seed: u32,
    distance: f64,
    score: i64,
    phase: GamePhase,
    manual_control: bool,
}

impl Default for GameEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEnvironment {
    pub fn new() -> Self {
        Self::build(EnvConfig::default())
    }

    /// Environment with custom tuning, rejected if the config can't run
    pub fn with_config(config: EnvConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EnvConfig) -> Self {
        Self {
            squad: Squad::new(config.start_soldiers),
            config,
            rng: SeededRng::default(),
            gates: GateSystem::new(),
            zombies: ZombieSystem::new(),
            tick: 0,
            seed: 0,
            distance: 0.0,
            score: 0,
            phase: GamePhase::NotStarted,
            manual_control: true,
        }
    }

    /// Start a fresh episode from `seed`
    pub fn reset(&mut self, seed: u32) -> Observation {
        self.rng.set_seed(seed);
        self.seed = seed;
        self.tick = 0;
        self.distance = 0.0;
        self.score = 0;
        self.phase = GamePhase::Running;

        self.squad = Squad::new(self.config.start_soldiers);
        self.gates.reset();
        self.zombies.reset();

        for _ in 0..self.config.initial_spawns {
            self.gates.spawn_gate_pair(&mut self.rng);
            self.zombies.spawn_cluster(&mut self.rng);
        }

        log::info!("Episode reset with seed {}", seed);
        self.observation()
    }

    /// Advance one fixed timestep. Once the episode is over this is a no-op
    /// returning zero reward.
    pub fn step(&mut self, action: BotAction) -> StepResult {
        if self.phase.is_done() {
            return StepResult {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: StepInfo::default(),
            };
        }
        self.phase = GamePhase::Running;

        let track_width = self.config.track_width;
        let dt = self.config.tick_dt;
        let prev_distance = self.distance;

        // Non-finite steering recentres instead of poisoning the position
        let x_target = if action.x_target.is_finite() {
            action.x_target
        } else {
            0.0
        };
        self.squad
            .set_x_position(x_target * (track_width / 2.0), track_width);
        self.squad.update(dt, track_width);

        self.distance += self.config.step_distance();
        self.tick += 1;
        self.spawn_ahead();

        let squad_z = -self.distance;
        let squad_x = self.squad.x_position();
        let mut info = StepInfo::default();

        if let Some(gate) = self.gates.check_collisions(squad_z, squad_x) {
            let before = self.squad.target_count();
            let after = apply_gate_operation(before, &gate);
            self.squad.set_soldier_count(after as i64);
            self.score += if gate.op.is_gain() {
                gate.value as i64
            } else {
                -(gate.value as i64)
            };
            log::debug!("Passed {} ({}): {} -> {}", gate.id, gate.label(), before, after);

            if after == 0 {
                self.end_game(false);
            }
        }

        if !self.phase.is_done() {
            for index in self.zombies.check_collisions(squad_z, squad_x) {
                let soldiers = self.squad.target_count();
                let outcome = self.zombies.resolve_collision(soldiers, index);
                info.soldiers_lost += outcome.soldiers_lost;
                if outcome.cluster_defeated {
                    info.zombies_defeated += 1;
                    self.score += SCORE_PER_CLUSTER;
                }
                self.squad
                    .set_soldier_count(soldiers as i64 - outcome.soldiers_lost as i64);
            }

            if self.squad.target_count() == 0 {
                self.end_game(false);
            } else if self.distance >= self.config.goal_distance {
                self.end_game(true);
            }
        }

        let reward = (self.distance - prev_distance) * REWARD_PER_DISTANCE
            + info.zombies_defeated as f64 * REWARD_PER_KILL
            - info.soldiers_lost as f64 * PENALTY_PER_LOSS;

        StepResult {
            observation: self.observation(),
            reward,
            done: self.phase.is_done(),
            info,
        }
    }

    /// Keep one gate pair and one zombie cluster spawning ahead of the squad
    fn spawn_ahead(&mut self) {
        let horizon = -self.distance - self.config.spawn_lookahead;
        let needs_more = self
            .gates
            .pairs()
            .last()
            .is_none_or(|pair| pair.z_position > horizon);
        if needs_more {
            self.gates.spawn_gate_pair(&mut self.rng);
            self.zombies.spawn_cluster(&mut self.rng);
        }
    }

    fn end_game(&mut self, win: bool) {
        if self.phase.is_done() {
            return;
        }
        if win {
            self.phase = GamePhase::Won;
            self.score += SCORE_END_BONUS;
        } else {
            self.phase = GamePhase::Lost;
            self.score -= SCORE_END_BONUS;
        }
        log::info!(
            "Game over ({}) at tick {}: distance {:.1}, soldiers {}, cleared {}, score {}",
            if win { "win" } else { "loss" },
            self.tick,
            self.distance,
            self.squad.target_count(),
            self.zombies.total_defeated(),
            self.score
        );
    }

    /// Read-only snapshot for bots and telemetry
    pub fn observation(&self) -> Observation {
        let squad_z = -self.distance;
        let next_gates = self
            .gates
            .nearby_gates(squad_z, 1)
            .first()
            .map(|pair| NextGates {
                left: Some(GateView::from(&pair.left)),
                right: Some(GateView::from(&pair.right)),
            })
            .unwrap_or_default();

        Observation {
            tick: self.tick,
            seed: self.seed,
            soldier_count: self.squad.target_count(),
            squad_x: self.squad.x_position(),
            speed: self.config.speed,
            distance_traveled: self.distance,
            remaining_distance: (self.config.goal_distance - self.distance).max(0.0),
            next_gates,
            nearby_zombies: self
                .zombies
                .nearby_zombies(squad_z, OBSERVED_ZOMBIES)
                .into_iter()
                .map(ZombieView::from)
                .collect(),
        }
    }

    /// Full snapshot of the episode
    pub fn snapshot(&self) -> GameState {
        GameState {
            tick: self.tick,
            seed: self.seed,
            soldier_count: self.squad.target_count(),
            squad_x: self.squad.x_position(),
            distance: self.distance,
            score: self.score,
            rng_state: self.rng.state(),
            gates: self.gates.flattened(),
            zombies: self.zombies.clusters().to_vec(),
            game_over: self.phase.is_done(),
            win: self.phase == GamePhase::Won,
            squad_target_x: Some(self.squad.target_x()),
            displayed_soldiers: Some(self.squad.soldier_count()),
            next_gate_z: Some(self.gates.next_z()),
            next_zombie_z: Some(self.zombies.next_z()),
        }
    }

    /// Snapshot as JSON
    pub fn serialize_state(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Restore from JSON produced by [`GameEnvironment::serialize_state`].
    /// On error the environment is left untouched.
    pub fn load_state(&mut self, json: &str) -> Result<(), StateError> {
        let state: GameState = serde_json::from_str(json)?;
        self.restore(state)
    }

    /// Restore from a typed snapshot, validating it first
    pub fn restore(&mut self, state: GameState) -> Result<(), StateError> {
        if let Err(err) = validate(&state) {
            log::warn!("Rejected state snapshot: {}", err);
            return Err(err);
        }

        let phase = state.phase();
        let pairs = rebuild_pairs(&state);
        let next_gate_z = state.next_gate_z.unwrap_or_else(|| {
            pairs
                .last()
                .map_or(FIRST_GATE_Z, |p| p.z_position - GATE_SPACING)
        });
        let next_zombie_z = state.next_zombie_z.unwrap_or_else(|| {
            let mid_gap = (ZOMBIE_SPACING_MIN + ZOMBIE_SPACING_MAX) as f64 / 2.0;
            state
                .zombies
                .last()
                .map_or(FIRST_ZOMBIE_Z, |c| c.z_position - mid_gap)
        });

        let track_width = self.config.track_width;
        self.squad.restore(
            state.displayed_soldiers.unwrap_or(state.soldier_count),
            state.soldier_count,
            crate::clamp_to_track(state.squad_x, track_width),
            crate::clamp_to_track(state.squad_target_x.unwrap_or(state.squad_x), track_width),
        );
        self.gates.restore(pairs, next_gate_z);
        self.zombies.restore(state.zombies, next_zombie_z);
        self.rng.set_state(state.rng_state);
        self.tick = state.tick;
        self.seed = state.seed;
        self.distance = state.distance;
        self.score = state.score;
        self.phase = phase;

        log::info!("Loaded state at tick {} (seed {})", self.tick, self.seed);
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_done()
    }

    pub fn is_win(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn squad(&self) -> &Squad {
        &self.squad
    }

    pub fn gates(&self) -> &GateSystem {
        &self.gates
    }

    pub fn zombies(&self) -> &ZombieSystem {
        &self.zombies
    }

    pub fn set_manual_control(&mut self, enabled: bool) {
        self.manual_control = enabled;
    }

    pub fn is_manual_control(&self) -> bool {
        self.manual_control
    }
}

fn validate(state: &GameState) -> Result<(), StateError> {
    if !state.distance.is_finite() {
        return Err(StateError::NonFiniteValue { field: "distance" });
    }
    if !state.squad_x.is_finite() {
        return Err(StateError::NonFiniteValue { field: "squadX" });
    }
    if state.squad_target_x.is_some_and(|x| !x.is_finite()) {
        return Err(StateError::NonFiniteValue { field: "squadTargetX" });
    }
    for count in [Some(state.soldier_count), state.displayed_soldiers]
        .into_iter()
        .flatten()
    {
        if count > MAX_SOLDIERS {
            return Err(StateError::SoldierCountOutOfRange { count });
        }
    }
    if state.gates.len() % 2 != 0 {
        return Err(StateError::UnpairedGates {
            count: state.gates.len(),
        });
    }
    for (index, chunk) in state.gates.chunks_exact(2).enumerate() {
        let (left, right) = (&chunk[0], &chunk[1]);
        if left.side != GateSide::Left
            || right.side != GateSide::Right
            || left.z_position != right.z_position
        {
            return Err(StateError::GatePairMismatch { index: index * 2 });
        }
    }
    Ok(())
}

fn rebuild_pairs(state: &GameState) -> Vec<GatePair> {
    state
        .gates
        .chunks_exact(2)
        .map(|chunk| GatePair {
            left: chunk[0].clone(),
            right: chunk[1].clone(),
            z_position: chunk[0].z_position,
            passed: chunk[0].passed || chunk[1].passed,
        })
        .collect()
}
