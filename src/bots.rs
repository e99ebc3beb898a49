//! Bots that play the game from observations
//!
//! A bot maps an [`Observation`] to a [`BotAction`]. Bots never touch the
//! environment's RNG; `RandomBot` carries its own stream, so replays with it
//! are only reproducible when its seed is captured too.

use std::str::FromStr;

use crate::sim::{BotAction, GateOp, GateView, Observation, ZombieView};

/// Default seed for `RandomBot`
pub const DEFAULT_BOT_SEED: u32 = 12345;

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MASK: u64 = 0x7fff_ffff;

/// Shortest and longest hold before `RandomBot` picks a new target
const MIN_HOLD_TICKS: u32 = 5;
const HOLD_SPAN: u32 = 20;

/// Steering targets `GreedyGateBot` uses for the two gates
const LEFT_TARGET: f64 = -0.5;
const RIGHT_TARGET: f64 = 0.5;

/// Wanders: picks a random target and holds it for 5-24 ticks
#[derive(Debug, Clone)]
pub struct RandomBot {
    state: u64,
    hold_ticks: u32,
    last_x_target: f64,
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_SEED)
    }
}

impl RandomBot {
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed as u64 & LCG_MASK,
            hold_ticks: 0,
            last_x_target: 0.0,
        }
    }

    /// Next value in `[0, 1]`
    fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MASK;
        self.state as f64 / LCG_MASK as f64
    }

    pub fn act(&mut self, _observation: &Observation) -> BotAction {
        if self.hold_ticks > 0 {
            self.hold_ticks -= 1;
            return BotAction::new(self.last_x_target);
        }

        self.last_x_target = self.next_unit() * 2.0 - 1.0;
        let hold = (self.next_unit() * HOLD_SPAN as f64).floor() as u32;
        self.hold_ticks = hold.min(HOLD_SPAN - 1) + MIN_HOLD_TICKS;
        BotAction::new(self.last_x_target)
    }
}

/// Steers toward whichever upcoming gate looks better
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyGateBot;

impl GreedyGateBot {
    pub fn new() -> Self {
        Self
    }

    pub fn act(&self, observation: &Observation) -> BotAction {
        let gates = &observation.next_gates;
        let candidates = [(gates.left, LEFT_TARGET), (gates.right, RIGHT_TARGET)];

        let mut best: Option<(f64, f64)> = None;
        for (gate, target) in candidates {
            let Some(gate) = gate else { continue };
            let score = evaluate_gate(&gate, target, &observation.nearby_zombies);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, target));
            }
        }

        let Some((_, target)) = best else {
            return BotAction::new(0.0);
        };
        // Damp the swing once already off-centre
        let damping = if observation.squad_x.abs() < 1.0 { 1.0 } else { 0.5 };
        BotAction::new(target * damping)
    }
}

/// Gate benefit minus a penalty for clusters between the squad and the gate
/// on that gate's side of the track
fn evaluate_gate(gate: &GateView, side_target: f64, zombies: &[ZombieView]) -> f64 {
    let value = gate.value as f64;
    let mut score = match gate.op {
        GateOp::Add => value,
        GateOp::Sub => -value,
        GateOp::Mul => value * 10.0,
        GateOp::Div => -value * 5.0,
    };

    for zombie in zombies {
        let before_gate = zombie.z_position > gate.z_position;
        let same_side = (zombie.x_position < 0.0) == (side_target < 0.0);
        if before_gate && same_side {
            score -= zombie.strength as f64 * 0.5;
        }
    }
    score
}

/// Which bot to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BotKind {
    #[default]
    Random,
    GreedyGate,
}

impl BotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotKind::Random => "random",
            BotKind::GreedyGate => "greedy",
        }
    }
}

impl FromStr for BotKind {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to `Random`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "greedy" | "greedygate" => BotKind::GreedyGate,
            _ => BotKind::Random,
        })
    }
}

/// Any bot, chosen at construction time
#[derive(Debug, Clone)]
pub enum Bot {
    Random(RandomBot),
    GreedyGate(GreedyGateBot),
}

impl Bot {
    pub fn new(kind: BotKind, seed: u32) -> Self {
        match kind {
            BotKind::Random => Bot::Random(RandomBot::new(seed)),
            BotKind::GreedyGate => Bot::GreedyGate(GreedyGateBot::new()),
        }
    }

    pub fn kind(&self) -> BotKind {
        match self {
            Bot::Random(_) => BotKind::Random,
            Bot::GreedyGate(_) => BotKind::GreedyGate,
        }
    }

    pub fn act(&mut self, observation: &Observation) -> BotAction {
        match self {
            Bot::Random(bot) => bot.act(observation),
            Bot::GreedyGate(bot) => bot.act(observation),
        }
    }
}
