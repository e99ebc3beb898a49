//! Arithmetic gates that rewrite the soldier count
//!
//! Draw order per pair is fixed: left op, left value, right op, right value.

use serde::{Deserialize, Serialize};

use super::rng::SeededRng;
use crate::clamp_soldiers;
use crate::consts::*;

/// Gate operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateOp {
    #[default]
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl GateOp {
    /// Choice order used when drawing an operator
    pub const ALL: [GateOp; 4] = [GateOp::Add, GateOp::Sub, GateOp::Mul, GateOp::Div];

    pub fn symbol(&self) -> char {
        match self {
            GateOp::Add => '+',
            GateOp::Sub => '-',
            GateOp::Mul => '*',
            GateOp::Div => '/',
        }
    }

    /// Inclusive magnitude range drawn for this operator
    pub fn value_range(&self) -> (i32, i32) {
        match self {
            GateOp::Add => (5, 20),
            GateOp::Sub => (5, 15),
            GateOp::Mul => (1, 3),
            GateOp::Div => (2, 4),
        }
    }

    /// Whether passing this gate grows the squad (and the score)
    pub fn is_gain(&self) -> bool {
        matches!(self, GateOp::Add | GateOp::Mul)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateSide {
    Left,
    Right,
}

/// A single gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    pub id: String,
    pub side: GateSide,
    pub op: GateOp,
    pub value: u32,
    pub z_position: f64,
    pub passed: bool,
}

impl Gate {
    /// Label drawn on the gate, e.g. `+12`
    pub fn label(&self) -> String {
        format!("{}{}", self.op.symbol(), self.value)
    }
}

/// Left and right gates sharing one z
#[derive(Debug, Clone, PartialEq)]
pub struct GatePair {
    pub left: Gate,
    pub right: Gate,
    pub z_position: f64,
    pub passed: bool,
}

impl GatePair {
    /// Z at which the squad triggers this pair
    pub fn trigger_z(&self) -> f64 {
        self.z_position + GATE_TRIGGER_OFFSET
    }
}

/// Apply a gate to a soldier count. Division floors; result is clamped to
/// `[0, MAX_SOLDIERS]`.
pub fn apply_gate_operation(count: u32, gate: &Gate) -> u32 {
    let count = count as i64;
    let value = gate.value as i64;
    let result = match gate.op {
        GateOp::Add => count + value,
        GateOp::Sub => count - value,
        GateOp::Mul => count * value,
        GateOp::Div => {
            if value == 0 {
                count
            } else {
                count.div_euclid(value)
            }
        }
    };
    clamp_soldiers(result)
}

/// Spawns gate pairs ahead of the squad and detects when one is crossed
#[derive(Debug, Clone)]
pub struct GateSystem {
    pairs: Vec<GatePair>,
    next_z: f64,
}

impl Default for GateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl GateSystem {
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            next_z: FIRST_GATE_Z,
        }
    }

    /// Draw a new pair at the spawn cursor and move the cursor forward
    pub fn spawn_gate_pair(&mut self, rng: &mut SeededRng) -> &GatePair {
        let index = self.pairs.len();
        let z = self.next_z;

        let (left_op, left_value) = draw_gate(rng);
        let (right_op, right_value) = draw_gate(rng);

        let pair = GatePair {
            left: Gate {
                id: format!("gate-left-{index}"),
                side: GateSide::Left,
                op: left_op,
                value: left_value,
                z_position: z,
                passed: false,
            },
            right: Gate {
                id: format!("gate-right-{index}"),
                side: GateSide::Right,
                op: right_op,
                value: right_value,
                z_position: z,
                passed: false,
            },
            z_position: z,
            passed: false,
        };
        log::debug!(
            "Spawned gate pair {} at z={}: {} | {}",
            index,
            z,
            pair.left.label(),
            pair.right.label()
        );

        self.pairs.push(pair);
        self.next_z -= GATE_SPACING;
        &self.pairs[index]
    }

    /// Find the first unpassed pair whose trigger line the squad is on.
    /// The side is picked by the sign of `squad_x` (negative = left).
    /// Both the chosen gate and its pair are marked passed.
    pub fn check_collisions(&mut self, squad_z: f64, squad_x: f64) -> Option<Gate> {
        let pair = self
            .pairs
            .iter_mut()
            .filter(|p| !p.passed)
            .find(|p| (squad_z - p.trigger_z()).abs() < GATE_TOLERANCE)?;

        let chosen = if squad_x < 0.0 {
            &mut pair.left
        } else {
            &mut pair.right
        };
        chosen.passed = true;
        let gate = chosen.clone();
        pair.passed = true;
        Some(gate)
    }

    /// Up to `count` unpassed pairs ahead of `squad_z`, nearest first
    pub fn nearby_gates(&self, squad_z: f64, count: usize) -> Vec<&GatePair> {
        let mut ahead: Vec<&GatePair> = self
            .pairs
            .iter()
            .filter(|p| p.z_position < squad_z && !p.passed)
            .collect();
        ahead.sort_by(|a, b| b.z_position.total_cmp(&a.z_position));
        ahead.truncate(count);
        ahead
    }

    pub fn pairs(&self) -> &[GatePair] {
        &self.pairs
    }

    /// Every gate, left then right per pair, in spawn order
    pub fn flattened(&self) -> Vec<Gate> {
        self.pairs
            .iter()
            .flat_map(|p| [p.left.clone(), p.right.clone()])
            .collect()
    }

    /// Spawn cursor (z of the next pair)
    pub fn next_z(&self) -> f64 {
        self.next_z
    }

    /// Drop every pair and rewind the spawn cursor
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.next_z = FIRST_GATE_Z;
    }

    /// Replace contents with restored pairs
    pub(crate) fn restore(&mut self, pairs: Vec<GatePair>, next_z: f64) {
        self.pairs = pairs;
        self.next_z = next_z;
    }
}

fn draw_gate(rng: &mut SeededRng) -> (GateOp, u32) {
    let op = rng.choice(&GateOp::ALL).copied().unwrap_or_default();
    let (min, max) = op.value_range();
    (op, rng.range(min, max) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gate(op: GateOp, value: u32) -> Gate {
        Gate {
            id: "g".to_string(),
            side: GateSide::Left,
            op,
            value,
            z_position: -30.0,
            passed: false,
        }
    }

    #[test]
    fn test_apply_gate_operation() {
        assert_eq!(apply_gate_operation(100, &gate(GateOp::Add, 10)), 110);
        assert_eq!(apply_gate_operation(100, &gate(GateOp::Mul, 3)), 300);
        assert_eq!(apply_gate_operation(10, &gate(GateOp::Div, 3)), 3);
        assert_eq!(apply_gate_operation(5, &gate(GateOp::Sub, 50)), 0);
        assert_eq!(apply_gate_operation(400, &gate(GateOp::Mul, 2)), 500);
    }

    #[test]
    fn test_spawn_positions_and_ids() {
        let mut rng = SeededRng::new(1);
        let mut gates = GateSystem::new();
        gates.spawn_gate_pair(&mut rng);
        gates.spawn_gate_pair(&mut rng);

        let pairs = gates.pairs();
        assert_eq!(pairs[0].z_position, -30.0);
        assert_eq!(pairs[1].z_position, -50.0);
        assert_eq!(pairs[1].left.id, "gate-left-1");
        assert_eq!(pairs[1].right.id, "gate-right-1");
        assert_eq!(gates.next_z(), -70.0);
    }

    #[test]
    fn test_spawn_values_within_operator_ranges() {
        let mut rng = SeededRng::new(2024);
        let mut gates = GateSystem::new();
        for _ in 0..200 {
            gates.spawn_gate_pair(&mut rng);
        }
        for gate in gates.flattened() {
            let (min, max) = gate.op.value_range();
            assert!(gate.value >= min as u32 && gate.value <= max as u32);
        }
    }

    #[test]
    fn test_spawn_draw_order() {
        let mut rng = SeededRng::new(77);
        let mut gates = GateSystem::new();
        let pair = gates.spawn_gate_pair(&mut rng).clone();

        let mut replay = SeededRng::new(77);
        let left_op = GateOp::ALL[replay.range(0, 3) as usize];
        let (lo, hi) = left_op.value_range();
        let left_value = replay.range(lo, hi) as u32;
        let right_op = GateOp::ALL[replay.range(0, 3) as usize];
        let (lo, hi) = right_op.value_range();
        let right_value = replay.range(lo, hi) as u32;

        assert_eq!((pair.left.op, pair.left.value), (left_op, left_value));
        assert_eq!((pair.right.op, pair.right.value), (right_op, right_value));
    }

    #[test]
    fn test_collision_picks_side_and_is_idempotent() {
        let mut rng = SeededRng::new(3);
        let mut gates = GateSystem::new();
        gates.spawn_gate_pair(&mut rng);

        // Trigger line for the first pair is z = -27
        assert!(gates.check_collisions(-20.0, 1.0).is_none());
        let hit = gates.check_collisions(-27.2, 1.0).expect("pair should trigger");
        assert_eq!(hit.side, GateSide::Right);
        assert!(gates.pairs()[0].passed);
        assert!(gates.pairs()[0].right.passed);
        assert!(!gates.pairs()[0].left.passed);

        assert!(gates.check_collisions(-27.2, 1.0).is_none());
        assert!(gates.check_collisions(-27.2, -1.0).is_none());
    }

    #[test]
    fn test_collision_zero_x_goes_right() {
        let mut rng = SeededRng::new(3);
        let mut gates = GateSystem::new();
        gates.spawn_gate_pair(&mut rng);
        let hit = gates.check_collisions(-27.0, 0.0).expect("pair should trigger");
        assert_eq!(hit.side, GateSide::Right);
    }

    #[test]
    fn test_nearby_gates_nearest_first() {
        let mut rng = SeededRng::new(9);
        let mut gates = GateSystem::new();
        for _ in 0..4 {
            gates.spawn_gate_pair(&mut rng);
        }
        let near = gates.nearby_gates(-35.0, 2);
        assert_eq!(near.len(), 2);
        assert_eq!(near[0].z_position, -50.0);
        assert_eq!(near[1].z_position, -70.0);
    }

    #[test]
    fn test_reset_clears_pairs() {
        let mut rng = SeededRng::new(9);
        let mut gates = GateSystem::new();
        gates.spawn_gate_pair(&mut rng);
        gates.reset();
        assert!(gates.pairs().is_empty());
        assert_eq!(gates.next_z(), FIRST_GATE_Z);
    }

    #[test]
    fn test_gate_json_shape() {
        let json = serde_json::to_value(gate(GateOp::Div, 2)).unwrap();
        assert_eq!(json["op"], "/");
        assert_eq!(json["side"], "left");
        assert_eq!(json["zPosition"], -30.0);
    }

    proptest! {
        #[test]
        fn prop_apply_stays_in_bounds(count in 0u32..=500, op in 0usize..4, value in 1u32..25) {
            let result = apply_gate_operation(count, &gate(GateOp::ALL[op], value));
            prop_assert!(result <= MAX_SOLDIERS);
        }
    }
}
