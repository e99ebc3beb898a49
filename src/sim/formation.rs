//! Instance layouts for the renderer
//!
//! Pure functions from simulation state to world-space positions. Nothing
//! here feeds back into the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::env::GameEnvironment;
use super::zombies::ZombieCluster;

/// Height of every instance above the track
pub const INSTANCE_Y: f32 = 0.2;
pub const SOLDIER_SPACING: f32 = 0.3;
pub const ZOMBIE_SPACING: f32 = 0.4;
/// Zombie instance budget across all clusters
pub const MAX_ZOMBIE_INSTANCES: usize = 200;

/// Everything the renderer needs to place instances for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub soldiers: Vec<Vec3>,
    pub zombies: Vec<Vec3>,
}

impl Formation {
    /// Layout for the environment's current frame (uses the displayed count)
    pub fn from_env(env: &GameEnvironment) -> Self {
        let squad = env.squad();
        Self {
            soldiers: soldier_positions(
                squad.soldier_count(),
                squad.x_position() as f32,
                -env.distance() as f32,
            ),
            zombies: zombie_positions(env.zombies().clusters()),
        }
    }
}

/// Near-square grid centred on the squad
pub fn soldier_positions(count: u32, squad_x: f32, squad_z: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f32).sqrt().ceil() as u32;
    let rows = count.div_ceil(cols);
    let width = (cols - 1) as f32 * SOLDIER_SPACING;
    let depth = (rows - 1) as f32 * SOLDIER_SPACING;

    (0..count)
        .map(|i| {
            let col = (i % cols) as f32;
            let row = (i / cols) as f32;
            Vec3::new(
                squad_x + col * SOLDIER_SPACING - width / 2.0,
                INSTANCE_Y,
                squad_z + row * SOLDIER_SPACING - depth / 2.0,
            )
        })
        .collect()
}

/// One grid per undefeated cluster, trailing back from its front row
pub fn zombie_positions(clusters: &[ZombieCluster]) -> Vec<Vec3> {
    let mut out = Vec::new();
    for cluster in clusters.iter().filter(|c| !c.defeated) {
        let cols = (cluster.count as f32).sqrt().ceil().max(1.0) as u32;
        for i in 0..cluster.count {
            if out.len() >= MAX_ZOMBIE_INSTANCES {
                return out;
            }
            let col = (i % cols) as f32;
            let row = (i / cols) as f32;
            out.push(Vec3::new(
                cluster.x_position as f32 + (col - cols as f32 / 2.0) * ZOMBIE_SPACING,
                INSTANCE_Y,
                cluster.z_position as f32 + row * ZOMBIE_SPACING,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(count: u32, defeated: bool) -> ZombieCluster {
        ZombieCluster {
            id: "zombie-0".to_string(),
            z_position: -40.0,
            x_position: 1.0,
            count,
            strength: count,
            defeated,
        }
    }

    #[test]
    fn test_empty_squad() {
        assert!(soldier_positions(0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_soldier_grid_is_centred() {
        let positions = soldier_positions(9, 2.0, -10.0);
        assert_eq!(positions.len(), 9);
        // 3x3 grid: centre soldier sits on the squad position
        let centre = positions[4];
        assert!((centre.x - 2.0).abs() < 1e-5);
        assert!((centre.z + 10.0).abs() < 1e-5);
        assert!(positions.iter().all(|p| p.y == INSTANCE_Y));
    }

    #[test]
    fn test_soldier_grid_shape() {
        // 10 soldiers -> 4 columns, 3 rows
        let positions = soldier_positions(10, 0.0, 0.0);
        let min_x = positions.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((max_x - min_x - 3.0 * SOLDIER_SPACING).abs() < 1e-5);
    }

    #[test]
    fn test_zombies_skip_defeated_and_cap() {
        let clusters = vec![cluster(5, true), cluster(4, false)];
        assert_eq!(zombie_positions(&clusters).len(), 4);

        let many: Vec<ZombieCluster> = (0..30).map(|_| cluster(10, false)).collect();
        assert_eq!(zombie_positions(&many).len(), MAX_ZOMBIE_INSTANCES);
    }

    #[test]
    fn test_from_env_uses_displayed_count() {
        let mut env = GameEnvironment::new();
        env.reset(1);
        let formation = Formation::from_env(&env);
        assert_eq!(formation.soldiers.len(), 10);
        assert!(!formation.zombies.is_empty());
    }
}
