//! Zombie clusters and attrition combat
//!
//! Draw order per cluster: count, x position, spacing to the next cluster.

use serde::{Deserialize, Serialize};

use super::rng::SeededRng;
use crate::consts::*;

/// A group of zombies the squad can run into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZombieCluster {
    pub id: String,
    pub z_position: f64,
    pub x_position: f64,
    pub count: u32,
    /// Remaining fighting strength (starts equal to `count`)
    pub strength: u32,
    pub defeated: bool,
}

/// Result of one engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombatOutcome {
    pub soldiers_lost: u32,
    pub cluster_defeated: bool,
}

/// Spawns clusters ahead of the squad and resolves contact
#[derive(Debug, Clone)]
pub struct ZombieSystem {
    clusters: Vec<ZombieCluster>,
    next_z: f64,
}

impl Default for ZombieSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ZombieSystem {
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
            next_z: FIRST_ZOMBIE_Z,
        }
    }

    /// Draw a new cluster at the spawn cursor; the gap to the next one is random
    pub fn spawn_cluster(&mut self, rng: &mut SeededRng) -> &ZombieCluster {
        let index = self.clusters.len();
        let count = rng.range(ZOMBIE_COUNT_MIN, ZOMBIE_COUNT_MAX) as u32;
        let x = rng.float(-ZOMBIE_X_RANGE, ZOMBIE_X_RANGE);

        self.clusters.push(ZombieCluster {
            id: format!("zombie-{index}"),
            z_position: self.next_z,
            x_position: x,
            count,
            strength: count,
            defeated: false,
        });
        log::debug!(
            "Spawned zombie cluster {} ({} strong) at z={}, x={:.2}",
            index,
            count,
            self.next_z,
            x
        );

        self.next_z -= rng.range(ZOMBIE_SPACING_MIN, ZOMBIE_SPACING_MAX) as f64;
        &self.clusters[index]
    }

    /// Indices of every undefeated cluster inside the contact box around the squad
    pub fn check_collisions(&self, squad_z: f64, squad_x: f64) -> Vec<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.defeated)
            .filter(|(_, c)| {
                (squad_z - c.z_position).abs() < ZOMBIE_TOLERANCE
                    && (squad_x - c.x_position).abs() < ZOMBIE_TOLERANCE
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Fight the cluster at `index` with `soldier_count` soldiers.
    ///
    /// Full engagement: the squad loses `min(soldiers, strength)` in one go and
    /// the cluster loses the same amount of strength.
    pub fn resolve_collision(&mut self, soldier_count: u32, index: usize) -> CombatOutcome {
        let Some(cluster) = self.clusters.get_mut(index) else {
            return CombatOutcome::default();
        };
        let outcome = resolve_engagement(soldier_count, cluster);
        log::debug!(
            "Squad of {} engaged {}: lost {}, defeated={}",
            soldier_count,
            cluster.id,
            outcome.soldiers_lost,
            outcome.cluster_defeated
        );
        outcome
    }

    /// Up to `count` undefeated clusters ahead of `squad_z`, nearest first
    pub fn nearby_zombies(&self, squad_z: f64, count: usize) -> Vec<&ZombieCluster> {
        let mut ahead: Vec<&ZombieCluster> = self
            .clusters
            .iter()
            .filter(|c| c.z_position < squad_z && !c.defeated)
            .collect();
        ahead.sort_by(|a, b| b.z_position.total_cmp(&a.z_position));
        ahead.truncate(count);
        ahead
    }

    pub fn clusters(&self) -> &[ZombieCluster] {
        &self.clusters
    }

    pub fn total_defeated(&self) -> usize {
        self.clusters.iter().filter(|c| c.defeated).count()
    }

    /// Spawn cursor (z of the next cluster)
    pub fn next_z(&self) -> f64 {
        self.next_z
    }

    /// Drop every cluster and rewind the spawn cursor
    pub fn reset(&mut self) {
        self.clusters.clear();
        self.next_z = FIRST_ZOMBIE_Z;
    }

    pub(crate) fn restore(&mut self, clusters: Vec<ZombieCluster>, next_z: f64) {
        self.clusters = clusters;
        self.next_z = next_z;
    }
}

/// Attrition between a squad and one cluster
pub fn resolve_engagement(soldier_count: u32, cluster: &mut ZombieCluster) -> CombatOutcome {
    let soldiers_lost = soldier_count.min(cluster.strength);
    cluster.strength -= soldiers_lost;
    if cluster.strength == 0 {
        cluster.defeated = true;
    }
    CombatOutcome {
        soldiers_lost,
        cluster_defeated: cluster.defeated,
    }
}
