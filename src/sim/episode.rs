//! Headless episode runner

use serde::{Deserialize, Serialize};

use super::env::GameEnvironment;
use crate::bots::Bot;

/// How one bot-driven episode went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub seed: u32,
    pub steps: u64,
    pub total_reward: f64,
    pub soldiers: u32,
    pub distance: f64,
    pub score: i64,
    pub win: bool,
    /// False when the step cap ran out first
    pub finished: bool,
    pub zombies_defeated: u32,
    pub soldiers_lost: u32,
}

/// Reset `env` with `seed` and let `bot` play until the episode ends or
/// `max_steps` steps have run.
pub fn run_episode(
    env: &mut GameEnvironment,
    bot: &mut Bot,
    seed: u32,
    max_steps: u64,
) -> EpisodeSummary {
    let mut observation = env.reset(seed);
    let mut summary = EpisodeSummary {
        seed,
        steps: 0,
        total_reward: 0.0,
        soldiers: observation.soldier_count,
        distance: 0.0,
        score: 0,
        win: false,
        finished: false,
        zombies_defeated: 0,
        soldiers_lost: 0,
    };

    while summary.steps < max_steps {
        let action = bot.act(&observation);
        let result = env.step(action);
        summary.steps += 1;
        summary.total_reward += result.reward;
        summary.zombies_defeated += result.info.zombies_defeated;
        summary.soldiers_lost += result.info.soldiers_lost;
        observation = result.observation;
        if result.done {
            summary.finished = true;
            break;
        }
    }

    summary.soldiers = observation.soldier_count;
    summary.distance = observation.distance_traveled;
    summary.score = env.score();
    summary.win = env.is_win();
    log::debug!(
        "Episode seed {} ({:?}): {} steps, reward {:.3}",
        seed,
        bot.kind(),
        summary.steps,
        summary.total_reward
    );
    summary
}
