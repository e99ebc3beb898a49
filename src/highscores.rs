//! High score leaderboard system
//!
//! Persisted to LocalStorage, tracks top 10 runs.

use serde::{Deserialize, Serialize};

use crate::sim::EpisodeSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: i64,
    pub distance: f64,
    pub seed: u32,
    pub win: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gate_rush_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: i64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies; returns the rank achieved
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record a headless episode
    pub fn add_episode(&mut self, summary: &EpisodeSummary, timestamp: f64) -> Option<usize> {
        self.add(HighScoreEntry {
            score: summary.score,
            distance: summary.distance,
            seed: summary.seed,
            win: summary.win,
            timestamp,
        })
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: i64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            distance: 100.0,
            seed: 1,
            win: false,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_sorted_best_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(30)), Some(1));
        assert_eq!(scores.add(entry(50)), Some(1));
        assert_eq!(scores.add(entry(-20)), Some(3));
        assert_eq!(scores.add(entry(40)), Some(2));
        let order: Vec<i64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![50, 40, 30, -20]);
        assert_eq!(scores.top_score(), Some(50));
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let mut scores = HighScores::new();
        for s in 0..MAX_HIGH_SCORES as i64 {
            scores.add(entry(s * 10));
        }
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add(entry(-5)), None);
        assert_eq!(scores.potential_rank(95), Some(1));
        assert_eq!(scores.add(entry(55)), Some(5));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(10));
    }

    #[test]
    fn test_add_episode_records_summary() {
        let summary = EpisodeSummary {
            seed: 77,
            steps: 1501,
            total_reward: 12.5,
            soldiers: 40,
            distance: 500.2,
            score: 135,
            win: true,
            finished: true,
            zombies_defeated: 6,
            soldiers_lost: 30,
        };
        let mut scores = HighScores::new();
        assert_eq!(scores.add_episode(&summary, 1_000.0), Some(1));
        let entry = &scores.entries[0];
        assert_eq!((entry.score, entry.seed, entry.win), (135, 77, true));
        assert_eq!(entry.distance, 500.2);
        assert_eq!(entry.timestamp, 1_000.0);
    }
}
