//! Browser surface
//!
//! `GateRush` wraps one environment for a JS host: the page drives it with
//! animation-frame deltas (or explicit steps) and reads back JSON snapshots
//! and flat position buffers for instanced rendering.

use wasm_bindgen::prelude::*;

use crate::bots::{Bot, BotKind};
use crate::config::EnvConfig;
use crate::highscores::{HighScoreEntry, HighScores};
use crate::sim::{BotAction, Formation, FrameClock, GameEnvironment, zombie_positions};

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flatten(points: &[glam::Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * 1_000_000.0) as u32
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Gate Rush module loaded");
}

#[wasm_bindgen]
pub struct GateRush {
    env: GameEnvironment,
    bot: Option<Bot>,
    clock: FrameClock,
    input_x: f64,
    highscores: HighScores,
    recorded: bool,
}

#[wasm_bindgen]
impl GateRush {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<GateRush, JsValue> {
        let mut env = GameEnvironment::with_config(EnvConfig::load()).map_err(js_err)?;
        env.reset(seed.unwrap_or_else(random_seed));
        let clock = FrameClock::for_config(env.config());
        Ok(GateRush {
            env,
            bot: None,
            clock,
            input_x: 0.0,
            highscores: HighScores::load(),
            recorded: false,
        })
    }

    /// Current environment config as JSON
    pub fn config(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.env.config()).map_err(js_err)
    }

    /// Validate, persist and apply a config; starts a new episode on the
    /// current seed
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = EnvConfig::from_json(json).map_err(js_err)?;
        let mut env = GameEnvironment::with_config(config).map_err(js_err)?;
        env.set_manual_control(self.env.is_manual_control());
        env.reset(self.env.seed());
        env.config().save();
        self.clock = FrameClock::for_config(env.config());
        self.env = env;
        self.recorded = false;
        Ok(())
    }

    /// Start a new episode; returns the first observation as JSON
    pub fn reset(&mut self, seed: Option<u32>) -> Result<String, JsValue> {
        let observation = self.env.reset(seed.unwrap_or_else(random_seed));
        self.clock.reset();
        self.input_x = 0.0;
        self.recorded = false;
        serde_json::to_string(&observation).map_err(js_err)
    }

    /// Player steering in [-1, 1]; used while no bot is driving
    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, x: f64) {
        self.input_x = if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
    }

    /// Hand control to a bot by name; an empty name or "none" returns it to
    /// the player
    #[wasm_bindgen(js_name = setBot)]
    pub fn set_bot(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            self.bot = None;
            self.env.set_manual_control(true);
            log::info!("Manual control");
            return;
        }
        let Ok(kind) = name.parse::<BotKind>();
        self.bot = Some(Bot::new(kind, self.env.seed()));
        self.env.set_manual_control(false);
        log::info!("Bot control: {}", kind.as_str());
    }

    /// Advance by a wall-clock frame delta (seconds); returns steps run
    pub fn frame(&mut self, dt: f64) -> u32 {
        let steps = self.clock.advance(dt);
        let mut ran = 0;
        for _ in 0..steps {
            if self.env.is_game_over() {
                break;
            }
            let action = self.next_action();
            self.env.step(action);
            ran += 1;
        }
        self.record_if_finished();
        ran
    }

    /// One explicit step with steering `x`; returns the step result as JSON
    pub fn step(&mut self, x: f64) -> Result<String, JsValue> {
        let result = self.env.step(BotAction::new(x));
        self.record_if_finished();
        serde_json::to_string(&result).map_err(js_err)
    }

    pub fn observation(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.env.observation()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = serializeState)]
    pub fn serialize_state(&self) -> Result<String, JsValue> {
        self.env.serialize_state().map_err(js_err)
    }

    #[wasm_bindgen(js_name = loadState)]
    pub fn load_state(&mut self, json: &str) -> Result<(), JsValue> {
        self.env.load_state(json).map_err(js_err)?;
        self.clock.reset();
        self.recorded = self.env.is_game_over();
        Ok(())
    }

    pub fn gates(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.env.gates().flattened()).map_err(js_err)
    }

    pub fn zombies(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.env.zombies().clusters()).map_err(js_err)
    }

    /// Flat xyz buffer for the squad's instances
    #[wasm_bindgen(js_name = soldierPositions)]
    pub fn soldier_positions(&self) -> Vec<f32> {
        flatten(&Formation::from_env(&self.env).soldiers)
    }

    /// Flat xyz buffer for every undefeated zombie instance
    #[wasm_bindgen(js_name = zombiePositions)]
    pub fn zombie_positions(&self) -> Vec<f32> {
        flatten(&zombie_positions(self.env.zombies().clusters()))
    }

    #[wasm_bindgen(js_name = highScores)]
    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.highscores).map_err(js_err)
    }

    /// Best recorded score, if any
    #[wasm_bindgen(getter, js_name = topScore)]
    pub fn top_score(&self) -> Option<f64> {
        self.highscores.top_score().map(|s| s as f64)
    }

    /// Leaderboard rank the current score would take (1-indexed)
    #[wasm_bindgen(getter, js_name = potentialRank)]
    pub fn potential_rank(&self) -> Option<u32> {
        self.highscores
            .potential_rank(self.env.score())
            .map(|rank| rank as u32)
    }

    #[wasm_bindgen(getter)]
    pub fn tick(&self) -> f64 {
        self.env.tick() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn seed(&self) -> u32 {
        self.env.seed()
    }

    #[wasm_bindgen(getter)]
    pub fn soldiers(&self) -> u32 {
        self.env.squad().target_count()
    }

    #[wasm_bindgen(getter, js_name = displayedSoldiers)]
    pub fn displayed_soldiers(&self) -> u32 {
        self.env.squad().soldier_count()
    }

    #[wasm_bindgen(getter, js_name = squadX)]
    pub fn squad_x(&self) -> f64 {
        self.env.squad().x_position()
    }

    #[wasm_bindgen(getter)]
    pub fn distance(&self) -> f64 {
        self.env.distance()
    }

    #[wasm_bindgen(getter, js_name = goalDistance)]
    pub fn goal_distance(&self) -> f64 {
        self.env.config().goal_distance
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.env.score() as f64
    }

    #[wasm_bindgen(getter, js_name = gameOver)]
    pub fn game_over(&self) -> bool {
        self.env.is_game_over()
    }

    #[wasm_bindgen(getter)]
    pub fn win(&self) -> bool {
        self.env.is_win()
    }

    #[wasm_bindgen(getter, js_name = manualControl)]
    pub fn manual_control(&self) -> bool {
        self.env.is_manual_control()
    }

    #[wasm_bindgen(getter)]
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }
}

impl GateRush {
    fn next_action(&mut self) -> BotAction {
        match self.bot.as_mut() {
            Some(bot) => bot.act(&self.env.observation()),
            None => BotAction::new(self.input_x),
        }
    }

    fn record_if_finished(&mut self) {
        if self.recorded || !self.env.is_game_over() {
            return;
        }
        self.recorded = true;
        let entry = HighScoreEntry {
            score: self.env.score(),
            distance: self.env.distance(),
            seed: self.env.seed(),
            win: self.env.is_win(),
            timestamp: js_sys::Date::now(),
        };
        if let Some(rank) = self.highscores.add(entry) {
            log::info!("New high score at rank {}", rank);
            self.highscores.save();
        }
    }
}
