//! Gate Rush entry point
//!
//! Native builds run headless bot episodes from the command line. The web
//! build is driven from JS through `gate_rush::web::GateRush`.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    use gate_rush::sim::hash_seed;
    use gate_rush::{
        Bot, BotKind, EnvConfig, EpisodeSummary, GameEnvironment, HighScores, run_episode,
    };

    /// Run Gate Rush episodes with a built-in bot
    #[derive(Debug, Parser)]
    #[command(name = "gate-rush", version, about)]
    pub struct Args {
        /// Bot to drive the squad (`random`, `greedy`)
        #[arg(long, default_value = "greedy")]
        pub bot: String,

        /// Base seed: a number, or any phrase (hashed)
        #[arg(long)]
        pub seed: Option<String>,

        /// Number of episodes to run
        #[arg(long, default_value_t = 1)]
        pub episodes: u32,

        /// Step cap per episode
        #[arg(long, default_value_t = 10_000)]
        pub max_steps: u64,

        /// JSON environment config (camelCase keys, all optional)
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Print the final state of the last episode as JSON
        #[arg(long)]
        pub dump_state: bool,
    }

    pub fn parse_seed(raw: &str) -> u32 {
        let raw = raw.trim();
        raw.parse::<u32>().unwrap_or_else(|_| hash_seed(raw))
    }

    fn load_config(path: Option<&PathBuf>) -> Result<EnvConfig> {
        let Some(path) = path else {
            return Ok(EnvConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        EnvConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_millis() as f64)
    }

    fn print_summary(index: u32, summary: &EpisodeSummary) {
        let outcome = match (summary.finished, summary.win) {
            (true, true) => "WIN",
            (true, false) => "LOSS",
            (false, _) => "CAPPED",
        };
        println!(
            "episode {:>3}  seed {:>10}  {:<6}  steps {:>5}  soldiers {:>3}  distance {:>7.2}  score {:>5}  reward {:>8.3}",
            index + 1,
            summary.seed,
            outcome,
            summary.steps,
            summary.soldiers,
            summary.distance,
            summary.score,
            summary.total_reward
        );
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let config = load_config(args.config.as_ref())?;
        let Ok(kind) = args.bot.parse::<BotKind>();
        let base_seed = match args.seed.as_deref() {
            Some(raw) => parse_seed(raw),
            None => rand::rng().random_range(0..1_000_000),
        };
        log::info!(
            "Running {} episode(s) with the {} bot from seed {}",
            args.episodes,
            kind.as_str(),
            base_seed
        );

        let mut env = GameEnvironment::with_config(config).context("building environment")?;
        env.set_manual_control(false);
        let mut board = HighScores::new();
        let mut seeds = Pcg32::seed_from_u64(u64::from(base_seed));

        let mut wins = 0u32;
        let mut total_score = 0i64;
        let mut total_reward = 0.0;
        for index in 0..args.episodes {
            let seed = if index == 0 {
                base_seed
            } else {
                seeds.next_u32()
            };
            let mut bot = Bot::new(kind, seed);
            let summary = run_episode(&mut env, &mut bot, seed, args.max_steps);
            print_summary(index, &summary);
            board.add_episode(&summary, now_ms());
            wins += u32::from(summary.win);
            total_score += summary.score;
            total_reward += summary.total_reward;
        }

        if args.episodes > 1 {
            let n = f64::from(args.episodes);
            println!(
                "{} episodes: {} wins ({:.1}%), mean score {:.2}, mean reward {:.3}",
                args.episodes,
                wins,
                100.0 * f64::from(wins) / n,
                total_score as f64 / n,
                total_reward / n
            );
            if let Some(best) = board.top_score() {
                println!("best score {best}");
            }
            for (rank, entry) in board.entries.iter().enumerate() {
                println!(
                    "  #{:<2} score {:>5}  seed {:>10}  distance {:>7.2}{}",
                    rank + 1,
                    entry.score,
                    entry.seed,
                    entry.distance,
                    if entry.win { "  win" } else { "" }
                );
            }
        }

        if args.dump_state {
            let state = env.serialize_state().context("serializing final state")?;
            println!("{state}");
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_numeric_and_phrase_seeds() {
            assert_eq!(parse_seed("42"), 42);
            assert_eq!(parse_seed(" 7 "), 7);
            assert_eq!(parse_seed("ab"), 3105);
            assert_eq!(parse_seed("-1"), hash_seed("-1"));
        }

        #[test]
        fn test_args_parse() {
            let args = Args::parse_from([
                "gate-rush",
                "--bot",
                "random",
                "--seed",
                "hello",
                "--episodes",
                "3",
                "--dump-state",
            ]);
            assert_eq!(args.bot, "random");
            assert_eq!(args.seed.as_deref(), Some("hello"));
            assert_eq!(args.episodes, 3);
            assert_eq!(args.max_steps, 10_000);
            assert!(args.dump_state);
            assert!(args.config.is_none());
        }

        #[test]
        fn test_rejects_invalid_config_file() {
            let path = std::env::temp_dir()
                .join(format!("gate-rush-bad-{}.json", std::process::id()));
            std::fs::write(&path, r#"{ "trackWidth": -10.0 }"#).unwrap();
            let err = load_config(Some(&path)).unwrap_err();
            std::fs::remove_file(&path).unwrap();
            assert!(format!("{err:#}").contains("trackWidth"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is gate_rush::web::wasm_start
}
