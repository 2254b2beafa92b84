//! Sky Aviator headless runner
//!
//! Plays one run on autopilot at a simulated 60 Hz and prints the outcome.
//! The browser build is driven from `platform::web` instead.
//!
//! Usage:
//!   sky-aviator [OPTIONS]
//!
//! Options:
//!   --difficulty <easy|medium|hard>
//!   --seed <u64>
//!   --frames <n>         frame limit (default 36000, ten minutes)
//!   --settings <path>    settings JSON file
//!   --no-save            keep the best score in memory only
//!   --json               print the final HUD as JSON

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use sky_aviator::consts::FRAME_MS;
    use sky_aviator::highscores::{BestScore, format_score};
    use sky_aviator::persistence::FileStore;
    use sky_aviator::sim::GamePhase;
    use sky_aviator::tuning::Difficulty;
    use sky_aviator::{Game, GameCommand, Settings};

    pub struct RunConfig {
        pub difficulty: Option<Difficulty>,
        pub seed: Option<u64>,
        pub frames: u64,
        pub settings_path: Option<PathBuf>,
        pub save: bool,
        pub json: bool,
    }

    impl Default for RunConfig {
        fn default() -> Self {
            Self {
                difficulty: None,
                seed: None,
                frames: 36_000,
                settings_path: None,
                save: true,
                json: false,
            }
        }
    }

    pub fn parse_args(args: &[String]) -> RunConfig {
        let mut config = RunConfig::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-d" | "--difficulty" => {
                    if i + 1 < args.len() {
                        config.difficulty = Difficulty::from_str(&args[i + 1]);
                        if config.difficulty.is_none() {
                            log::warn!("Unknown difficulty '{}', ignoring", args[i + 1]);
                        }
                        i += 1;
                    }
                }
                "-s" | "--seed" => {
                    if i + 1 < args.len() {
                        config.seed = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "-f" | "--frames" => {
                    if i + 1 < args.len() {
                        config.frames = args[i + 1].parse().unwrap_or(36_000);
                        i += 1;
                    }
                }
                "--settings" => {
                    if i + 1 < args.len() {
                        config.settings_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--no-save" => config.save = false,
                "--json" => config.json = true,
                other => log::warn!("Ignoring unknown argument '{}'", other),
            }
            i += 1;
        }

        config
    }

    fn load_settings(config: &RunConfig) -> Settings {
        let mut settings = match &config.settings_path {
            Some(path) => Settings::load_from(path).unwrap_or_else(|e| {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Settings::default()
            }),
            None => Settings::load(),
        };
        if let Some(difficulty) = config.difficulty {
            settings.difficulty = difficulty;
        }
        if config.seed.is_some() {
            settings.seed = config.seed;
        }
        settings
    }

    fn best_score(config: &RunConfig) -> BestScore {
        if !config.save {
            return BestScore::in_memory();
        }
        match FileStore::open_default() {
            Ok(store) => {
                log::info!("Best score file: {}", store.path().display());
                BestScore::new(Box::new(store))
            }
            Err(e) => {
                log::warn!("Best score storage unavailable ({}), not saving", e);
                BestScore::in_memory()
            }
        }
    }

    pub fn run(config: RunConfig) {
        let settings = load_settings(&config);
        let fallback_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut game = Game::new(settings, best_score(&config), fallback_seed);
        game.set_autopilot(true);
        let Some(token) = game.command(GameCommand::Start) else {
            log::error!("Could not start a run");
            return;
        };

        let mut now = 0.0;
        for _ in 0..config.frames {
            let status = game.frame(token, now);
            now += FRAME_MS;

            for event in game.drain_events() {
                log::debug!("event: {:?}", event);
            }

            let phase = game.state().map(|s| s.phase);
            if phase == Some(GamePhase::LevelUp) {
                game.command(GameCommand::Continue);
            }
            if phase == Some(GamePhase::Won) || !status.reschedule() {
                break;
            }
        }

        let Some(frame) = game.snapshot() else {
            return;
        };
        let hud = frame.hud;
        if config.json {
            match serde_json::to_string_pretty(&hud) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Could not serialize HUD: {}", e),
            }
            return;
        }

        let seed = game.state().map(|s| s.seed).unwrap_or_default();
        let frames = game.state().map(|s| s.frames).unwrap_or_default();
        println!("Seed:     {}", seed);
        println!("Outcome:  {:?}", hud.phase);
        println!("Frames:   {}", frames);
        println!("Score:    {}", hud.score);
        println!("Level:    {}", hud.level);
        println!("Health:   {}", hud.health);
        println!("Best:     {}", format_score(game.best_score()));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Aviator (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let config = native::parse_args(&args);
    native::run(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
