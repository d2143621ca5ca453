//! Word Blaster entry point
//!
//! The browser build is driven from JavaScript through `word_blaster::web`.
//! Natively this runs a headless autopilot session and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use word_blaster::consts::SIM_DT;
    use word_blaster::sim::{Engine, GameEvent};
    use word_blaster::{Difficulty, GameConfig, StartingInventory};

    /// Simulated seconds before the demo gives up
    const MAX_DEMO_SECONDS: f32 = 600.0;
    /// Autopilot lateral speed (pixels/s)
    const PILOT_SPEED: f32 = 420.0;

    /// Move toward the right answer (or the boss) and shoot when lined up
    fn autopilot(engine: &mut Engine, dt: f32) {
        let player = engine.player().pos;
        let target = match engine.boss() {
            Some(boss) => Some(boss.pos.x),
            None => engine
                .enemies()
                .iter()
                .find(|(_, e)| e.is_correct)
                .map(|(_, e)| e.pos.x),
        };
        let Some(target_x) = target else {
            return;
        };

        let dx = target_x - player.x;
        let step = PILOT_SPEED * dt;
        engine.move_player(dx.clamp(-step, step), 0.0);

        if dx.abs() < 12.0 {
            engine.fire();
        }
        // Panic button when a boss volley is close
        if engine
            .boss_shots()
            .any(|s| s.pos.distance(player) < 60.0)
        {
            engine.use_bomb();
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(42);
        let difficulty = args
            .next()
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();

        log::info!("Word Blaster (native demo) starting, seed={seed}");
        let config = GameConfig {
            difficulty,
            seed,
            ..Default::default()
        };
        let mut engine = Engine::new(800.0, 600.0, config, StartingInventory::default());

        let mut elapsed = 0.0;
        while elapsed < MAX_DEMO_SECONDS && !engine.is_game_over() {
            autopilot(&mut engine, SIM_DT);
            engine.update(SIM_DT);
            elapsed += SIM_DT;

            let mut unit_done = false;
            for event in engine.drain_events() {
                match &event {
                    GameEvent::Stats(_) => log::debug!("{event:?}"),
                    GameEvent::UnitComplete(_) => {
                        unit_done = true;
                        log::info!("{event:?}");
                    }
                    _ => log::info!("{event:?}"),
                }
            }
            if unit_done {
                engine.next_unit();
            }
        }

        let stats = engine.stats();
        println!(
            "Finished after {:.1}s: score {}, level {}-{}, lives {}",
            elapsed, stats.score, stats.level, stats.sub_level, stats.lives
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point lives in the library's web module
}
